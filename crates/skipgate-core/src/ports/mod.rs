//! Port definitions for environment introspection.
//!
//! Core owns the traits; adapters that actually run commands or read
//! hardware state live in `skipgate-runtime`.

pub mod environment_probe;

#[cfg(test)]
pub use environment_probe::MockEnvironmentProbePort;
pub use environment_probe::{EnvironmentProbePort, ProbeError, ProbeResult};
