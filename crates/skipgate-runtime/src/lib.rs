//! Environment probing for skipgate.
//!
//! [`DefaultEnvironmentProbe`] implements the core probe port by running
//! `nvidia-smi` and a Python interpreter, with `SKIPGATE_*` overrides for
//! machines where those tools are absent or should be bypassed.
//! [`shared_facts`] collects the facts once per process.
#![deny(unused_crate_dependencies)]

// Used by the integration tests
#[cfg(test)]
use serde_json as _;

pub mod probe;
pub mod shared;

pub use probe::DefaultEnvironmentProbe;
pub use shared::{create_skipif, shared_evaluator, shared_facts, shared_settings};
