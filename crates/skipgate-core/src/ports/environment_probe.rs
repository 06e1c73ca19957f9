//! Environment probe port for GPU, package and backend detection.
//!
//! This port abstracts the three read-only environment queries the
//! aggregator depends on. Implementations live in adapters
//! (e.g., `skipgate-runtime`); tests use fixed facts or a mock.

use thiserror::Error;

use crate::domain::{BackendSupport, Version, VersionError};

/// Errors that can occur while probing the environment.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Failed to execute a probing command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// The package has no installed distribution metadata.
    #[error("Package `{package}` not found: {reason}")]
    PackageNotFound { package: String, reason: String },

    /// Installed version metadata could not be parsed.
    #[error("Version parse failed for {package}: {source}")]
    VersionParseFailed {
        package: String,
        #[source]
        source: VersionError,
    },

    /// An override environment variable held an unusable value.
    #[error("Invalid value for {var}: `{value}`")]
    InvalidOverride { var: String, value: String },
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Port for the environment queries behind skip decisions.
///
/// # Example
///
/// ```ignore
/// use skipgate_core::{EnvironmentFacts, SkipSettings};
/// use skipgate_core::ports::EnvironmentProbePort;
///
/// fn snapshot(probe: &dyn EnvironmentProbePort) -> EnvironmentFacts {
///     EnvironmentFacts::collect(probe, &SkipSettings::with_defaults())
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentProbePort: Send + Sync {
    /// Number of GPU devices visible to the process.
    fn gpu_count(&self) -> ProbeResult<u32>;

    /// Installed version of `package`.
    fn package_version(&self, package: &str) -> ProbeResult<Version>;

    /// Quantization engines the numeric library can select.
    fn quantization_support(&self) -> ProbeResult<BackendSupport>;
}
