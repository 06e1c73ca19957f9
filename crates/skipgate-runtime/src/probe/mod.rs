//! Environment probe implementation for skipgate-runtime.
//!
//! This module provides the `DefaultEnvironmentProbe` which implements
//! `EnvironmentProbePort` from skipgate-core. It probes by running
//! commands; each query can be short-circuited by an environment variable.

mod commands;
mod gpu;
mod package;

use skipgate_core::{
    BackendSupport, EnvironmentProbePort, ProbeError, ProbeResult, SkipSettings, Version,
};

pub use gpu::{count_listed_gpus, count_visible_devices};
pub use package::parse_engine_list;

/// Overrides the detected GPU count.
pub const ENV_GPU_COUNT: &str = "SKIPGATE_GPU_COUNT";
/// Overrides the detected package version.
pub const ENV_PACKAGE_VERSION: &str = "SKIPGATE_PACKAGE_VERSION";
/// Overrides the detected quantized engines; empty means not compiled in.
pub const ENV_QUANTIZED_ENGINES: &str = "SKIPGATE_QUANTIZED_ENGINES";
/// Restricts the GPUs a CUDA runtime may use.
pub const ENV_CUDA_VISIBLE_DEVICES: &str = "CUDA_VISIBLE_DEVICES";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Default implementation of `EnvironmentProbePort`.
///
/// # Example
///
/// ```ignore
/// use skipgate_core::{EnvironmentFacts, SkipSettings};
/// use skipgate_runtime::DefaultEnvironmentProbe;
///
/// let settings = SkipSettings::from_env()?;
/// let probe = DefaultEnvironmentProbe::from_settings(&settings);
/// let facts = EnvironmentFacts::collect(&probe, &settings);
/// ```
pub struct DefaultEnvironmentProbe {
    python: String,
    package: String,
    lookup: EnvLookup,
}

impl DefaultEnvironmentProbe {
    /// Create a probe with default settings reading the process environment.
    pub fn new() -> Self {
        Self::from_settings(&SkipSettings::with_defaults())
    }

    /// Create a probe using the interpreter and package from `settings`.
    pub fn from_settings(settings: &SkipSettings) -> Self {
        Self {
            python: settings.python.clone(),
            package: settings.package.clone(),
            lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Read overrides through `lookup` instead of the process environment.
    #[must_use]
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    fn env(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }
}

impl Default for DefaultEnvironmentProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentProbePort for DefaultEnvironmentProbe {
    fn gpu_count(&self) -> ProbeResult<u32> {
        if let Some(value) = self.env(ENV_GPU_COUNT) {
            return value
                .trim()
                .parse()
                .map_err(|_| ProbeError::InvalidOverride {
                    var: ENV_GPU_COUNT.to_string(),
                    value,
                });
        }

        let visible = self.env(ENV_CUDA_VISIBLE_DEVICES);
        let count = gpu::detect_gpu_count(visible.as_deref());
        tracing::debug!(count, "detected GPUs");
        Ok(count)
    }

    fn package_version(&self, package: &str) -> ProbeResult<Version> {
        if let Some(value) = self.env(ENV_PACKAGE_VERSION) {
            return package::parse_reported_version(package, &value);
        }

        let reported = commands::run_python(&self.python, package::VERSION_SNIPPET, &[package])
            .map_err(|e| ProbeError::PackageNotFound {
                package: package.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(package, version = %reported, "detected package version");
        package::parse_reported_version(package, &reported)
    }

    fn quantization_support(&self) -> ProbeResult<BackendSupport> {
        if let Some(value) = self.env(ENV_QUANTIZED_ENGINES) {
            return Ok(BackendSupport::from_engines(parse_engine_list(&value)));
        }

        let listed =
            commands::run_python(&self.python, package::ENGINES_SNIPPET, &[self.package.as_str()])?;
        let support = BackendSupport::from_engines(parse_engine_list(&listed));
        tracing::debug!(
            package = %self.package,
            compiled_in = support.compiled_in,
            "listed quantized engines"
        );
        Ok(support)
    }
}
