//! Settings for fact collection and skip evaluation.
//!
//! Defaults reproduce the behavior test suites expect out of the box. Every
//! field can be overridden from `SKIPGATE_*` environment variables or a JSON
//! settings file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the GPU requirement picks its threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpuThresholdMode {
    /// Compare against the requested minimum.
    #[default]
    Requested,
    /// Compare against a fixed threshold of two GPUs whatever was requested,
    /// for parity with suites written against that behavior.
    Legacy,
}

impl GpuThresholdMode {
    /// Threshold used by [`GpuThresholdMode::Legacy`].
    pub const LEGACY_THRESHOLD: u32 = 2;

    /// Effective threshold for a requested minimum.
    pub const fn threshold(self, requested: u32) -> u32 {
        match self {
            Self::Requested => requested,
            Self::Legacy => Self::LEGACY_THRESHOLD,
        }
    }
}

impl FromStr for GpuThresholdMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "requested" => Ok(Self::Requested),
            "legacy" => Ok(Self::Legacy),
            other => Err(SettingsError::UnknownGpuThreshold(other.to_string())),
        }
    }
}

impl fmt::Display for GpuThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Requested => "requested",
            Self::Legacy => "legacy",
        })
    }
}

/// What an unavailable environment fact means for a requirement that needs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFailurePolicy {
    /// The requirement does not trigger; the test runs.
    #[default]
    Proceed,
    /// The requirement triggers; the test is skipped.
    Skip,
    /// Evaluation fails with an error.
    Fail,
}

impl FromStr for QueryFailurePolicy {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proceed" => Ok(Self::Proceed),
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            other => Err(SettingsError::UnknownFailurePolicy(other.to_string())),
        }
    }
}

impl fmt::Display for QueryFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Proceed => "proceed",
            Self::Skip => "skip",
            Self::Fail => "fail",
        })
    }
}

/// Skipgate settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SkipSettings {
    /// Distribution name whose installed version is compared.
    pub package: String,

    /// Quantized engine that must be selectable for the backend requirement.
    pub engine: String,

    /// Interpreter used to read package metadata.
    pub python: String,

    pub gpu_threshold: GpuThresholdMode,

    pub on_query_failure: QueryFailurePolicy,
}

impl SkipSettings {
    pub const DEFAULT_PACKAGE: &'static str = "torch";
    pub const DEFAULT_ENGINE: &'static str = "fbgemm";
    pub const DEFAULT_PYTHON: &'static str = "python3";

    pub const ENV_PACKAGE: &'static str = "SKIPGATE_PACKAGE";
    pub const ENV_ENGINE: &'static str = "SKIPGATE_ENGINE";
    pub const ENV_PYTHON: &'static str = "SKIPGATE_PYTHON";
    pub const ENV_GPU_THRESHOLD: &'static str = "SKIPGATE_GPU_THRESHOLD";
    pub const ENV_ON_QUERY_FAILURE: &'static str = "SKIPGATE_ON_QUERY_FAILURE";

    /// Create settings with the default package, engine and policies.
    pub fn with_defaults() -> Self {
        Self {
            package: Self::DEFAULT_PACKAGE.to_string(),
            engine: Self::DEFAULT_ENGINE.to_string(),
            python: Self::DEFAULT_PYTHON.to_string(),
            gpu_threshold: GpuThresholdMode::default(),
            on_query_failure: QueryFailurePolicy::default(),
        }
    }

    /// Defaults overridden by `SKIPGATE_*` process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::with_defaults();
        if let Some(package) = lookup(Self::ENV_PACKAGE) {
            settings.package = package.trim().to_string();
        }
        if let Some(engine) = lookup(Self::ENV_ENGINE) {
            settings.engine = engine.trim().to_string();
        }
        if let Some(python) = lookup(Self::ENV_PYTHON) {
            settings.python = python.trim().to_string();
        }
        if let Some(mode) = lookup(Self::ENV_GPU_THRESHOLD) {
            settings.gpu_threshold = mode.parse()?;
        }
        if let Some(policy) = lookup(Self::ENV_ON_QUERY_FAILURE) {
            settings.on_query_failure = policy.parse()?;
        }
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Load settings from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let settings: Self = serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        validate_settings(&settings)?;
        Ok(settings)
    }
}

impl Default for SkipSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Package name cannot be empty")]
    EmptyPackage,

    #[error("Engine name cannot be empty")]
    EmptyEngine,

    #[error("Interpreter cannot be empty")]
    EmptyPython,

    #[error("Unknown GPU threshold mode `{0}` (expected `requested` or `legacy`)")]
    UnknownGpuThreshold(String),

    #[error("Unknown query failure policy `{0}` (expected `proceed`, `skip` or `fail`)")]
    UnknownFailurePolicy(String),

    #[error("Failed to read settings file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse settings file {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &SkipSettings) -> Result<(), SettingsError> {
    if settings.package.trim().is_empty() {
        return Err(SettingsError::EmptyPackage);
    }
    if settings.engine.trim().is_empty() {
        return Err(SettingsError::EmptyEngine);
    }
    if settings.python.trim().is_empty() {
        return Err(SettingsError::EmptyPython);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = SkipSettings::with_defaults();
        assert_eq!(settings.package, "torch");
        assert_eq!(settings.engine, "fbgemm");
        assert_eq!(settings.python, "python3");
        assert_eq!(settings.gpu_threshold, GpuThresholdMode::Requested);
        assert_eq!(settings.on_query_failure, QueryFailurePolicy::Proceed);
        assert_eq!(SkipSettings::default(), settings);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_gpu_threshold() {
        assert_eq!(GpuThresholdMode::Requested.threshold(4), 4);
        assert_eq!(GpuThresholdMode::Legacy.threshold(4), 2);
        assert_eq!(GpuThresholdMode::Legacy.threshold(1), 2);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let settings = SkipSettings::from_lookup(lookup_from(&[
            ("SKIPGATE_PACKAGE", "jax"),
            ("SKIPGATE_ENGINE", " qnnpack "),
            ("SKIPGATE_GPU_THRESHOLD", "Legacy"),
            ("SKIPGATE_ON_QUERY_FAILURE", "fail"),
        ]))
        .unwrap();

        assert_eq!(settings.package, "jax");
        assert_eq!(settings.engine, "qnnpack");
        assert_eq!(settings.python, "python3");
        assert_eq!(settings.gpu_threshold, GpuThresholdMode::Legacy);
        assert_eq!(settings.on_query_failure, QueryFailurePolicy::Fail);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert_eq!(
            SkipSettings::from_lookup(lookup_from(&[("SKIPGATE_ON_QUERY_FAILURE", "retry")])),
            Err(SettingsError::UnknownFailurePolicy("retry".to_string()))
        );
        assert_eq!(
            SkipSettings::from_lookup(lookup_from(&[("SKIPGATE_GPU_THRESHOLD", "fixed")])),
            Err(SettingsError::UnknownGpuThreshold("fixed".to_string()))
        );
        assert_eq!(
            SkipSettings::from_lookup(lookup_from(&[("SKIPGATE_PACKAGE", "  ")])),
            Err(SettingsError::EmptyPackage)
        );
    }

    #[test]
    fn test_from_json_file_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"engine": "onednn", "on_query_failure": "skip"}}"#).unwrap();

        let settings = SkipSettings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.package, "torch");
        assert_eq!(settings.engine, "onednn");
        assert_eq!(settings.on_query_failure, QueryFailurePolicy::Skip);
    }

    #[test]
    fn test_from_json_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            SkipSettings::from_json_file(file.path()),
            Err(SettingsError::Parse { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SkipSettings::from_json_file(&dir.path().join("missing.json")),
            Err(SettingsError::Io { .. })
        ));

        let mut empty_engine = tempfile::NamedTempFile::new().unwrap();
        write!(empty_engine, r#"{{"engine": ""}}"#).unwrap();
        assert_eq!(
            SkipSettings::from_json_file(empty_engine.path()),
            Err(SettingsError::EmptyEngine)
        );
    }
}
