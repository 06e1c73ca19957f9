//! Declarative requirements a test places on its environment.

use super::version::{Version, VersionError};

/// Requirements for one test invocation.
///
/// Built fresh per test and consumed by the aggregator. The default request
/// has no requirements and never skips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipRequest {
    /// Minimum GPU count; `0` means no GPU requirement.
    pub min_gpus: u32,
    /// Minimum installed library version.
    pub min_version: Option<Version>,
    /// Require the optional quantization backend.
    pub require_feature: bool,
}

impl SkipRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_min_gpus(mut self, min_gpus: u32) -> Self {
        self.min_gpus = min_gpus;
        self
    }

    #[must_use]
    pub fn with_min_version(mut self, version: Version) -> Self {
        self.min_version = Some(version);
        self
    }

    /// Parse and set the minimum version, rejecting malformed input.
    pub fn with_min_version_str(self, version: &str) -> Result<Self, VersionError> {
        Ok(self.with_min_version(version.parse()?))
    }

    #[must_use]
    pub const fn requiring_feature(mut self) -> Self {
        self.require_feature = true;
        self
    }

    /// Whether any requirement is active.
    pub const fn has_requirements(&self) -> bool {
        self.min_gpus != 0 || self.min_version.is_some() || self.require_feature
    }
}
