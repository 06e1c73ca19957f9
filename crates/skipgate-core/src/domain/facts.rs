//! Read-only snapshot of the environment a test suite runs in.
//!
//! Facts are collected once from an [`EnvironmentProbePort`] and then passed
//! by reference into the aggregator. A probe failure does not abort
//! collection; the affected fact is recorded as [`Fact::Unavailable`] and
//! the aggregator's failure policy decides what that means for a request.

use std::collections::BTreeSet;

use serde::Serialize;

use super::version::Version;
use crate::ports::{EnvironmentProbePort, ProbeError};
use crate::settings::SkipSettings;

/// Engine name that marks a build without any usable quantized engine.
pub const NO_ENGINE: &str = "none";

/// One environment observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Fact<T> {
    /// The probe answered.
    Known(T),
    /// The probe failed; the message says why.
    Unavailable(String),
}

impl<T> Fact<T> {
    /// The observed value, if any.
    pub const fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl<T> From<Result<T, ProbeError>> for Fact<T> {
    fn from(result: Result<T, ProbeError>) -> Self {
        match result {
            Ok(value) => Self::Known(value),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }
}

/// Quantization backend support reported by the numeric library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackendSupport {
    /// The library was built with quantization support.
    pub compiled_in: bool,
    /// Engines the runtime can select.
    pub engines: BTreeSet<String>,
}

impl BackendSupport {
    /// Build from the engine list the library reports.
    ///
    /// Support counts as compiled in when at least one engine other than
    /// [`NO_ENGINE`] is listed.
    pub fn from_engines<I, S>(engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let engines: BTreeSet<String> = engines.into_iter().map(Into::into).collect();
        let compiled_in = engines.iter().any(|engine| engine != NO_ENGINE);
        Self {
            compiled_in,
            engines,
        }
    }

    /// Whether `engine` is compiled in and selectable.
    pub fn supports(&self, engine: &str) -> bool {
        self.compiled_in && self.engines.contains(engine)
    }
}

/// Everything the aggregator may ask about the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentFacts {
    /// Number of visible GPU devices.
    pub gpu_count: Fact<u32>,
    /// Name of the numeric library whose version was probed.
    pub library: String,
    /// Installed version of `library`.
    pub library_version: Fact<Version>,
    /// Quantization backend availability.
    pub quantization: Fact<BackendSupport>,
}

impl EnvironmentFacts {
    /// Query every fact once from `probe`.
    pub fn collect(probe: &dyn EnvironmentProbePort, settings: &SkipSettings) -> Self {
        let gpu_count = Fact::from(probe.gpu_count());
        let library_version = Fact::from(probe.package_version(&settings.package));
        let quantization = Fact::from(probe.quantization_support());

        if let Fact::Unavailable(reason) = &gpu_count {
            tracing::debug!(%reason, "GPU count unavailable");
        }
        if let Fact::Unavailable(reason) = &library_version {
            tracing::debug!(package = %settings.package, %reason, "package version unavailable");
        }
        if let Fact::Unavailable(reason) = &quantization {
            tracing::debug!(%reason, "quantization support unavailable");
        }

        let facts = Self {
            gpu_count,
            library: settings.package.clone(),
            library_version,
            quantization,
        };
        tracing::debug!(?facts, "collected environment facts");
        facts
    }

    /// Start building a fixed set of facts.
    pub fn builder() -> EnvironmentFactsBuilder {
        EnvironmentFactsBuilder::default()
    }
}

/// Builder for fixed facts; anything not set stays unavailable.
#[derive(Debug, Clone)]
pub struct EnvironmentFactsBuilder {
    facts: EnvironmentFacts,
}

impl Default for EnvironmentFactsBuilder {
    fn default() -> Self {
        let unset = || "not probed".to_string();
        Self {
            facts: EnvironmentFacts {
                gpu_count: Fact::Unavailable(unset()),
                library: SkipSettings::DEFAULT_PACKAGE.to_string(),
                library_version: Fact::Unavailable(unset()),
                quantization: Fact::Unavailable(unset()),
            },
        }
    }
}

impl EnvironmentFactsBuilder {
    #[must_use]
    pub fn gpu_count(mut self, count: u32) -> Self {
        self.facts.gpu_count = Fact::Known(count);
        self
    }

    #[must_use]
    pub fn library(mut self, name: impl Into<String>, version: Version) -> Self {
        self.facts.library = name.into();
        self.facts.library_version = Fact::Known(version);
        self
    }

    #[must_use]
    pub fn quantization(mut self, support: BackendSupport) -> Self {
        self.facts.quantization = Fact::Known(support);
        self
    }

    /// Mark the GPU count as unavailable.
    #[must_use]
    pub fn gpu_count_unavailable(mut self, reason: impl Into<String>) -> Self {
        self.facts.gpu_count = Fact::Unavailable(reason.into());
        self
    }

    /// Mark the library version as unavailable.
    #[must_use]
    pub fn library_unavailable(
        mut self,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.facts.library = name.into();
        self.facts.library_version = Fact::Unavailable(reason.into());
        self
    }

    pub fn build(self) -> EnvironmentFacts {
        self.facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockEnvironmentProbePort;

    #[test]
    fn test_backend_support_from_engines() {
        let support = BackendSupport::from_engines(["qnnpack", "fbgemm"]);
        assert!(support.compiled_in);
        assert!(support.supports("fbgemm"));
        assert!(!support.supports("onednn"));

        let none_only = BackendSupport::from_engines(["none"]);
        assert!(!none_only.compiled_in);
        assert!(!none_only.supports("none"));

        assert!(!BackendSupport::from_engines(Vec::<String>::new()).compiled_in);
    }

    #[test]
    fn test_collect_queries_each_fact_once() {
        let mut probe = MockEnvironmentProbePort::new();
        probe.expect_gpu_count().times(1).returning(|| Ok(4));
        probe
            .expect_package_version()
            .withf(|package| package == "torch")
            .times(1)
            .returning(|_| Ok("2.1.0".parse().unwrap()));
        probe
            .expect_quantization_support()
            .times(1)
            .returning(|| Ok(BackendSupport::from_engines(["fbgemm"])));

        let facts = EnvironmentFacts::collect(&probe, &SkipSettings::with_defaults());

        assert_eq!(facts.gpu_count, Fact::Known(4));
        assert_eq!(facts.library, "torch");
        assert_eq!(
            facts.library_version.known().map(Version::as_str),
            Some("2.1.0")
        );
        assert!(facts.quantization.known().unwrap().supports("fbgemm"));
    }

    #[test]
    fn test_collect_records_failures_as_unavailable() {
        let mut probe = MockEnvironmentProbePort::new();
        probe.expect_gpu_count().returning(|| Ok(0));
        probe.expect_package_version().returning(|package| {
            Err(ProbeError::PackageNotFound {
                package: package.to_string(),
                reason: "No package metadata was found".to_string(),
            })
        });
        probe
            .expect_quantization_support()
            .returning(|| Err(ProbeError::CommandFailed("python3: not found".to_string())));

        let facts = EnvironmentFacts::collect(&probe, &SkipSettings::with_defaults());

        assert!(facts.gpu_count.is_known());
        assert!(matches!(
            facts.library_version,
            Fact::Unavailable(ref reason) if reason.contains("torch")
        ));
        assert!(!facts.quantization.is_known());
    }

    #[test]
    fn test_builder_defaults_are_unavailable() {
        let facts = EnvironmentFacts::builder().gpu_count(1).build();
        assert_eq!(facts.gpu_count, Fact::Known(1));
        assert!(!facts.library_version.is_known());
        assert!(!facts.quantization.is_known());
    }

    #[test]
    fn test_facts_serialize_with_status_tags() {
        let facts = EnvironmentFacts::builder()
            .gpu_count(2)
            .library("torch", "1.8.1".parse().unwrap())
            .build();
        let json = serde_json::to_value(&facts).unwrap();
        assert_eq!(json["gpu_count"]["status"], "known");
        assert_eq!(json["gpu_count"]["value"], 2);
        assert_eq!(json["library_version"]["value"], "1.8.1");
        assert_eq!(json["quantization"]["status"], "unavailable");
    }
}
