//! Skip-condition aggregator.
//!
//! Evaluates each active requirement of a [`SkipRequest`] against
//! [`EnvironmentFacts`] and folds the results into one [`SkipDecision`].
//! Requirements are checked in a fixed order (GPUs, version, backend) and
//! only the unmet ones appear in the reason.

use thiserror::Error;

use crate::domain::{EnvironmentFacts, Fact, SkipDecision, SkipRequest, Version, VersionError};
use crate::settings::{GpuThresholdMode, QueryFailurePolicy, SettingsError, SkipSettings};

/// Description of the backend requirement.
pub const FEATURE_REASON: &str = "optional backend feature";

/// Errors from skip evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipError {
    /// A caller-supplied version was malformed.
    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    /// Settings could not be loaded.
    #[error("Invalid skipgate settings: {0}")]
    Settings(#[from] SettingsError),

    /// A requirement needed a fact the environment could not provide.
    #[error("Environment fact `{fact}` is unavailable: {reason}")]
    FactUnavailable { fact: &'static str, reason: String },
}

/// Evaluates requests against a fixed environment snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SkipEvaluator<'a> {
    facts: &'a EnvironmentFacts,
    settings: &'a SkipSettings,
}

impl<'a> SkipEvaluator<'a> {
    pub const fn new(facts: &'a EnvironmentFacts, settings: &'a SkipSettings) -> Self {
        Self { facts, settings }
    }

    /// Decide whether a test with these requirements should be skipped.
    pub fn evaluate(&self, request: &SkipRequest) -> Result<SkipDecision, SkipError> {
        let mut checks: Vec<(bool, String)> = Vec::new();

        if request.min_gpus != 0 {
            let threshold = self.gpu_threshold(request.min_gpus);
            checks.push(self.check(
                &self.facts.gpu_count,
                "gpu_count",
                format!("multi-GPU machine with at least {}", request.min_gpus),
                |count| *count < threshold,
            )?);
        }

        if let Some(min_version) = &request.min_version {
            checks.push(self.check(
                &self.facts.library_version,
                "library_version",
                format!("minimal version `{}>={min_version}", self.facts.library),
                |installed: &Version| installed < min_version,
            )?);
        }

        if request.require_feature {
            let engine = self.settings.engine.as_str();
            checks.push(self.check(
                &self.facts.quantization,
                "quantization",
                FEATURE_REASON.to_string(),
                |support| !support.compiled_in || !support.engines.contains(engine),
            )?);
        }

        let unmet: Vec<String> = checks
            .into_iter()
            .filter_map(|(triggered, reason)| triggered.then_some(reason))
            .collect();

        let decision = SkipDecision::skip(unmet);
        tracing::debug!(
            ?request,
            should_skip = decision.should_skip,
            reason = %decision.reason,
            "evaluated skip request"
        );
        Ok(decision)
    }

    fn gpu_threshold(&self, requested: u32) -> u32 {
        let mode = self.settings.gpu_threshold;
        if mode == GpuThresholdMode::Legacy && requested != GpuThresholdMode::LEGACY_THRESHOLD {
            tracing::warn!(
                requested,
                threshold = GpuThresholdMode::LEGACY_THRESHOLD,
                "legacy GPU threshold ignores the requested minimum"
            );
        }
        mode.threshold(requested)
    }

    /// Evaluate one requirement, applying the failure policy when its fact
    /// is unavailable.
    fn check<T>(
        &self,
        fact: &Fact<T>,
        name: &'static str,
        reason: String,
        unmet: impl FnOnce(&T) -> bool,
    ) -> Result<(bool, String), SkipError> {
        match fact {
            Fact::Known(value) => Ok((unmet(value), reason)),
            Fact::Unavailable(cause) => match self.settings.on_query_failure {
                QueryFailurePolicy::Proceed => Ok((false, reason)),
                QueryFailurePolicy::Skip => Ok((true, format!("{reason} (unavailable: {cause})"))),
                QueryFailurePolicy::Fail => Err(SkipError::FactUnavailable {
                    fact: name,
                    reason: cause.clone(),
                }),
            },
        }
    }
}

/// Evaluate `request` with default settings.
pub fn evaluate(
    facts: &EnvironmentFacts,
    request: &SkipRequest,
) -> Result<SkipDecision, SkipError> {
    SkipEvaluator::new(facts, &SkipSettings::with_defaults()).evaluate(request)
}

/// Evaluate the three requirements given as plain values.
///
/// `min_gpus == 0` and `min_version == None` disable their requirements; a
/// malformed `min_version` is an error.
pub fn evaluate_requirements(
    facts: &EnvironmentFacts,
    settings: &SkipSettings,
    min_gpus: u32,
    min_version: Option<&str>,
    require_feature: bool,
) -> Result<SkipDecision, SkipError> {
    let mut request = SkipRequest::new().with_min_gpus(min_gpus);
    if let Some(version) = min_version {
        request = request.with_min_version_str(version)?;
    }
    if require_feature {
        request = request.requiring_feature();
    }
    SkipEvaluator::new(facts, settings).evaluate(&request)
}
