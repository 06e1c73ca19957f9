//! Process-wide settings and facts.
//!
//! Test binaries evaluate many requests against the same machine, so the
//! environment is probed once, on first use, and shared read-only after.
//! Invalid `SKIPGATE_*` settings are cached as an error and reported by
//! every call rather than replaced with defaults.

use std::sync::OnceLock;

use skipgate_core::{
    EnvironmentFacts, SettingsError, SkipDecision, SkipError, SkipEvaluator, SkipSettings,
    evaluate_requirements,
};

use crate::probe::DefaultEnvironmentProbe;

static SETTINGS: OnceLock<Result<SkipSettings, SettingsError>> = OnceLock::new();
static FACTS: OnceLock<EnvironmentFacts> = OnceLock::new();

/// Settings from the process environment.
pub fn shared_settings() -> Result<&'static SkipSettings, SkipError> {
    loaded(SETTINGS.get_or_init(SkipSettings::from_env))
}

fn loaded(settings: &Result<SkipSettings, SettingsError>) -> Result<&SkipSettings, SkipError> {
    settings.as_ref().map_err(|e| {
        tracing::error!(error = %e, "invalid skipgate settings in environment");
        SkipError::Settings(e.clone())
    })
}

/// Facts about this machine, probed on first call.
pub fn shared_facts() -> Result<&'static EnvironmentFacts, SkipError> {
    let settings = shared_settings()?;
    Ok(FACTS.get_or_init(|| {
        EnvironmentFacts::collect(&DefaultEnvironmentProbe::from_settings(settings), settings)
    }))
}

/// Evaluator over the shared facts and settings.
pub fn shared_evaluator() -> Result<SkipEvaluator<'static>, SkipError> {
    Ok(SkipEvaluator::new(shared_facts()?, shared_settings()?))
}

/// Skip decision for this machine.
///
/// ```ignore
/// #[test]
/// fn test_ddp_fit() {
///     skip_if!(create_skipif(2, Some("1.8.0"), false).unwrap());
///     // ...
/// }
/// ```
pub fn create_skipif(
    min_gpus: u32,
    min_version: Option<&str>,
    require_feature: bool,
) -> Result<SkipDecision, SkipError> {
    evaluate_requirements(
        shared_facts()?,
        shared_settings()?,
        min_gpus,
        min_version,
        require_feature,
    )
}
