//! Command handlers.
//!
//! Handlers take already-collected facts and return the text to print, so
//! they run against fixed facts in tests.

use std::path::Path;

use anyhow::{Context, Result};
use skipgate_core::{EnvironmentFacts, SkipSettings, evaluate_requirements};

use crate::commands::CheckArgs;

/// Resolve settings from an explicit file or the process environment.
pub fn load_settings(path: Option<&Path>) -> Result<SkipSettings> {
    match path {
        Some(path) => SkipSettings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => SkipSettings::from_env().context("reading SKIPGATE_* settings"),
    }
}

/// Evaluate `args` and format the decision.
pub fn check(
    args: &CheckArgs,
    facts: &EnvironmentFacts,
    settings: &SkipSettings,
) -> Result<String> {
    let decision = evaluate_requirements(
        facts,
        settings,
        args.min_gpus,
        args.min_version.as_deref(),
        args.require_feature,
    )?;

    if args.json {
        return Ok(serde_json::to_string(&decision)?);
    }
    let (condition, reason) = decision.as_skip_args();
    Ok(format!("condition: {condition}\nreason: {reason}"))
}

/// Format collected facts as pretty JSON.
pub fn facts(facts: &EnvironmentFacts) -> Result<String> {
    Ok(serde_json::to_string_pretty(facts)?)
}
