//! Conditional-skip decisions for test suites.
//!
//! A test declares what it needs from the machine (GPUs, a minimum library
//! version, an optional quantization backend); [`SkipEvaluator`] checks
//! those requirements against an [`EnvironmentFacts`] snapshot and returns
//! a [`SkipDecision`] carrying the `condition` and `reason` a skip marker
//! expects.
#![deny(unused_crate_dependencies)]

pub mod aggregator;
pub mod domain;
mod macros;
pub mod ports;
pub mod settings;

pub use aggregator::{FEATURE_REASON, SkipError, SkipEvaluator, evaluate, evaluate_requirements};
pub use domain::{
    BackendSupport, EnvironmentFacts, EnvironmentFactsBuilder, Fact, NO_ENGINE, NO_REASON,
    REASON_PREAMBLE, SkipDecision, SkipRequest, Version, VersionError,
};
pub use ports::{EnvironmentProbePort, ProbeError, ProbeResult};
pub use settings::{
    GpuThresholdMode, QueryFailurePolicy, SettingsError, SkipSettings, validate_settings,
};
