//! Integration tests against the machine running the test suite.
//!
//! Assertions hold whatever hardware or packages are installed: they only
//! rely on properties every environment shares.

use skipgate_core::{GpuThresholdMode, NO_REASON, QueryFailurePolicy, SkipError, skip_if};
use skipgate_runtime::{create_skipif, shared_evaluator, shared_facts, shared_settings};

#[test]
fn test_facts_are_collected_once() {
    assert!(std::ptr::eq(shared_facts().unwrap(), shared_facts().unwrap()));
    assert!(std::ptr::eq(
        shared_settings().unwrap(),
        shared_settings().unwrap()
    ));
}

#[test]
fn test_no_requirements_always_run() {
    let decision = create_skipif(0, None, false).unwrap();
    assert!(!decision.should_skip);
    assert_eq!(decision.reason, NO_REASON);
}

#[test]
fn test_zero_minimum_version_runs() {
    let known = shared_facts().unwrap().library_version.is_known();
    let policy = shared_settings().unwrap().on_query_failure;

    match create_skipif(0, Some("0.0.0"), false) {
        Ok(decision) => {
            if known || policy == QueryFailurePolicy::Proceed {
                assert!(!decision.should_skip, "{decision}");
            }
        }
        Err(e) => {
            assert!(!known);
            assert_eq!(policy, QueryFailurePolicy::Fail);
            assert!(matches!(e, SkipError::FactUnavailable { fact: "library_version", .. }));
        }
    }
}

#[test]
fn test_impossible_minimum_version_skips_when_installed() {
    let result = create_skipif(0, Some("9999.0.0"), false);
    if shared_facts().unwrap().library_version.is_known() {
        let decision = result.unwrap();
        assert!(decision.should_skip);
        assert!(decision.reason.contains("minimal version"));
    }
}

#[test]
fn test_malformed_version_is_rejected() {
    assert!(matches!(
        create_skipif(0, Some("latest"), false),
        Err(SkipError::InvalidVersion(_))
    ));
}

#[test]
fn test_repeat_calls_agree() {
    let first = create_skipif(2, Some("1.8"), true);
    let second = create_skipif(2, Some("1.8"), true);
    assert_eq!(first, second);
    assert_eq!(
        shared_evaluator()
            .unwrap()
            .evaluate(&skipgate_core::SkipRequest::new()),
        create_skipif(0, None, false)
    );
}

#[test]
fn test_facts_serialize() {
    let json = serde_json::to_value(shared_facts().unwrap()).unwrap();
    assert!(json.get("gpu_count").is_some());
    assert_eq!(json["library"], shared_settings().unwrap().package.as_str());
}

#[test]
fn test_guard_on_unreachable_gpu_count() {
    let settings = shared_settings().unwrap();
    // The legacy threshold never looks at the requested count.
    if settings.gpu_threshold != GpuThresholdMode::Requested
        || !shared_facts().unwrap().gpu_count.is_known()
    {
        return;
    }
    skip_if!(create_skipif(u32::MAX, None, false).unwrap());
    panic!("no machine has u32::MAX GPUs");
}
