//! Integration tests for skip decisions through the public API.

use skipgate_core::{
    BackendSupport, EnvironmentFacts, NO_REASON, QueryFailurePolicy, SkipDecision, SkipEvaluator,
    SkipRequest, SkipSettings, Version, evaluate, evaluate_requirements, skip_if,
};

fn workstation() -> EnvironmentFacts {
    EnvironmentFacts::builder()
        .gpu_count(1)
        .library("torch", Version::parse_installed("1.8.1+cu111").unwrap())
        .quantization(BackendSupport::from_engines(["none", "qnnpack"]))
        .build()
}

#[test]
fn test_no_requirements_in_any_environment() {
    for facts in [workstation(), EnvironmentFacts::builder().build()] {
        let decision = evaluate_requirements(&facts, &SkipSettings::default(), 0, None, false)
            .unwrap();
        assert!(!decision.should_skip);
        assert_eq!(decision.reason, NO_REASON);
    }
}

#[test]
fn test_impossible_minimum_version_skips() {
    let decision = evaluate(
        &workstation(),
        &SkipRequest::new().with_min_version_str("9999.0.0").unwrap(),
    )
    .unwrap();
    assert!(decision.should_skip);
    assert!(decision.reason.contains("minimal version"));
}

#[test]
fn test_zero_minimum_version_runs() {
    let decision = evaluate(
        &workstation(),
        &SkipRequest::new().with_min_version_str("0.0.0").unwrap(),
    )
    .unwrap();
    assert!(!decision.should_skip);
}

#[test]
fn test_all_requirements_unmet_combine_in_declaration_order() {
    let request = SkipRequest::new()
        .with_min_gpus(2)
        .with_min_version_str("1.10")
        .unwrap()
        .requiring_feature();
    let decision = evaluate(&workstation(), &request).unwrap();

    assert_eq!(
        decision.reason,
        "test requires multi-GPU machine with at least 2 \
         + minimal version `torch>=1.10 \
         + optional backend feature"
    );
    assert_eq!(
        serde_json::to_value(&decision).unwrap(),
        serde_json::json!({ "condition": true, "reason": decision.reason.clone() })
    );
}

#[test]
fn test_repeat_evaluation_is_stable() {
    let facts = workstation();
    let settings = SkipSettings::default();
    let evaluator = SkipEvaluator::new(&facts, &settings);
    let request = SkipRequest::new().with_min_gpus(2).requiring_feature();
    assert_eq!(evaluator.evaluate(&request), evaluator.evaluate(&request));
}

#[test]
fn test_missing_library_under_each_policy() {
    let facts = EnvironmentFacts::builder()
        .gpu_count(8)
        .library_unavailable("torch", "Package `torch` not found")
        .build();
    let request = SkipRequest::new().with_min_version_str("1.0").unwrap();

    let outcome = |policy| {
        let settings = SkipSettings {
            on_query_failure: policy,
            ..SkipSettings::default()
        };
        SkipEvaluator::new(&facts, &settings).evaluate(&request)
    };

    assert_eq!(outcome(QueryFailurePolicy::Proceed), Ok(SkipDecision::proceed()));
    assert!(outcome(QueryFailurePolicy::Skip).unwrap().should_skip);
    assert!(outcome(QueryFailurePolicy::Fail).is_err());
}

#[test]
fn test_guard_skips_test_body() {
    let decision = evaluate(&workstation(), &SkipRequest::new().with_min_gpus(4)).unwrap();
    skip_if!(decision);
    panic!("a single-GPU workstation must skip a four-GPU test");
}
