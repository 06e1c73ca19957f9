//! Early-return guard for Rust tests.

/// Return from the enclosing test when a [`SkipDecision`](crate::SkipDecision)
/// says to skip.
///
/// The second form returns the given value instead of `()`, for tests that
/// return `Result`.
///
/// ```
/// use skipgate_core::{EnvironmentFacts, SkipRequest, evaluate, skip_if};
///
/// fn needs_two_gpus() -> Result<(), Box<dyn std::error::Error>> {
///     let facts = EnvironmentFacts::builder().gpu_count(0).build();
///     let decision = evaluate(&facts, &SkipRequest::new().with_min_gpus(2))?;
///     skip_if!(decision, Ok(()));
///     unreachable!("skipped above");
/// }
///
/// needs_two_gpus().unwrap();
/// ```
#[macro_export]
macro_rules! skip_if {
    ($decision:expr) => {{
        let decision = &$decision;
        if decision.should_skip {
            decision.announce();
            return;
        }
    }};
    ($decision:expr, $ret:expr) => {{
        let decision = &$decision;
        if decision.should_skip {
            decision.announce();
            return $ret;
        }
    }};
}
