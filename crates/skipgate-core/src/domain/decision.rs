//! The outcome handed to a test runner's skip mechanism.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reason reported when nothing needs skipping.
pub const NO_REASON: &str = "no reason, just go test it...";

/// Prefix of every skip reason.
pub const REASON_PREAMBLE: &str = "test requires ";

/// Whether to skip a test, and why.
///
/// Serializes as `{"condition": bool, "reason": string}`, the two named
/// arguments a declarative skip marker expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipDecision {
    #[serde(rename = "condition")]
    pub should_skip: bool,
    pub reason: String,
}

impl SkipDecision {
    /// Decision to run the test.
    pub fn proceed() -> Self {
        Self {
            should_skip: false,
            reason: NO_REASON.to_string(),
        }
    }

    /// Decision to skip, listing the unmet requirements in order.
    ///
    /// Falls back to [`SkipDecision::proceed`] when `unmet` is empty.
    pub fn skip<I, S>(unmet: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unmet: Vec<S> = unmet.into_iter().collect();
        if unmet.is_empty() {
            return Self::proceed();
        }
        let parts: Vec<&str> = unmet.iter().map(AsRef::as_ref).collect();
        let joined = parts.join(" + ");
        Self {
            should_skip: true,
            reason: format!("{REASON_PREAMBLE}{joined}"),
        }
    }

    /// The `(condition, reason)` pair for a skip marker.
    pub fn as_skip_args(&self) -> (bool, &str) {
        (self.should_skip, &self.reason)
    }

    /// Report a skip to the log and to stderr, where test harnesses show it.
    pub fn announce(&self) {
        tracing::info!(reason = %self.reason, "skipping test");
        eprintln!("skipped: {}", self.reason);
    }
}

impl fmt::Display for SkipDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.should_skip { "skip" } else { "run" };
        write!(f, "{verdict}: {}", self.reason)
    }
}
