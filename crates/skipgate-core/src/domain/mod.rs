//! Domain types for skip decisions.

mod decision;
mod facts;
mod request;
mod version;

pub use decision::{NO_REASON, REASON_PREAMBLE, SkipDecision};
pub use facts::{BackendSupport, EnvironmentFacts, EnvironmentFactsBuilder, Fact, NO_ENGINE};
pub use request::SkipRequest;
pub use version::{Version, VersionError};
