//! Command-line front end for skipgate.
//!
//! Prints the `condition`/`reason` pair for test runners that are not
//! written in Rust, and the collected environment facts for debugging.
#![deny(unused_crate_dependencies)]

pub mod commands;
pub mod handlers;
pub mod parser;

pub use commands::{CheckArgs, Commands};
pub use parser::Cli;

// Used by main.rs binary
use dotenvy as _;
use skipgate_runtime as _;
use tracing_subscriber as _;
