//! Subcommand definitions.

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate requirements and print the skip decision
    Check(CheckArgs),
    /// Print the environment facts collected on this machine
    Facts,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Minimum number of GPUs (0 = no GPU requirement)
    #[arg(long = "min-gpus", default_value_t = 0)]
    pub min_gpus: u32,

    /// Minimum installed library version, e.g. 1.8.0
    #[arg(long = "min-version")]
    pub min_version: Option<String>,

    /// Require the optional quantization backend
    #[arg(long = "require-feature")]
    pub require_feature: bool,

    /// Print the decision as a JSON object
    #[arg(long = "json")]
    pub json: bool,
}
