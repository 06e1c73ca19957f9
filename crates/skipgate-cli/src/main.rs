use anyhow::Result;
use clap::Parser;
use skipgate_cli::{Cli, Commands, handlers};
use skipgate_core::EnvironmentFacts;
use skipgate_runtime::DefaultEnvironmentProbe;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = handlers::load_settings(cli.settings.as_deref())?;
    let probe = DefaultEnvironmentProbe::from_settings(&settings);
    let facts = EnvironmentFacts::collect(&probe, &settings);

    let output = match cli.command {
        Commands::Check(args) => handlers::check(&args, &facts, &settings)?,
        Commands::Facts => handlers::facts(&facts)?,
    };
    println!("{output}");
    Ok(())
}
