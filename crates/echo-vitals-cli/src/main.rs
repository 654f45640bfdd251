//! EchoVitals CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use echo_vitals_cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => {
            echo_vitals_cli::analyze::execute(args)?;
        }
        Commands::Version => {
            println!("echo-vitals {}", env!("CARGO_PKG_VERSION"));
            println!("core version: {}", echo_vitals_core::VERSION);
            println!("pipeline version: {}", echo_vitals_pipeline::VERSION);
        }
    }

    Ok(())
}
