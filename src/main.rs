mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_detect=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.detector_config();

    match &cli.command {
        Commands::Detect { format } => {
            cli::detect(&cli.root, config, format)?;
        }
        Commands::Apply {
            yes,
            dry_run,
            program,
            scope,
        } => {
            cli::apply(&cli.root, config, *yes, *dry_run, program, scope)?;
        }
    }

    Ok(())
}
