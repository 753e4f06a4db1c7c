mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use schluter_core::Coordinator;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let path = config::config_path(&cli.global);
    let file_config = config::load_config(&path)?;
    let settings = config::resolve(file_config, &cli.global, &path)?;

    let client = settings.client()?;
    let coordinator = Arc::new(Coordinator::new(
        client,
        settings.credentials,
        settings.coordinator,
    ));

    tracing::debug!(command = ?cli.command, base_url = %settings.base_url, "dispatching command");
    commands::dispatch(cli.command, coordinator, &cli.global).await
}
