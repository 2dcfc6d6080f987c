//! Amber CLI - command-line client for the Amber storage API

mod cli;
mod commands;

use amber_client::AmberClient;
use clap::Parser;
use cli::Args;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr, stdout is reserved for command output
    let log_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("amber_cli={0},amber_client={0}", log_level).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.client_config();
    tracing::debug!("Using storage API at {}", config.base_url());

    let client = AmberClient::new(config)?;
    let rendered = commands::run(&client, args.command).await?;

    Ok(rendered.print())
}
