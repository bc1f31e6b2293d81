//! Terminal front-end for the scheda project dashboard
//!
//! Rendered pages go to stdout; notices, prompts and logs go to stderr.

mod cli;
mod commands;
mod config;
mod output;
mod terminal;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::commands::App;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheda=info,scheda_core=info,scheda_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    config.assume_yes |= cli.yes;
    tracing::debug!("Using API at {}", config.api_url);

    let app = App::new(config, cli.json)?;
    app.run(cli.command).await
}
