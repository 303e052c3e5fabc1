mod cli;
mod commands;
mod config;
mod session;
mod session_store;

use anyhow::Result;
use clap::Parser;
use fitlog::FitlogClient;

use cli::Cli;
use config::CliConfig;
use session::SessionManager;
use session_store::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load()?;
    tracing::debug!(api_url = %config.api_url, "loaded configuration");

    let client = FitlogClient::new(config.api_url);
    let sessions = SessionManager::new(SessionStore::open_default()?);
    sessions.attach(&client)?;

    commands::run(cli.command, &client, &sessions).await
}
