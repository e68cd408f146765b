use clap::Parser;
use tracing::info;
use vault_handoff::cli::Cli;
use vault_handoff::config::{Config, Credentials};
use vault_handoff::handoff;
use vault_handoff::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse();
    let config = Config::load(&cli)?;
    logging::init(&config.logging)?;

    match &config.source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults and flags"),
    }

    let credentials = Credentials::new(cli.wrapping_token.take(), cli.value.take())?;
    handoff::run_once(&config, credentials).await?;
    info!("Credential handoff complete");

    Ok(())
}
