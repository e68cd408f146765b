use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber. Call once, from `main`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let directive = format!("vault_handoff={}", config.level.as_str())
        .parse::<Directive>()
        .context("Invalid log directive")?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file '{}'", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.with_ansi(ansi).try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}
