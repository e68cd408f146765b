use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::LoggingLevel;

/// Redeem a Vault wrapping token, write one secret with it, then revoke it.
#[derive(Parser, Debug)]
#[command(name = "vault-handoff", version, about = "One-shot Vault credential handoff")]
pub struct Cli {
    /// Vault endpoint, e.g. https://vault.example.com:8200
    #[arg(short = 'v', long, env = "VAULT_ADDR")]
    pub vault_url: Option<String>,

    /// Single-use wrapping token
    #[arg(
        short = 'w',
        long,
        env = "VAULT_HANDOFF_WRAPPING_TOKEN",
        hide_env_values = true
    )]
    pub wrapping_token: Option<String>,

    /// Secret path below the KV mount
    #[arg(short = 's', long, env = "VAULT_HANDOFF_SECRET_PATH")]
    pub secret_path: Option<String>,

    /// Key name inside the secret [default: luks]
    #[arg(long, env = "VAULT_HANDOFF_KEY")]
    pub key: Option<String>,

    /// Value to store, e.g. a disk passphrase
    #[arg(long, env = "VAULT_HANDOFF_VALUE", hide_env_values = true)]
    pub value: Option<String>,

    /// KV v2 mount point [default: secrets]
    #[arg(long, env = "VAULT_HANDOFF_MOUNT")]
    pub mount: Option<String>,

    /// Skip TLS certificate verification
    #[arg(
        long,
        env = "VAULT_SKIP_VERIFY",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub tls_skip_verify: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "VAULT_HANDOFF_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Configuration file (json, json5, yaml or toml)
    #[arg(short, long, env = "VAULT_HANDOFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long)]
    pub log_level: Option<LoggingLevel>,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "VAULT_HANDOFF_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    pub log_json: bool,
}
