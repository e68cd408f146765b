mod defaults;
mod io;
mod types;
mod validation;

pub use defaults::*;
pub use io::*;
pub use types::*;
pub use validation::*;

use anyhow::{bail, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::Cli;

/// Non-sensitive settings for a handoff run.
///
/// Sensitive inputs (wrapping token, secret value) live in [`Credentials`]
/// and are never read from a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub secret: SecretConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    /// File this configuration was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file and defaults, then apply CLI and
    /// environment overrides.
    ///
    /// Runs before logging is initialized, so it does not log.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file '{}' does not exist", path.display());
                }
                Some(path.clone())
            }
            None => find_config_file(),
        };

        let mut config = match &config_path {
            Some(path) => load_config_file(path)?,
            None => Config::default(),
        };
        config.source = config_path;

        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Apply command-line (and clap-resolved environment) overrides.
    pub fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.vault_url {
            self.vault.url = url.clone();
        }

        if let Some(mount) = &cli.mount {
            self.vault.mount = mount.clone();
        }

        if cli.tls_skip_verify {
            self.vault.tls.verify = false;
        }

        if let Some(secs) = cli.timeout_secs {
            self.vault.timeout_secs = Some(secs);
        }

        if let Some(path) = &cli.secret_path {
            self.secret.path = path.clone();
        }

        if let Some(key) = &cli.key {
            self.secret.key = key.clone();
        }

        if let Some(level) = cli.log_level {
            self.logging.level = level;
        }

        if let Some(file) = &cli.log_file {
            self.logging.file = Some(file.clone());
        }

        if cli.log_json {
            self.logging.json = true;
        }
    }
}

/// Sensitive inputs of a handoff run.
///
/// Both values are redacted in `Debug` output and zeroized on drop.
#[derive(Debug)]
pub struct Credentials {
    pub wrapping_token: SecretString,
    pub value: SecretString,
}

impl Credentials {
    /// Build credentials from CLI/environment input. Empty strings count as
    /// missing.
    pub fn new(wrapping_token: Option<String>, value: Option<String>) -> Result<Self> {
        let mut errors = Vec::new();

        let wrapping_token = wrapping_token.filter(|t| !t.is_empty());
        if wrapping_token.is_none() {
            errors.push(ConfigValidationError {
                path: "--wrapping-token".to_string(),
                message: "A wrapping token is required".to_string(),
            });
        }

        let value = value.filter(|v| !v.is_empty());
        if value.is_none() {
            errors.push(ConfigValidationError {
                path: "--value".to_string(),
                message: "A secret value is required".to_string(),
            });
        }

        match (wrapping_token, value) {
            (Some(wrapping_token), Some(value)) => Ok(Self {
                wrapping_token: SecretString::new(wrapping_token),
                value: SecretString::new(value),
            }),
            _ => {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                bail!("Missing credentials:\n{}", messages.join("\n"));
            }
        }
    }
}

/// Find the configuration file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILE_CANDIDATES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = dirs::config_dir() {
        let user_config = dir.join(CONFIG_DIR_NAME).join("config.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    None
}
