use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{DEFAULT_KV_MOUNT, DEFAULT_SECRET_KEY};

// ============================================================================
// Vault Connection Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    /// Base URL of the Vault server, e.g. `https://vault.example.com:8200`.
    #[serde(default)]
    pub url: String,
    /// Mount point of the KV v2 secrets engine.
    #[serde(default = "default_mount")]
    pub mount: String,
    #[serde(default)]
    pub tls: VaultTlsConfig,
    /// Per-request timeout. Unset means the HTTP client default.
    pub timeout_secs: Option<u64>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            mount: default_mount(),
            tls: VaultTlsConfig::default(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultTlsConfig {
    /// Verify the server certificate chain and hostname.
    #[serde(default = "default_true")]
    pub verify: bool,
}

impl Default for VaultTlsConfig {
    fn default() -> Self {
        Self { verify: true }
    }
}

// ============================================================================
// Secret Target Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretConfig {
    /// Path of the secret below the KV mount.
    #[serde(default)]
    pub path: String,
    /// Key name the value is stored under.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            key: default_key(),
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LoggingLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("invalid log level: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LoggingLevel,
    /// Append log lines to this file instead of stderr.
    pub file: Option<PathBuf>,
    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_true() -> bool {
    true
}

fn default_mount() -> String {
    DEFAULT_KV_MOUNT.to_string()
}

fn default_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}
