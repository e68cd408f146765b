use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::Path;

use super::Config;

/// Config files larger than this are refused (1 MB).
pub const MAX_CONFIG_FILE_BYTES: u64 = 1024 * 1024;

/// On-disk config syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json5,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.yaml`/`.yml` and `.toml` map to their formats; anything else is
    /// read as JSON5, which also accepts plain JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ConfigFormat::Yaml,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json5,
        }
    }

    /// Parse `content` into a JSON tree so every format deserializes the
    /// same way.
    pub fn parse(self, content: &str) -> Result<serde_json::Value> {
        let value = match self {
            ConfigFormat::Json5 => json5::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        Ok(value)
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigFormat::Json5 => "JSON5",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Toml => "TOML",
        })
    }
}

/// Read a handoff config file into a JSON tree.
///
/// The path must name a regular file no larger than
/// [`MAX_CONFIG_FILE_BYTES`].
pub fn read_config_value(path: &Path) -> Result<serde_json::Value> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot stat config file '{}'", path.display()))?;

    if !metadata.is_file() {
        bail!("Config path '{}' is not a regular file", path.display());
    }
    if metadata.len() > MAX_CONFIG_FILE_BYTES {
        bail!(
            "Config file '{}' is {} bytes, exceeds limit of {} bytes",
            path.display(),
            metadata.len(),
            MAX_CONFIG_FILE_BYTES,
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let format = ConfigFormat::from_path(path);
    format
        .parse(&content)
        .with_context(|| format!("Config file '{}' is not valid {format}", path.display()))
}

/// Load and deserialize a configuration file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let value = read_config_value(path)?;
    let config: Config = serde_json::from_value(value)
        .with_context(|| format!("Invalid configuration in '{}'", path.display()))?;
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
