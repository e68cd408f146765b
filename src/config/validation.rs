use super::Config;
use anyhow::Result;
use tracing::warn;
use url::Url;

/// Validation errors for configuration.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a configuration object.
pub fn validate_config(config: &Config) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    // Vault URL
    if config.vault.url.trim().is_empty() {
        errors.push(ConfigValidationError {
            path: "vault.url".to_string(),
            message: "Vault URL is required".to_string(),
        });
    } else {
        match Url::parse(&config.vault.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if url.scheme() == "http" && !is_loopback(&url) {
                    warn!("Vault URL uses plain http; tokens will cross the network unencrypted");
                }
            }
            Ok(url) => errors.push(ConfigValidationError {
                path: "vault.url".to_string(),
                message: format!("Unsupported URL scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError {
                path: "vault.url".to_string(),
                message: format!("Malformed URL: {e}"),
            }),
        }
    }

    if config.vault.mount.trim_matches('/').is_empty() {
        errors.push(ConfigValidationError {
            path: "vault.mount".to_string(),
            message: "KV mount must not be empty".to_string(),
        });
    }

    if config.vault.timeout_secs == Some(0) {
        errors.push(ConfigValidationError {
            path: "vault.timeoutSecs".to_string(),
            message: "Timeout must be greater than 0".to_string(),
        });
    }

    // Secret target
    if let Some(message) = check_secret_path(&config.secret.path) {
        errors.push(ConfigValidationError {
            path: "secret.path".to_string(),
            message,
        });
    }

    if config.secret.key.is_empty() {
        errors.push(ConfigValidationError {
            path: "secret.key".to_string(),
            message: "Secret key name must not be empty".to_string(),
        });
    }

    errors
}

/// Validate configuration and return Result.
pub fn validate_config_object(config: &Config) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Configuration validation failed:\n{}", messages.join("\n"));
    }
}

/// Check a secret path, returning a message describing the first problem.
fn check_secret_path(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Some("Secret path is required".to_string());
    }

    if trimmed
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Some("Secret path must not contain '.', '..' or empty segments".to_string());
    }

    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Some("Secret path must not contain control characters".to_string());
    }

    None
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(d)) => d == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
