//! One-shot credential handoff.
//!
//! Pipeline, executed once and strictly in order:
//! 1. **Health check**: the service root answers
//! 2. **Unwrap**: the wrapping token is exchanged for an access token
//! 3. **Write**: `key = value` is created at the path with `cas = 0`
//! 4. **Validate**: the write is a live, undeleted version 1
//! 5. **Revoke**: the access token revokes itself, best-effort
//!
//! Any failure before step 4 completes aborts the run. Step 5 still runs
//! whenever step 2 produced a token, and its outcome never changes the
//! result.

pub mod error;
pub mod pipeline;
pub mod validate;

pub use error::{ErrorKind, HandoffError, HandoffFailure};
pub use pipeline::Handoff;
pub use validate::{validate_write_result, ValidationError};

use anyhow::Context;
use secrecy::SecretString;
use std::fmt;
use tracing::warn;

use crate::config::{validate_config_object, Config, Credentials, SecretConfig};
use crate::vault::{SecretWriteResult, VaultClient};

/// Validate the settings, connect to Vault and run the handoff once.
///
/// A failed revocation is logged and still returns `Ok`; every other
/// failure is an error.
pub async fn run_once(config: &Config, credentials: Credentials) -> anyhow::Result<HandoffSummary> {
    validate_config_object(config)?;

    let client = VaultClient::new(&config.vault).context("Failed to build Vault HTTP client")?;
    if !client.verifies_tls() {
        warn!("TLS certificate verification is disabled for {}", client.base_url());
    }

    let request = HandoffRequest::new(&config.secret, credentials);
    let summary = Handoff::new(&client).run(&request).await?;

    if let RevocationOutcome::Failed(reason) = &summary.revocation {
        warn!("Secret stored but access token was not revoked: {}", reason);
    }

    Ok(summary)
}

/// Everything a single handoff run needs besides the store.
#[derive(Debug)]
pub struct HandoffRequest {
    pub wrapping_token: SecretString,
    pub path: String,
    pub key: String,
    pub value: SecretString,
}

impl HandoffRequest {
    pub fn new(secret: &SecretConfig, credentials: Credentials) -> Self {
        Self {
            wrapping_token: credentials.wrapping_token,
            path: secret.path.clone(),
            key: secret.key.clone(),
            value: credentials.value,
        }
    }
}

/// Pipeline progress.
///
/// `Revoked` means the revoke step ran; its result is the
/// [`RevocationOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffState {
    Init,
    HealthChecked,
    Unwrapped,
    Written,
    Validated,
    Revoked,
}

impl fmt::Display for HandoffState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandoffState::Init => "init",
            HandoffState::HealthChecked => "health-checked",
            HandoffState::Unwrapped => "unwrapped",
            HandoffState::Written => "written",
            HandoffState::Validated => "validated",
            HandoffState::Revoked => "revoked",
        };
        f.write_str(name)
    }
}

/// Result of the best-effort revoke step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// Vault accepted the revocation.
    Revoked,
    /// The call failed; the message never contains the token.
    Failed(String),
    /// No access token was obtained, so there was nothing to revoke.
    NotAttempted,
}

impl RevocationOutcome {
    pub fn is_attempted(&self) -> bool {
        !matches!(self, RevocationOutcome::NotAttempted)
    }
}

/// A completed handoff.
#[derive(Debug, Clone)]
pub struct HandoffSummary {
    pub result: SecretWriteResult,
    pub revocation: RevocationOutcome,
}
