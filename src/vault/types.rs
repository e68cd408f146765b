//! Wire types for the Vault endpoints used by the handoff.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Credentials
// ============================================================================

/// Access token obtained by unwrapping a wrapping token.
///
/// Redacted in `Debug`, zeroized on drop.
#[derive(Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: String) -> Self {
        Self(SecretString::new(token))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

// ============================================================================
// Unwrap
// ============================================================================

/// `POST /v1/sys/wrapping/unwrap` response. Only `auth.client_token` is read.
#[derive(Debug, Deserialize)]
pub struct UnwrapResponse {
    #[serde(default)]
    pub auth: Option<UnwrapAuth>,
}

#[derive(Debug, Deserialize)]
pub struct UnwrapAuth {
    #[serde(default)]
    pub client_token: Option<String>,
}

impl UnwrapResponse {
    /// The unwrapped access token, if present and non-empty.
    pub fn into_client_token(self) -> Option<AccessToken> {
        self.auth
            .and_then(|auth| auth.client_token)
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
    }
}

// ============================================================================
// KV v2 write
// ============================================================================

/// `POST /v1/{mount}/data/{path}` request body.
#[derive(Debug, Serialize)]
pub struct WriteSecretRequest<'a> {
    pub options: WriteOptions,
    pub data: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Serialize)]
pub struct WriteOptions {
    /// Check-and-set version; `0` only succeeds if the path has no version.
    pub cas: u64,
}

impl<'a> WriteSecretRequest<'a> {
    /// Create-only write of a single key.
    pub fn create(key: &'a str, value: &'a str) -> Self {
        let mut data = BTreeMap::new();
        data.insert(key, value);
        Self {
            options: WriteOptions { cas: 0 },
            data,
        }
    }
}

/// `POST /v1/{mount}/data/{path}` response envelope.
#[derive(Debug, Deserialize)]
pub struct WriteSecretResponse {
    #[serde(default)]
    pub data: Option<SecretWriteResult>,
}

/// Version metadata Vault returns for a KV v2 write.
///
/// Absent fields stay `None` so that validation rejects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SecretWriteResult {
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub destroyed: Option<bool>,
    #[serde(default)]
    pub deletion_time: Option<String>,
}

impl SecretWriteResult {
    /// Parsed `created_time`, when it is RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}
