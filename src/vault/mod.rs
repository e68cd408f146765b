//! Vault HTTP API access.
//!
//! [`SecretStore`] is the seam between the handoff pipeline and the remote
//! service; [`VaultClient`] implements it over HTTP.

pub mod client;
pub mod error;
pub mod types;

pub use client::VaultClient;
pub use error::{Operation, VaultError};
pub use types::{AccessToken, SecretWriteResult};

use async_trait::async_trait;
use secrecy::SecretString;

/// The four remote operations a credential handoff needs.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Endpoint description for logs.
    fn endpoint(&self) -> &str;

    /// Check that the service root answers.
    async fn health_check(&self) -> Result<(), VaultError>;

    /// Redeem a single-use wrapping token. Consumes it server-side.
    async fn unwrap_token(&self, wrapping_token: &SecretString) -> Result<AccessToken, VaultError>;

    /// Create version 1 of `key = value` at `path`; fails if any version exists.
    async fn write_secret(
        &self,
        token: &AccessToken,
        path: &str,
        key: &str,
        value: &SecretString,
    ) -> Result<SecretWriteResult, VaultError>;

    /// Revoke the token used for the request.
    async fn revoke_self(&self, token: &AccessToken) -> Result<(), VaultError>;
}
