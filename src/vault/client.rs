//! HashiCorp Vault HTTP client for the wrapping/KV v2/token endpoints.

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{Operation, VaultError};
use super::types::{
    AccessToken, SecretWriteResult, UnwrapResponse, WriteSecretRequest, WriteSecretResponse,
};
use super::SecretStore;
use crate::config::VaultConfig;

/// Header carrying the Vault token on every authenticated request.
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

const UNWRAP_PATH: &str = "/v1/sys/wrapping/unwrap";
const REVOKE_SELF_PATH: &str = "/v1/auth/token/revoke-self";

/// Vault REST API client.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: Client,
    base: Url,
    base_url: String,
    mount: String,
    verify_tls: bool,
}

impl VaultClient {
    fn user_agent() -> String {
        format!("vault-handoff/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Build a client from connection settings.
    pub fn new(config: &VaultConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.url)
            .with_context(|| format!("Invalid Vault URL '{}'", config.url))?;
        if base.cannot_be_a_base() {
            bail!("Vault URL '{}' cannot carry API paths", config.url);
        }

        let verify_tls = config.tls.verify;
        let mut builder = Client::builder()
            .user_agent(Self::user_agent())
            .danger_accept_invalid_certs(!verify_tls);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base,
            base_url: config.url.trim_end_matches('/').to_string(),
            mount: config.mount.trim_matches('/').to_string(),
            verify_tls,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether server certificates are checked on every request.
    pub fn verifies_tls(&self) -> bool {
        self.verify_tls
    }

    /// KV v2 data endpoint for a secret path, one encoded segment per
    /// path component.
    fn secret_data_url(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("v1")
                .extend(self.mount.split('/'))
                .push("data")
                .extend(path.trim_matches('/').split('/'));
        }
        url
    }
}

#[async_trait]
impl SecretStore for VaultClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn health_check(&self) -> Result<(), VaultError> {
        let operation = Operation::HealthCheck;
        let url = format!("{}/", self.base_url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| VaultError::Connectivity { operation, source })?;

        ensure_success(operation, resp).await?;
        Ok(())
    }

    async fn unwrap_token(&self, wrapping_token: &SecretString) -> Result<AccessToken, VaultError> {
        let operation = Operation::Unwrap;
        let url = format!("{}{UNWRAP_PATH}", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header(VAULT_TOKEN_HEADER, wrapping_token.expose_secret().as_str())
            .send()
            .await
            .map_err(|source| VaultError::Connectivity { operation, source })?;

        let resp = ensure_success(operation, resp).await?;
        let body: UnwrapResponse = resp
            .json()
            .await
            .map_err(|source| VaultError::Decode { operation, source })?;

        body.into_client_token().ok_or(VaultError::MissingField {
            operation,
            field: "auth.client_token",
        })
    }

    async fn write_secret(
        &self,
        token: &AccessToken,
        path: &str,
        key: &str,
        value: &SecretString,
    ) -> Result<SecretWriteResult, VaultError> {
        let operation = Operation::WriteSecret;
        let url = self.secret_data_url(path);
        debug!("Writing secret to {}", url);

        let body = WriteSecretRequest::create(key, value.expose_secret());
        let resp = self
            .http
            .post(url)
            .header(VAULT_TOKEN_HEADER, token.expose())
            .json(&body)
            .send()
            .await
            .map_err(|source| VaultError::Connectivity { operation, source })?;

        let resp = ensure_success(operation, resp).await?;
        let body: WriteSecretResponse = resp
            .json()
            .await
            .map_err(|source| VaultError::Decode { operation, source })?;

        body.data.ok_or(VaultError::MissingField {
            operation,
            field: "data",
        })
    }

    async fn revoke_self(&self, token: &AccessToken) -> Result<(), VaultError> {
        let operation = Operation::RevokeSelf;
        let url = format!("{}{REVOKE_SELF_PATH}", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header(VAULT_TOKEN_HEADER, token.expose())
            .send()
            .await
            .map_err(|source| VaultError::Connectivity { operation, source })?;

        ensure_success(operation, resp).await?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct VaultErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Pass through 2xx responses; turn anything else into `Rejected`, keeping
/// Vault's `errors` messages when the body has them.
async fn ensure_success(operation: Operation, resp: Response) -> Result<Response, VaultError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let errors = resp
        .json::<VaultErrorBody>()
        .await
        .map(|body| body.errors)
        .unwrap_or_default();

    Err(VaultError::Rejected {
        operation,
        status: status.as_u16(),
        errors,
    })
}
