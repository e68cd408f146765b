use tracing::{debug, error, info, warn};

use super::validate::validate_write_result;
use super::{
    HandoffError, HandoffFailure, HandoffRequest, HandoffState, HandoffSummary, RevocationOutcome,
};
use crate::vault::{AccessToken, SecretStore, SecretWriteResult};

/// Runs the unwrap → write → validate → revoke sequence against a store.
pub struct Handoff<'a, S: SecretStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SecretStore + ?Sized> Handoff<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Execute the handoff once.
    ///
    /// The wrapping token is presented at most once. If an access token was
    /// obtained it is revoked before returning, whatever happened after the
    /// unwrap.
    pub async fn run(&self, request: &HandoffRequest) -> Result<HandoffSummary, HandoffFailure> {
        let mut state = HandoffState::Init;

        info!("Checking Vault reachability at {}", self.store.endpoint());
        if let Err(e) = self.store.health_check().await {
            return Err(self.abort(e.into(), state, RevocationOutcome::NotAttempted));
        }
        state = transition(state, HandoffState::HealthChecked);

        info!("Unwrapping access token");
        let token = match self.store.unwrap_token(&request.wrapping_token).await {
            Ok(token) => token,
            Err(e) => return Err(self.abort(e.into(), state, RevocationOutcome::NotAttempted)),
        };
        state = transition(state, HandoffState::Unwrapped);

        let written = self.write_and_validate(&token, request, &mut state).await;

        let revocation = self.revoke(&token).await;
        drop(token);

        match written {
            Ok(result) => {
                transition(state, HandoffState::Revoked);
                let created = result
                    .created_at()
                    .map(|t| t.to_rfc3339())
                    .or_else(|| result.created_time.clone())
                    .unwrap_or_default();
                info!(
                    "Stored '{}' at {} (version 1, created {})",
                    request.key, request.path, created
                );
                Ok(HandoffSummary { result, revocation })
            }
            Err(e) => Err(self.abort(e, state, revocation)),
        }
    }

    async fn write_and_validate(
        &self,
        token: &AccessToken,
        request: &HandoffRequest,
        state: &mut HandoffState,
    ) -> Result<SecretWriteResult, HandoffError> {
        info!("Writing key '{}' to secret path {}", request.key, request.path);
        let result = self
            .store
            .write_secret(token, &request.path, &request.key, &request.value)
            .await?;
        *state = transition(*state, HandoffState::Written);

        validate_write_result(&result)?;
        *state = transition(*state, HandoffState::Validated);

        Ok(result)
    }

    /// Best-effort self-revocation. Errors are logged and returned as an
    /// outcome, never propagated.
    async fn revoke(&self, token: &AccessToken) -> RevocationOutcome {
        info!("Revoking access token");
        match self.store.revoke_self(token).await {
            Ok(()) => RevocationOutcome::Revoked,
            Err(e) => {
                warn!(
                    "Access token revocation failed, token stays valid until it expires: {}",
                    e
                );
                RevocationOutcome::Failed(e.to_string())
            }
        }
    }

    fn abort(
        &self,
        error: HandoffError,
        reached: HandoffState,
        revocation: RevocationOutcome,
    ) -> HandoffFailure {
        error!(
            kind = ?error.kind(),
            "Handoff aborted after {}: {}",
            reached,
            error
        );
        HandoffFailure {
            error,
            reached,
            revocation,
        }
    }
}

fn transition(from: HandoffState, to: HandoffState) -> HandoffState {
    debug!("Handoff state {} -> {}", from, to);
    to
}
