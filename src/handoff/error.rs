use super::validate::ValidationError;
use super::{HandoffState, RevocationOutcome};
use crate::vault::VaultError;

/// Failure class of a fatal handoff error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The service could not be reached.
    Connectivity,
    /// The service answered with a non-success status.
    Rejected,
    /// A successful response did not have the expected shape.
    Shape,
    /// The write went through but its metadata is not a fresh version 1.
    Validation,
}

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("secret write failed validation: {0}")]
    Validation(#[from] ValidationError),
}

impl HandoffError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandoffError::Vault(VaultError::Connectivity { .. }) => ErrorKind::Connectivity,
            HandoffError::Vault(VaultError::Rejected { .. }) => ErrorKind::Rejected,
            HandoffError::Vault(VaultError::MissingField { .. } | VaultError::Decode { .. }) => {
                ErrorKind::Shape
            }
            HandoffError::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// A handoff that stopped before completing.
#[derive(Debug, thiserror::Error)]
#[error("credential handoff aborted after reaching state {reached}")]
pub struct HandoffFailure {
    #[source]
    pub error: HandoffError,
    /// Last state the pipeline reached before the error.
    pub reached: HandoffState,
    pub revocation: RevocationOutcome,
}

impl HandoffFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}
