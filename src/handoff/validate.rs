//! Checks that a KV v2 write created a fresh, live first version.

use crate::vault::SecretWriteResult;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("write response has no creation time")]
    MissingCreatedTime,

    #[error("secret version is marked destroyed (destroyed = {destroyed:?})")]
    Destroyed { destroyed: Option<bool> },

    #[error("secret is not at version 1 (version = {version:?})")]
    UnexpectedVersion { version: Option<u64> },

    #[error("secret version already has a deletion time ({deletion_time:?})")]
    AlreadyDeleted { deletion_time: Option<String> },
}

/// Validate write metadata. Checks run in order and stop at the first
/// violation.
pub fn validate_write_result(result: &SecretWriteResult) -> Result<(), ValidationError> {
    if result.created_time.as_deref().map_or(true, str::is_empty) {
        return Err(ValidationError::MissingCreatedTime);
    }

    if result.destroyed != Some(false) {
        return Err(ValidationError::Destroyed {
            destroyed: result.destroyed,
        });
    }

    if result.version != Some(1) {
        return Err(ValidationError::UnexpectedVersion {
            version: result.version,
        });
    }

    if result.deletion_time.as_deref() != Some("") {
        return Err(ValidationError::AlreadyDeleted {
            deletion_time: result.deletion_time.clone(),
        });
    }

    Ok(())
}
