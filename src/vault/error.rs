//! Errors raised by individual Vault calls.
//!
//! Messages name the operation and the HTTP status, never a token or a
//! secret value.

use std::fmt;

/// The remote operation a [`VaultError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    HealthCheck,
    Unwrap,
    WriteSecret,
    RevokeSelf,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::HealthCheck => "health check",
            Operation::Unwrap => "token unwrap",
            Operation::WriteSecret => "secret write",
            Operation::RevokeSelf => "token self-revocation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The request never produced an HTTP response.
    #[error("could not reach Vault during {operation}")]
    Connectivity {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// Vault answered with a non-success status.
    #[error("Vault rejected {operation} with HTTP {status}{}", format_vault_errors(.errors))]
    Rejected {
        operation: Operation,
        status: u16,
        /// Messages from Vault's `errors` array, when the body carried one.
        errors: Vec<String>,
    },

    /// A successful response lacked a field the protocol requires.
    #[error("{operation} succeeded but the response has no `{field}`")]
    MissingField {
        operation: Operation,
        field: &'static str,
    },

    /// A successful response body was not the expected JSON.
    #[error("{operation} returned a body that is not valid JSON")]
    Decode {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
}

impl VaultError {
    pub fn operation(&self) -> Operation {
        match self {
            VaultError::Connectivity { operation, .. }
            | VaultError::Rejected { operation, .. }
            | VaultError::MissingField { operation, .. }
            | VaultError::Decode { operation, .. } => *operation,
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            VaultError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn format_vault_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(": {}", errors.join("; "))
    }
}
