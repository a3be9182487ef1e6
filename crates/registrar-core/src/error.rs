//! Error taxonomy for registrar contract operations.
//!
//! Every failure is terminal for the operation that raised it: the
//! surrounding transaction aborts and nothing is committed. The enum
//! variant is the machine discriminant; the display string doubles as
//! audit text.

use registrar_ledger::{KeyError, LedgerError};

/// Errors arising from registrar contract operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistrarError {
    /// Malformed input (bad email, unknown enum spelling, empty reason).
    #[error("invalid format: {0}")]
    Format(String),

    /// A numeric value or length is outside its allowed bounds.
    #[error("out of range: {0}")]
    Range(String),

    /// The caller's organization or attributes do not permit the operation.
    #[error("unauthorized: {0}")]
    Authorization(String),

    /// A referenced entity is absent from the ledger.
    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: String },

    /// Duplicate creation, already-approved, or already-revoked. Not safe
    /// to resubmit unchanged; the state the caller assumed is gone.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The ledger detected a read/write race at commit. The transaction
    /// left no state behind; resubmitting unchanged is safe.
    #[error("transaction lost a commit race; safe to resubmit")]
    RetryableConflict,

    /// The certificate was revoked; carries the stored revocation reason.
    #[error("certificate has been revoked: {reason}")]
    Revoked { reason: String },

    /// The certificate's validity window has passed.
    #[error("certificate expired on {expired_on}")]
    Expired { expired_on: chrono::NaiveDate },

    /// The ledger collaborator failed, or a stored value would not decode.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RegistrarError {
    /// Whether resubmitting the same transaction unchanged can succeed.
    /// Only commit races qualify; every other failure is deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RetryableConflict)
    }
}

impl From<LedgerError> for RegistrarError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::CommitConflict => Self::RetryableConflict,
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<KeyError> for RegistrarError {
    fn from(err: KeyError) -> Self {
        Self::Format(err.to_string())
    }
}

impl From<serde_json::Error> for RegistrarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("ledger value would not decode: {err}"))
    }
}
