use nxgate_types::DepositStatus;
use thiserror::Error;

/// Failures of the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("record already exists: {0}")]
    Duplicate(String),

    /// The requested status move is not a legal step of the deposit state
    /// machine. Stores enforce this so no caller can rewind a terminal
    /// record.
    #[error("illegal deposit transition {from} -> {to}")]
    InvalidTransition {
        from: DepositStatus,
        to: DepositStatus,
    },

    #[error("storage backend failure: {0}")]
    Backend(String),
}
