use nxgate_store::StoreError;
use nxgate_types::AmountError;
use thiserror::Error;

use crate::facade::FacadeError;

/// Cycle-fatal failures of the scanning engine.
///
/// Not every failure becomes a `ScanError`: a block whose id or body cannot
/// be fetched is skipped in place, and a malformed transaction is dropped
/// where it is classified. Whatever does surface here ends the cycle at the
/// top-level catch in `run_cycle`, without advancing the cursor further.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("ledger query failed: {0}")]
    Facade(#[from] FacadeError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("amount conversion failed: {0}")]
    Amount(#[from] AmountError),

    #[error("configuration error: {0}")]
    Config(String),
}
