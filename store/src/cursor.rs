use nxgate_types::ChainId;

use crate::error::StoreError;

/// Durable storage of per-chain scan progress.
///
/// The saved height is the block the scanner has fully reconciled through;
/// after a crash the next cycle resumes from it, re-scanning that block
/// (deposit upserts are idempotent, so the overlap is harmless).
pub trait CursorStore: Send + Sync {
    fn load(&self, chain: &ChainId) -> Result<Option<u64>, StoreError>;

    fn save(&self, chain: &ChainId, height: u64) -> Result<(), StoreError>;
}
