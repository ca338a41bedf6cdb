use nxgate_types::{AccountId, Block, BlockId, RawTransaction, TxId};
use thiserror::Error;

/// Failures a ledger node query can report.
///
/// Expected conditions (no block at a height yet, an undecided approval
/// verdict) are `Option`s on the query results, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacadeError {
    /// The node could not be reached or the response never arrived.
    #[error("ledger node unreachable: {0}")]
    Transport(String),

    /// The node answered with an error description.
    #[error("ledger node reported: {0}")]
    Node(String),
}

/// Narrow query surface over one NXT-family node.
///
/// The transport (HTTP client, authentication, JSON decoding) lives outside
/// the engine; implementations translate node responses into these typed
/// results. Calls are blocking and may take arbitrarily long; the scanner
/// is built to tolerate that at every call site.
pub trait LedgerFacade: Send + Sync {
    /// Current chain tip height.
    fn latest_height(&self) -> Result<u64, FacadeError>;

    /// Id of the block at `height`, or `None` while the node has no block
    /// there yet.
    fn block_hash_at(&self, height: u64) -> Result<Option<BlockId>, FacadeError>;

    /// Full block with transaction bodies, or `None` for an empty response.
    fn block_by_hash(&self, id: &BlockId) -> Result<Option<Block>, FacadeError>;

    /// Snapshot of the unconfirmed transaction pool.
    fn unconfirmed_transactions(&self) -> Result<Vec<RawTransaction>, FacadeError>;

    /// Conditional-approval verdict for a phased transaction: `Some(true)`
    /// approved, `Some(false)` rejected, `None` still undecided.
    fn phasing_status(&self, txid: &TxId) -> Result<Option<bool>, FacadeError>;

    /// Canonical address form used for matching.
    fn normalize_address(&self, raw: &str) -> AccountId {
        AccountId::normalized(raw)
    }

    /// Canonical txid form used for matching.
    fn normalize_txid(&self, raw: &str) -> TxId {
        TxId::normalized(raw)
    }
}
