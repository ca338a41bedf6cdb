use nxgate_types::{AccountId, CurrencyCode, TxId, WithdrawalRecord};
use rust_decimal::Decimal;

use crate::error::StoreError;

/// Persistent withdrawal records, keyed by `(currency, txid)`.
///
/// Records are created by the broadcasting side; the scanner only looks up
/// confirming ones, attaches what it observed on-chain and promotes them
/// once confirmed.
pub trait WithdrawalStore: Send + Sync {
    /// Registers a freshly broadcast withdrawal. Fails with
    /// [`StoreError::Duplicate`] if the key is already present.
    fn insert(&self, record: WithdrawalRecord) -> Result<(), StoreError>;

    /// The record for this key if it exists and is still confirming.
    fn find_confirming(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
    ) -> Result<Option<WithdrawalRecord>, StoreError>;

    /// All records still awaiting confirmation.
    fn confirming(&self) -> Result<Vec<WithdrawalRecord>, StoreError>;

    /// Attaches the on-chain observation to a confirming record.
    fn attach_confirmation(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
        block_number: u64,
        amount: Decimal,
        recipient: AccountId,
    ) -> Result<(), StoreError>;

    /// Promotes a confirming record to `Succeeded`. Idempotent: promoting a
    /// record that already succeeded is a no-op.
    fn mark_succeeded(&self, currency: &CurrencyCode, txid: &TxId) -> Result<(), StoreError>;
}
