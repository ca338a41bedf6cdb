use nxgate_types::{AccountId, CurrencyCode, DepositRecord, DepositStatus, TxId};
use rust_decimal::Decimal;

use crate::error::StoreError;

/// Payload of a deposit sighting, handed to [`DepositStore::upsert`].
/// The amount is already decimal: conversion from minor units happens once,
/// before the storage boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDeposit {
    pub txid: TxId,
    pub address: AccountId,
    pub currency: CurrencyCode,
    pub amount: Decimal,
    pub block_number: Option<u64>,
    pub phased: bool,
}

/// Result of an upsert: the stored record plus whether this sighting
/// created it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub record: DepositRecord,
    pub created: bool,
}

/// Persistent deposit records, keyed by `(currency, txid)`.
pub trait DepositStore: Send + Sync {
    /// Creates the deposit in `Unconfirmed` status on first sighting, or
    /// refreshes chain metadata on a repeat sighting. Idempotent on
    /// `(currency, txid)`.
    ///
    /// On a repeat sighting the `block_number` is updated only when the new
    /// sighting carries one (a mempool re-sighting must not erase the block
    /// a deposit was already found in) and the status is never touched.
    fn upsert(&self, new: NewDeposit) -> Result<UpsertOutcome, StoreError>;

    fn get(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
    ) -> Result<Option<DepositRecord>, StoreError>;

    /// All deposits currently in the given status, in unspecified order.
    fn with_status(&self, status: DepositStatus) -> Result<Vec<DepositRecord>, StoreError>;

    /// Applies one step of the state machine. Fails with
    /// [`StoreError::InvalidTransition`] on any illegal move and with
    /// [`StoreError::NotFound`] on an unknown key.
    fn transition(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
        to: DepositStatus,
    ) -> Result<DepositRecord, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}
