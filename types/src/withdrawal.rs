use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::amount::NativeAmount;
use crate::currency::CurrencyCode;
use crate::txid::TxId;

/// Lifecycle of a broadcast withdrawal, as far as this engine is concerned.
/// `Succeeded` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Broadcast, waiting to be sighted on-chain and confirmed.
    Confirming,
    /// Confirmed past the threshold; terminal.
    Succeeded,
}

impl WithdrawalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, WithdrawalStatus::Succeeded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WithdrawalStatus::Confirming => "confirming",
            WithdrawalStatus::Succeeded => "succeeded",
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted withdrawal row. Created externally when the transfer is
/// broadcast; this engine attaches what it observes on-chain and promotes
/// the status once confirmations suffice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub txid: TxId,
    pub currency: CurrencyCode,
    pub recipient: Option<AccountId>,
    pub amount: Option<Decimal>,
    pub block_number: Option<u64>,
    pub status: WithdrawalStatus,
}

impl WithdrawalRecord {
    /// A fresh record awaiting its on-chain sighting.
    pub fn confirming(txid: TxId, currency: CurrencyCode) -> Self {
        WithdrawalRecord {
            txid,
            currency,
            recipient: None,
            amount: None,
            block_number: None,
            status: WithdrawalStatus::Confirming,
        }
    }

    pub fn confirmations(&self, reconciled_height: u64) -> Option<u64> {
        self.block_number
            .map(|block| reconciled_height.saturating_sub(block))
    }
}

/// On-chain observation of a broadcast withdrawal, produced by the matcher.
/// Amount is still in minor units here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalMatch {
    pub txid: TxId,
    pub currency: CurrencyCode,
    pub recipient: AccountId,
    pub amount: NativeAmount,
    pub block_number: u64,
}
