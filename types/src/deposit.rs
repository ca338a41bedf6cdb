use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::amount::NativeAmount;
use crate::currency::CurrencyCode;
use crate::txid::TxId;

/// Lifecycle of a deposit record.
///
/// Non-phased path: `Unconfirmed -> Accepted -> Collected`.
/// Phased path: `Unconfirmed -> Pending -> {Accepted -> Collected, Rejected}`.
/// `Collected` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    /// Sighted (mempool or block) but below the confirmation threshold.
    Unconfirmed,
    /// Confirmed but awaiting the conditional-approval verdict.
    Pending,
    /// Cleared for crediting.
    Accepted,
    /// Credited; terminal.
    Collected,
    /// Conditional approval denied; terminal.
    Rejected,
}

impl DepositStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DepositStatus::Collected | DepositStatus::Rejected)
    }

    /// Whether `next` is a legal single step of the state machine.
    pub fn can_transition_to(self, next: DepositStatus) -> bool {
        use DepositStatus::*;
        matches!(
            (self, next),
            (Unconfirmed, Pending)
                | (Unconfirmed, Accepted)
                | (Pending, Accepted)
                | (Pending, Rejected)
                | (Accepted, Collected)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DepositStatus::Unconfirmed => "unconfirmed",
            DepositStatus::Pending => "pending",
            DepositStatus::Accepted => "accepted",
            DepositStatus::Collected => "collected",
            DepositStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deposit assembled from one classified transfer, before persistence.
/// Amounts are still in minor units here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateDeposit {
    pub txid: TxId,
    pub address: AccountId,
    pub currency: CurrencyCode,
    pub amount: NativeAmount,
    /// `None` when the candidate was sighted in the unconfirmed pool.
    pub block_number: Option<u64>,
    pub phased: bool,
}

/// A persisted deposit row. The amount is decimal because this type crosses
/// the storage boundary; conversion happened exactly once, on the way in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub txid: TxId,
    pub address: AccountId,
    pub currency: CurrencyCode,
    pub amount: Decimal,
    pub block_number: Option<u64>,
    pub phased: bool,
    pub status: DepositStatus,
}

impl DepositRecord {
    /// Confirmation depth relative to a reconciled chain height. `None`
    /// until the deposit has been sighted in a block.
    pub fn confirmations(&self, reconciled_height: u64) -> Option<u64> {
        self.block_number
            .map(|block| reconciled_height.saturating_sub(block))
    }
}
