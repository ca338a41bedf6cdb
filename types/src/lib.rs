//! Core domain types for the nxgate reconciliation engine.
//!
//! Everything the scanner, the storage boundary and the ledger facade agree
//! on lives here: canonical ids, minor-unit amounts and their decimal
//! conversion, asset variants, currency profiles, the deposit and withdrawal
//! lifecycles, and the serde models of the node's wire format.

pub mod account;
pub mod amount;
pub mod block;
pub mod chain;
pub mod currency;
pub mod deposit;
pub mod error;
pub mod transaction;
pub mod txid;
pub mod variant;
pub mod withdrawal;

pub use account::AccountId;
pub use amount::{NativeAmount, MAX_SCALE};
pub use block::{Block, BlockId};
pub use chain::{ChainCursor, ChainId};
pub use currency::{CurrencyCode, CurrencyProfile};
pub use deposit::{CandidateDeposit, DepositRecord, DepositStatus};
pub use error::AmountError;
pub use transaction::{RawTransaction, TxAttachment};
pub use txid::TxId;
pub use variant::AssetVariant;
pub use withdrawal::{WithdrawalMatch, WithdrawalRecord, WithdrawalStatus};
