//! Storage trait boundary for the nxgate engine.
//!
//! The real deposit/withdrawal database lives outside this codebase; the
//! scanner only ever talks to the narrow traits defined here. Every backend
//! (the production database adapter, the in-memory store used by tests and
//! light deployments) implements the same contracts, so the engine is
//! testable without a database and the database is swappable without
//! touching the engine.
//!
//! The uniqueness invariant of the system, one deposit per
//! `(currency, txid)`, is part of the trait contract: `upsert` is the only
//! way to create a deposit and it is idempotent on that key.

pub mod address;
pub mod cursor;
pub mod deposit;
pub mod error;
pub mod memory;
pub mod withdrawal;

pub use address::AddressBook;
pub use cursor::CursorStore;
pub use deposit::{DepositStore, NewDeposit, UpsertOutcome};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use withdrawal::WithdrawalStore;
