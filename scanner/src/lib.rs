//! Ledger ingestion and reconciliation engine for NXT-family chains.
//!
//! The scanner polls an external node for new blocks, classifies value
//! transfers, credits deposits to known payment addresses, confirms
//! broadcast withdrawals, and drives every deposit through its lifecycle
//! exactly once. The node transport and the real database live outside this
//! crate, behind [`facade::LedgerFacade`] and the `nxgate-store` traits, so
//! the whole engine runs against scripted fixtures in tests.

pub mod classifier;
pub mod config;
pub mod deposits;
pub mod error;
pub mod facade;
pub mod height_cache;
pub mod lifecycle;
pub mod logging;
pub mod mempool;
pub mod metrics;
pub mod scanner;
pub mod withdrawals;

pub use classifier::{classify, ClassifiedTransfer, ClassifyError};
pub use config::{CurrencySettings, ScannerConfig};
pub use error::ScanError;
pub use facade::{FacadeError, LedgerFacade};
pub use logging::{init_logging, LogFormat};
pub use metrics::ScannerMetrics;
pub use scanner::{BlockScanner, CycleStats, ScanHandle, StoreSet, DEFAULT_BLOCKS_PER_CYCLE};
