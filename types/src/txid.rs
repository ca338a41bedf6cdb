use std::fmt;

use serde::{Deserialize, Serialize};

/// Ledger transaction id (NXT reports them as unsigned decimal strings).
///
/// Matching against stored deposits and withdrawals always happens on the
/// canonical form: trimmed and lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(String);

impl TxId {
    /// Wraps an already-canonical id verbatim.
    pub fn new(raw: impl Into<String>) -> Self {
        TxId(raw.into())
    }

    /// Canonical form used for txid matching.
    pub fn normalized(raw: &str) -> Self {
        TxId(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxId {
    fn from(raw: &str) -> Self {
        TxId::normalized(raw)
    }
}
