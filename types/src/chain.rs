use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one configured blockchain instance, for example
/// `"nxt-mainnet"`. One scanner owns exactly one chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(raw: impl Into<String>) -> Self {
        ChainId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(raw: &str) -> Self {
        ChainId::new(raw)
    }
}

/// Durable scan progress marker: the height the scanner has fully
/// reconciled through.
///
/// The cursor never moves backwards. Regression attempts are refused so a
/// stale trigger or a node rollback can never silently rewind reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainCursor {
    height: u64,
}

impl ChainCursor {
    pub const fn new(height: u64) -> Self {
        ChainCursor { height }
    }

    pub const fn height(self) -> u64 {
        self.height
    }

    /// Moves the cursor to `height` unless that would rewind it.
    /// Returns whether the position was applied.
    pub fn advance_to(&mut self, height: u64) -> bool {
        if height < self.height {
            return false;
        }
        self.height = height;
        true
    }
}
