use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transaction::RawTransaction;

/// Ledger block id. NXT addresses blocks by an unsigned decimal id string
/// rather than a hex hash; the id plays the hash role here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(raw: impl Into<String>) -> Self {
        BlockId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(raw: &str) -> Self {
        BlockId::new(raw)
    }
}

/// A fetched block with its transaction bodies.
///
/// Blocks are consumed within the cycle that fetched them and never
/// retained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    #[serde(rename = "block")]
    pub id: BlockId,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}
