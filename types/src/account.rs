use std::fmt;

use serde::{Deserialize, Serialize};

/// Ledger account address in RS notation (for example
/// `NXT-ABCD-EFGH-IJKL-MNOPQ`).
///
/// The node reports addresses in mixed case depending on the endpoint, so
/// every matching path works on the canonical form produced by
/// [`AccountId::normalized`]: trimmed and upper-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Wraps an already-canonical address verbatim.
    pub fn new(raw: impl Into<String>) -> Self {
        AccountId(raw.into())
    }

    /// Canonical form used for address matching.
    pub fn normalized(raw: &str) -> Self {
        AccountId(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(raw: &str) -> Self {
        AccountId::normalized(raw)
    }
}
