use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::NativeAmount;
use crate::variant::AssetVariant;

/// Exchange-side currency code, canonically lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(raw: impl Into<String>) -> Self {
        CurrencyCode(raw.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(raw: &str) -> Self {
        CurrencyCode::new(raw)
    }
}

/// Startup-resolved settings for one currency handled on the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyProfile {
    pub code: CurrencyCode,
    /// Transfer family this currency credits from. Candidate transfers must
    /// carry exactly this variant, identifier included.
    pub variant: AssetVariant,
    /// Decimal places of one whole unit (8 for the NXT base coin).
    pub scale: u32,
    /// Deposits at or below this many minor units are dropped.
    pub min_deposit: NativeAmount,
}

impl CurrencyProfile {
    pub fn new(
        code: impl Into<String>,
        variant: AssetVariant,
        scale: u32,
        min_deposit: NativeAmount,
    ) -> Self {
        CurrencyProfile {
            code: CurrencyCode::new(code),
            variant,
            scale,
            min_deposit,
        }
    }
}
