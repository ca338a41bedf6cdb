use std::fmt;

use serde::{Deserialize, Serialize};

/// Which value-transfer family a transaction or a configured currency
/// belongs to.
///
/// The set is closed: every consumer matches exhaustively, so a new ledger
/// transfer family cannot be half-supported by accident. Sub-asset and
/// sub-currency transfers carry the on-ledger identifier that must match the
/// configured one before any crediting happens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetVariant {
    /// Base-coin transfer, amount in NQT.
    #[default]
    PlainCoin,
    /// Asset-exchange transfer, amount in QNT.
    SubAsset { asset_id: String },
    /// Monetary-system transfer, amount in raw currency units.
    SubCurrency { currency_id: String },
}

impl AssetVariant {
    pub fn is_plain(&self) -> bool {
        matches!(self, AssetVariant::PlainCoin)
    }
}

impl fmt::Display for AssetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetVariant::PlainCoin => f.write_str("coin"),
            AssetVariant::SubAsset { asset_id } => write!(f, "asset:{asset_id}"),
            AssetVariant::SubCurrency { currency_id } => write!(f, "currency:{currency_id}"),
        }
    }
}
