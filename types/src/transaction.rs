//! Serde models of the node's transaction wire format.
//!
//! Field names follow the NXT JSON-RPC surface (`transaction`, `recipientRS`,
//! `amountNQT` and friends). Every field tolerates absence: validation lives
//! in the classifier, so one malformed transaction can never prevent the
//! rest of its block from deserializing.

use serde::{Deserialize, Serialize};

/// A raw transaction exactly as the node reports it, in a block body or in
/// the unconfirmed pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTransaction {
    /// Transaction id, an unsigned decimal string.
    #[serde(rename = "transaction")]
    pub id: String,
    /// Top-level transaction type discriminator.
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub subtype: Option<i64>,
    /// Recipient address in RS notation. Absent on transaction types that
    /// have no recipient (such as asset issuance).
    #[serde(rename = "recipientRS")]
    pub recipient: Option<String>,
    /// Base-coin amount in NQT, reported as a digit string.
    #[serde(rename = "amountNQT")]
    pub amount_nqt: Option<String>,
    pub attachment: Option<TxAttachment>,
    /// Whether the transaction is subject to conditional approval.
    pub phased: bool,
}

/// Type-specific payload of a transaction. Only the fields relevant to
/// value-transfer classification are modeled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxAttachment {
    /// Asset id of an asset-exchange transfer.
    pub asset: Option<String>,
    /// Transferred quantity in QNT, a digit string.
    #[serde(rename = "quantityQNT")]
    pub quantity_qnt: Option<String>,
    /// Currency id of a monetary-system transfer.
    pub currency: Option<String>,
    /// Transferred currency units, a digit string.
    pub units: Option<String>,
}
