//! Value-transfer classification.
//!
//! Of everything an NXT-family node puts in a block (messaging, asset
//! issuance, orders, shuffling, account control), only three shapes move
//! value to a recipient and can therefore credit a deposit or confirm a
//! withdrawal. Classification resolves the shape once, up front, into a
//! tagged [`AssetVariant`]; everything downstream matches on the variant
//! instead of re-comparing type codes.

use nxgate_types::{AccountId, AssetVariant, NativeAmount, RawTransaction, TxAttachment, TxId};
use thiserror::Error;
use tracing::warn;

pub const TYPE_PAYMENT: i64 = 0;
pub const SUBTYPE_ORDINARY_PAYMENT: i64 = 0;
pub const TYPE_ASSET_EXCHANGE: i64 = 2;
pub const SUBTYPE_ASSET_TRANSFER: i64 = 1;
pub const TYPE_MONETARY_SYSTEM: i64 = 5;
pub const SUBTYPE_CURRENCY_TRANSFER: i64 = 3;

/// A transaction with a recognized transfer shape but broken fields.
/// Dropped with a warning where it is found; never fatal to its block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    #[error("field {field} is not a valid amount: {value:?}")]
    BadAmount { field: &'static str, value: String },
}

/// One recognized value transfer, ids normalized and amount parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTransfer {
    pub txid: TxId,
    pub recipient: AccountId,
    pub variant: AssetVariant,
    pub amount: NativeAmount,
    pub phased: bool,
}

/// Classifies one raw transaction.
///
/// `Ok(None)` means the transaction is not a value transfer we recognize
/// (no recipient, or an unrelated type/subtype pair) and is filtered
/// silently. `Err` means the shape was recognized but a field is broken;
/// the caller drops it loudly.
pub fn classify(tx: &RawTransaction) -> Result<Option<ClassifiedTransfer>, ClassifyError> {
    let Some(recipient) = tx.recipient.as_deref() else {
        return Ok(None);
    };
    let (kind, subtype) = match (tx.kind, tx.subtype) {
        (Some(kind), Some(subtype)) => (kind, subtype),
        _ => return Ok(None),
    };

    let (variant, amount) = match (kind, subtype) {
        (TYPE_PAYMENT, SUBTYPE_ORDINARY_PAYMENT) => {
            let raw = tx.amount_nqt.as_deref().ok_or(ClassifyError::MissingField {
                field: "amountNQT",
            })?;
            (AssetVariant::PlainCoin, parse_amount("amountNQT", raw)?)
        }
        (TYPE_ASSET_EXCHANGE, SUBTYPE_ASSET_TRANSFER) => {
            let attachment = required_attachment(tx)?;
            let asset_id = attachment.asset.clone().ok_or(ClassifyError::MissingField {
                field: "attachment.asset",
            })?;
            let raw = attachment
                .quantity_qnt
                .as_deref()
                .ok_or(ClassifyError::MissingField {
                    field: "attachment.quantityQNT",
                })?;
            (
                AssetVariant::SubAsset { asset_id },
                parse_amount("attachment.quantityQNT", raw)?,
            )
        }
        (TYPE_MONETARY_SYSTEM, SUBTYPE_CURRENCY_TRANSFER) => {
            let attachment = required_attachment(tx)?;
            let currency_id = attachment
                .currency
                .clone()
                .ok_or(ClassifyError::MissingField {
                    field: "attachment.currency",
                })?;
            let raw = attachment
                .units
                .as_deref()
                .ok_or(ClassifyError::MissingField {
                    field: "attachment.units",
                })?;
            (
                AssetVariant::SubCurrency { currency_id },
                parse_amount("attachment.units", raw)?,
            )
        }
        _ => return Ok(None),
    };

    let txid = TxId::normalized(&tx.id);
    if txid.is_empty() {
        return Err(ClassifyError::MissingField {
            field: "transaction",
        });
    }
    Ok(Some(ClassifiedTransfer {
        txid,
        recipient: AccountId::normalized(recipient),
        variant,
        amount,
        phased: tx.phased,
    }))
}

/// The output of classifying one batch of transactions (a block body, or
/// the fresh part of the unconfirmed pool).
#[derive(Debug, Default)]
pub struct ClassifiedBatch {
    pub transfers: Vec<ClassifiedTransfer>,
    pub malformed: u64,
}

/// Classifies a batch, dropping malformed transactions with a warning so
/// one broken entry never poisons the rest.
pub fn classify_batch<'a, I>(txs: I) -> ClassifiedBatch
where
    I: IntoIterator<Item = &'a RawTransaction>,
{
    let mut batch = ClassifiedBatch::default();
    for tx in txs {
        match classify(tx) {
            Ok(Some(transfer)) => batch.transfers.push(transfer),
            Ok(None) => {}
            Err(err) => {
                warn!(txid = %tx.id, error = %err, "dropping malformed transaction");
                batch.malformed += 1;
            }
        }
    }
    batch
}

fn required_attachment(tx: &RawTransaction) -> Result<&TxAttachment, ClassifyError> {
    tx.attachment.as_ref().ok_or(ClassifyError::MissingField {
        field: "attachment",
    })
}

fn parse_amount(field: &'static str, raw: &str) -> Result<NativeAmount, ClassifyError> {
    NativeAmount::parse(raw).map_err(|_| ClassifyError::BadAmount {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_tx() -> RawTransaction {
        RawTransaction {
            id: "16905439098234".to_string(),
            kind: Some(TYPE_PAYMENT),
            subtype: Some(SUBTYPE_ORDINARY_PAYMENT),
            recipient: Some("nxt-abcd-efgh-ijkl-mnopq".to_string()),
            amount_nqt: Some("150000000".to_string()),
            attachment: None,
            phased: false,
        }
    }

    #[test]
    fn classifies_a_plain_transfer() {
        let transfer = classify(&plain_tx()).unwrap().unwrap();
        assert_eq!(transfer.variant, AssetVariant::PlainCoin);
        assert_eq!(transfer.amount, NativeAmount::new(150_000_000));
        assert_eq!(transfer.recipient.as_str(), "NXT-ABCD-EFGH-IJKL-MNOPQ");
        assert_eq!(transfer.txid.as_str(), "16905439098234");
        assert!(!transfer.phased);
    }

    #[test]
    fn classifies_an_asset_transfer() {
        let tx = RawTransaction {
            kind: Some(TYPE_ASSET_EXCHANGE),
            subtype: Some(SUBTYPE_ASSET_TRANSFER),
            amount_nqt: None,
            attachment: Some(TxAttachment {
                asset: Some("5".to_string()),
                quantity_qnt: Some("1000".to_string()),
                ..TxAttachment::default()
            }),
            ..plain_tx()
        };
        let transfer = classify(&tx).unwrap().unwrap();
        assert_eq!(transfer.variant, AssetVariant::SubAsset { asset_id: "5".into() });
        assert_eq!(transfer.amount, NativeAmount::new(1000));
    }

    #[test]
    fn classifies_a_currency_transfer() {
        let tx = RawTransaction {
            kind: Some(TYPE_MONETARY_SYSTEM),
            subtype: Some(SUBTYPE_CURRENCY_TRANSFER),
            amount_nqt: None,
            phased: true,
            attachment: Some(TxAttachment {
                currency: Some("77".to_string()),
                units: Some("42".to_string()),
                ..TxAttachment::default()
            }),
            ..plain_tx()
        };
        let transfer = classify(&tx).unwrap().unwrap();
        assert_eq!(
            transfer.variant,
            AssetVariant::SubCurrency { currency_id: "77".into() }
        );
        assert_eq!(transfer.amount, NativeAmount::new(42));
        assert!(transfer.phased);
    }

    #[test]
    fn missing_recipient_is_filtered_silently() {
        let tx = RawTransaction {
            recipient: None,
            ..plain_tx()
        };
        assert_eq!(classify(&tx), Ok(None));
    }

    #[test]
    fn unrelated_shapes_are_filtered_silently() {
        // Messaging, asset issuance, a currency-transfer subtype that is
        // not a transfer, and a type-less transaction.
        for (kind, subtype) in [(Some(1), Some(0)), (Some(2), Some(0)), (Some(5), Some(0)), (None, None)] {
            let tx = RawTransaction {
                kind,
                subtype,
                ..plain_tx()
            };
            assert_eq!(classify(&tx), Ok(None), "type {kind:?}/{subtype:?}");
        }
    }

    #[test]
    fn recognized_shape_with_missing_amount_is_malformed() {
        let tx = RawTransaction {
            amount_nqt: None,
            ..plain_tx()
        };
        assert_eq!(
            classify(&tx),
            Err(ClassifyError::MissingField { field: "amountNQT" })
        );
    }

    #[test]
    fn recognized_shape_with_bad_digits_is_malformed() {
        let tx = RawTransaction {
            amount_nqt: Some("1.5e8".to_string()),
            ..plain_tx()
        };
        assert!(matches!(
            classify(&tx),
            Err(ClassifyError::BadAmount { field: "amountNQT", .. })
        ));
    }

    #[test]
    fn asset_transfer_without_attachment_is_malformed() {
        let tx = RawTransaction {
            kind: Some(TYPE_ASSET_EXCHANGE),
            subtype: Some(SUBTYPE_ASSET_TRANSFER),
            attachment: None,
            ..plain_tx()
        };
        assert_eq!(
            classify(&tx),
            Err(ClassifyError::MissingField { field: "attachment" })
        );
    }

    #[test]
    fn missing_txid_is_malformed() {
        let tx = RawTransaction {
            id: String::new(),
            ..plain_tx()
        };
        assert_eq!(
            classify(&tx),
            Err(ClassifyError::MissingField { field: "transaction" })
        );
    }

    #[test]
    fn batch_separates_transfers_from_malformed() {
        let good = plain_tx();
        let broken = RawTransaction {
            amount_nqt: Some("abc".to_string()),
            ..plain_tx()
        };
        let ignored = RawTransaction {
            kind: Some(1),
            ..plain_tx()
        };
        let batch = classify_batch([&good, &broken, &ignored]);
        assert_eq!(batch.transfers.len(), 1);
        assert_eq!(batch.malformed, 1);
    }
}
