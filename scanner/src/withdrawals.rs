//! Matching block transfers against broadcast withdrawals.

use nxgate_store::WithdrawalStore;
use nxgate_types::{CurrencyProfile, WithdrawalMatch};

use crate::classifier::ClassifiedTransfer;
use crate::error::ScanError;

/// Finds transfers in a block that correspond to withdrawals this system
/// broadcast earlier.
///
/// Matching is by `(currency, txid)` against records still confirming; the
/// recipient plays no part because a broadcast withdrawal is already unique
/// by its txid. The variant check routes the txid lookup to the right
/// currency.
pub fn match_withdrawals(
    transfers: &[ClassifiedTransfer],
    block_number: u64,
    profiles: &[CurrencyProfile],
    withdrawals: &dyn WithdrawalStore,
) -> Result<Vec<WithdrawalMatch>, ScanError> {
    let mut matches = Vec::new();
    for transfer in transfers {
        for profile in profiles {
            if profile.variant != transfer.variant {
                continue;
            }
            if withdrawals
                .find_confirming(&profile.code, &transfer.txid)?
                .is_none()
            {
                continue;
            }
            matches.push(WithdrawalMatch {
                txid: transfer.txid.clone(),
                currency: profile.code.clone(),
                recipient: transfer.recipient.clone(),
                amount: transfer.amount,
                block_number,
            });
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use nxgate_store::MemoryStore;
    use nxgate_types::{
        AccountId, AssetVariant, CurrencyCode, NativeAmount, TxId, WithdrawalRecord,
    };

    use super::*;

    fn transfer(txid: &str) -> ClassifiedTransfer {
        ClassifiedTransfer {
            txid: TxId::normalized(txid),
            recipient: AccountId::normalized("NXT-THEIRS"),
            variant: AssetVariant::PlainCoin,
            amount: NativeAmount::new(150_000_000),
            phased: false,
        }
    }

    fn coin_profile() -> CurrencyProfile {
        CurrencyProfile::new("nxt", AssetVariant::PlainCoin, 8, NativeAmount::ZERO)
    }

    #[test]
    fn broadcast_withdrawal_is_matched_by_txid() {
        let store = MemoryStore::new();
        store
            .insert(WithdrawalRecord::confirming(
                TxId::normalized("9"),
                CurrencyCode::new("nxt"),
            ))
            .unwrap();
        let transfers = [transfer("9")];
        let matches = match_withdrawals(&transfers, 96, &[coin_profile()], &store).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].block_number, 96);
        assert_eq!(matches[0].amount, NativeAmount::new(150_000_000));
    }

    #[test]
    fn unknown_txid_matches_nothing() {
        let store = MemoryStore::new();
        let transfers = [transfer("9")];
        let matches = match_withdrawals(&transfers, 96, &[coin_profile()], &store).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn variant_mismatch_matches_nothing() {
        let store = MemoryStore::new();
        store
            .insert(WithdrawalRecord::confirming(
                TxId::normalized("9"),
                CurrencyCode::new("alpha"),
            ))
            .unwrap();
        let profile = CurrencyProfile::new(
            "alpha",
            AssetVariant::SubAsset { asset_id: "5".into() },
            0,
            NativeAmount::ZERO,
        );
        // A plain-coin transfer with the same txid must not confirm an
        // asset withdrawal.
        let transfers = [transfer("9")];
        let matches = match_withdrawals(&transfers, 96, &[profile], &store).unwrap();
        assert!(matches.is_empty());
    }
}
