//! Candidate-deposit extraction from classified transfers.

use nxgate_store::AddressBook;
use nxgate_types::{CandidateDeposit, CurrencyProfile};
use tracing::info;

use crate::classifier::ClassifiedTransfer;
use crate::error::ScanError;

/// One extraction pass, with the drop tally the scanner feeds to metrics.
#[derive(Debug, Default)]
pub struct ExtractedDeposits {
    pub candidates: Vec<CandidateDeposit>,
    pub below_minimum: u64,
}

/// Assembles candidate deposits from a batch of classified transfers.
///
/// A transfer becomes a candidate for a currency when its variant equals
/// the currency's configured variant (identifier included, so a transfer of
/// asset "9" never credits a currency configured for asset "5") and its
/// recipient is one of our payment addresses for that currency. Candidates
/// at or below the currency minimum are dropped with a log note and
/// tallied, never materialized.
pub fn extract_deposits(
    transfers: &[ClassifiedTransfer],
    block_number: Option<u64>,
    profiles: &[CurrencyProfile],
    addresses: &dyn AddressBook,
) -> Result<ExtractedDeposits, ScanError> {
    let mut out = ExtractedDeposits::default();
    for transfer in transfers {
        for profile in profiles {
            if profile.variant != transfer.variant {
                continue;
            }
            if !addresses.is_payment_address(&profile.code, &transfer.recipient)? {
                continue;
            }
            if transfer.amount <= profile.min_deposit {
                info!(
                    txid = %transfer.txid,
                    currency = %profile.code,
                    amount = %transfer.amount,
                    minimum = %profile.min_deposit,
                    "skipping deposit at or below the configured minimum"
                );
                out.below_minimum += 1;
                continue;
            }
            out.candidates.push(CandidateDeposit {
                txid: transfer.txid.clone(),
                address: transfer.recipient.clone(),
                currency: profile.code.clone(),
                amount: transfer.amount,
                block_number,
                phased: transfer.phased,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use nxgate_store::MemoryStore;
    use nxgate_types::{AccountId, AssetVariant, CurrencyCode, NativeAmount, TxId};

    use super::*;

    fn transfer(txid: &str, variant: AssetVariant, amount: u128) -> ClassifiedTransfer {
        ClassifiedTransfer {
            txid: TxId::normalized(txid),
            recipient: AccountId::normalized("NXT-OURS"),
            variant,
            amount: NativeAmount::new(amount),
            phased: false,
        }
    }

    fn coin_profile(min: u128) -> CurrencyProfile {
        CurrencyProfile::new("nxt", AssetVariant::PlainCoin, 8, NativeAmount::new(min))
    }

    fn book_with_ours() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .register_address(CurrencyCode::new("nxt"), AccountId::normalized("NXT-OURS"))
            .unwrap();
        store
    }

    #[test]
    fn known_address_produces_a_candidate() {
        let book = book_with_ours();
        let transfers = [transfer("1", AssetVariant::PlainCoin, 150_000_000)];
        let out = extract_deposits(&transfers, Some(96), &[coin_profile(0)], &book).unwrap();
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].currency, CurrencyCode::new("nxt"));
        assert_eq!(out.candidates[0].block_number, Some(96));
    }

    #[test]
    fn unknown_recipient_is_ignored() {
        let book = MemoryStore::new();
        let transfers = [transfer("1", AssetVariant::PlainCoin, 150_000_000)];
        let out = extract_deposits(&transfers, Some(96), &[coin_profile(0)], &book).unwrap();
        assert!(out.candidates.is_empty());
        assert_eq!(out.below_minimum, 0);
    }

    #[test]
    fn variant_identifier_must_match_exactly() {
        let store = MemoryStore::new();
        store
            .register_address(CurrencyCode::new("alpha"), AccountId::normalized("NXT-OURS"))
            .unwrap();
        let profile = CurrencyProfile::new(
            "alpha",
            AssetVariant::SubAsset { asset_id: "5".into() },
            0,
            NativeAmount::ZERO,
        );
        let mismatched = [transfer("1", AssetVariant::SubAsset { asset_id: "9".into() }, 10)];
        let out = extract_deposits(&mismatched, Some(96), &[profile.clone()], &store).unwrap();
        assert!(out.candidates.is_empty());

        let matched = [transfer("2", AssetVariant::SubAsset { asset_id: "5".into() }, 10)];
        let out = extract_deposits(&matched, Some(96), &[profile], &store).unwrap();
        assert_eq!(out.candidates.len(), 1);
    }

    #[test]
    fn coin_transfer_never_credits_a_token_currency() {
        let store = MemoryStore::new();
        store
            .register_address(CurrencyCode::new("alpha"), AccountId::normalized("NXT-OURS"))
            .unwrap();
        let token_profile = CurrencyProfile::new(
            "alpha",
            AssetVariant::SubCurrency { currency_id: "7".into() },
            0,
            NativeAmount::ZERO,
        );
        let transfers = [transfer("1", AssetVariant::PlainCoin, 10)];
        let out = extract_deposits(&transfers, Some(96), &[token_profile], &store).unwrap();
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn amounts_at_or_below_minimum_are_dropped() {
        let book = book_with_ours();
        // Minimum of 1.0 whole units at scale 8.
        let profiles = [coin_profile(100_000_000)];
        let half = [transfer("1", AssetVariant::PlainCoin, 50_000_000)];
        let out = extract_deposits(&half, Some(96), &profiles, &book).unwrap();
        assert!(out.candidates.is_empty());
        assert_eq!(out.below_minimum, 1);

        let exactly = [transfer("2", AssetVariant::PlainCoin, 100_000_000)];
        let out = extract_deposits(&exactly, Some(96), &profiles, &book).unwrap();
        assert!(out.candidates.is_empty(), "boundary amount is still dropped");

        let above = [transfer("3", AssetVariant::PlainCoin, 100_000_001)];
        let out = extract_deposits(&above, Some(96), &profiles, &book).unwrap();
        assert_eq!(out.candidates.len(), 1);
    }

    #[test]
    fn pool_candidates_carry_no_block_number() {
        let book = book_with_ours();
        let transfers = [transfer("1", AssetVariant::PlainCoin, 150_000_000)];
        let out = extract_deposits(&transfers, None, &[coin_profile(0)], &book).unwrap();
        assert_eq!(out.candidates[0].block_number, None);
    }
}
