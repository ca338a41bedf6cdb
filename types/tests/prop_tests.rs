//! Property-based tests for the domain types: amount conversion, id
//! normalization, cursor monotonicity and the deposit state machine.

use nxgate_types::{AccountId, ChainCursor, DepositStatus, NativeAmount, TxId};
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = DepositStatus> {
    prop_oneof![
        Just(DepositStatus::Unconfirmed),
        Just(DepositStatus::Pending),
        Just(DepositStatus::Accepted),
        Just(DepositStatus::Collected),
        Just(DepositStatus::Rejected),
    ]
}

proptest! {
    /// Converting minor units to decimal and back is lossless for any
    /// realistic unit count at any supported scale.
    #[test]
    fn decimal_round_trip_is_lossless(units in 0u128..=u64::MAX as u128, scale in 0u32..=28) {
        let amount = NativeAmount::new(units);
        let dec = amount.to_decimal(scale).unwrap();
        let back = NativeAmount::from_decimal(dec, scale).unwrap();
        prop_assert_eq!(back, amount);
    }

    /// Parsing the display form of an amount reproduces the amount.
    #[test]
    fn digit_string_round_trip(units in any::<u128>()) {
        let amount = NativeAmount::new(units);
        prop_assert_eq!(NativeAmount::parse(&amount.to_string()).unwrap(), amount);
    }

    /// A decimal with fractional digits beyond the scale is always rejected,
    /// never silently rounded.
    #[test]
    fn finer_fraction_is_rejected(units in 1u128..=u64::MAX as u128, scale in 0u32..=27) {
        // Build a value with exactly scale+1 fractional digits and a
        // non-zero final digit.
        let finer = NativeAmount::new(units * 10 + 1).to_decimal(scale + 1).unwrap();
        prop_assert!(NativeAmount::from_decimal(finer, scale).is_err());
    }

    /// Address normalization is idempotent and case-insensitive.
    #[test]
    fn address_normalization_idempotent(raw in "[a-zA-Z0-9 -]{0,40}") {
        let once = AccountId::normalized(&raw);
        let twice = AccountId::normalized(once.as_str());
        prop_assert_eq!(&once, &twice);
        let swapped = AccountId::normalized(&raw.to_lowercase());
        prop_assert_eq!(once, swapped);
    }

    /// Txid normalization is idempotent and case-insensitive.
    #[test]
    fn txid_normalization_idempotent(raw in "[a-zA-Z0-9 ]{0,40}") {
        let once = TxId::normalized(&raw);
        let twice = TxId::normalized(once.as_str());
        prop_assert_eq!(&once, &twice);
        let swapped = TxId::normalized(&raw.to_uppercase());
        prop_assert_eq!(once, swapped);
    }

    /// The cursor never moves backwards, whatever sequence of positions is
    /// offered to it.
    #[test]
    fn cursor_is_monotonic(start in any::<u64>(), offers in prop::collection::vec(any::<u64>(), 0..32)) {
        let mut cursor = ChainCursor::new(start);
        let mut previous = cursor.height();
        for offer in offers {
            cursor.advance_to(offer);
            prop_assert!(cursor.height() >= previous);
            previous = cursor.height();
        }
        prop_assert!(cursor.height() >= start);
    }

    /// Terminal deposit states admit no outgoing transition.
    #[test]
    fn terminal_states_are_closed(from in any_status(), to in any_status()) {
        if from.is_terminal() {
            prop_assert!(!from.can_transition_to(to));
        }
    }

    /// Self-transitions are never legal.
    #[test]
    fn no_self_transition(status in any_status()) {
        prop_assert!(!status.can_transition_to(status));
    }
}
