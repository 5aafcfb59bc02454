//! Property tests for conversion math.

use proptest::prelude::*;
use rust_decimal::Decimal;

use ledgerbook_shared::types::{AMOUNT_SCALE, Currency};

use super::convert::convert;
use super::rate::RateTable;

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::ALL.to_vec())
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_00i64..=1_000_000_00).prop_map(|cents| Decimal::new(cents, 2))
}

/// A table quoting every non-reference currency at a positive rate.
fn arb_full_table() -> impl Strategy<Value = RateTable> {
    prop::collection::vec(1i64..=50_000_0000, Currency::ALL.len()).prop_map(|raw| {
        Currency::ALL
            .iter()
            .zip(raw)
            .map(|(currency, tenths)| (*currency, Decimal::new(tenths, 4)))
            .collect()
    })
}

proptest! {
    /// Identity conversion never touches the amount.
    #[test]
    fn prop_identity_is_exact(amount in arb_amount(), currency in arb_currency()) {
        let rates = RateTable::new();
        prop_assert_eq!(convert(amount, currency, currency, &rates), Some(amount));
    }

    /// Conversion output is always at amount precision.
    #[test]
    fn prop_output_scale_bounded(
        amount in arb_amount(),
        source in arb_currency(),
        target in arb_currency(),
        rates in arb_full_table(),
    ) {
        if let Some(converted) = convert(amount, source, target, &rates) {
            prop_assert!(converted.scale() <= AMOUNT_SCALE);
        }
    }

    /// Sign is preserved: positive stays non-negative, negative stays
    /// non-positive (rounding may collapse to zero).
    #[test]
    fn prop_sign_preserved(
        amount in arb_amount(),
        source in arb_currency(),
        target in arb_currency(),
        rates in arb_full_table(),
    ) {
        if let Some(converted) = convert(amount, source, target, &rates) {
            if amount > Decimal::ZERO {
                prop_assert!(converted >= Decimal::ZERO);
            } else if amount < Decimal::ZERO {
                prop_assert!(converted <= Decimal::ZERO);
            } else {
                prop_assert_eq!(converted, Decimal::ZERO);
            }
        }
    }

    /// Reference-currency rate lookups always succeed, so converting
    /// anything to or from the reference needs only one stored rate.
    #[test]
    fn prop_reference_always_convertible(
        amount in arb_amount(),
        rates in arb_full_table(),
    ) {
        prop_assert!(
            convert(amount, Currency::REFERENCE, Currency::Cny, &rates).is_some()
        );
        prop_assert!(
            convert(amount, Currency::Cny, Currency::REFERENCE, &rates).is_some()
        );
    }
}
