//! Cross-currency conversion math.
//!
//! All conversion routes through the reference currency:
//! `amount * rate(target) / rate(source)`, then banker's rounding to
//! amount precision. Because every step rounds, a convert-and-back
//! round trip may not return the original amount; callers treat
//! converted values as derived, not authoritative.

use rust_decimal::Decimal;

use ledgerbook_shared::types::{AMOUNT_SCALE, Currency};

use super::rate::RateTable;

/// Converts `amount` from `source` to `target` using the table's rates
/// for one date. Identity conversions return the amount unchanged
/// (no rate needed, no rounding applied).
///
/// Returns `None` when either currency has no rate.
#[must_use]
pub fn convert(
    amount: Decimal,
    source: Currency,
    target: Currency,
    rates: &RateTable,
) -> Option<Decimal> {
    if source == target {
        return Some(amount);
    }
    let source_rate = rates.get(source)?;
    let target_rate = rates.get(target)?;
    Some((amount * target_rate / source_rate).round_dp(AMOUNT_SCALE))
}

/// Converts a native-currency amount into the base currency.
#[must_use]
pub fn convert_to_base(
    amount: Decimal,
    source: Currency,
    base: Currency,
    rates: &RateTable,
) -> Option<Decimal> {
    convert(amount, source, base, rates)
}

/// Converts a base-currency amount into a native currency.
#[must_use]
pub fn convert_from_base(
    amount: Decimal,
    target: Currency,
    base: Currency,
    rates: &RateTable,
) -> Option<Decimal> {
    convert(amount, base, target, rates)
}
