//! Rate values and the per-date rate table.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_shared::types::{Currency, RATE_SCALE};

use super::error::FxError;

/// Units of the reference currency priced by one rate row.
pub const RATE_BASIS: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Fixed HKD-to-MOP peg used when the source does not quote MOP.
const MOP_PER_HKD: Decimal = Decimal::from_parts(103, 0, 0, false, 2);

/// One stored rate: units of `currency` per 100 units of the
/// reference currency on `rate_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxRate {
    /// Priced currency.
    pub currency: Currency,
    /// Quote date.
    pub rate_date: NaiveDate,
    /// Units per 100 reference units, 4dp.
    pub rate: Decimal,
}

impl FxRate {
    /// Builds a rate, rejecting non-positive values and normalizing to
    /// rate precision with banker's rounding.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::NonPositiveRate`] when `rate <= 0`.
    pub fn new(currency: Currency, rate_date: NaiveDate, rate: Decimal) -> Result<Self, FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::NonPositiveRate { currency, rate });
        }
        Ok(Self {
            currency,
            rate_date,
            rate: rate.round_dp(RATE_SCALE),
        })
    }
}

/// In-memory rates for a single date, keyed by currency.
///
/// Repositories assemble one of these from stored rows; conversion
/// reads from it. The reference currency is always present at the
/// constant basis value.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<Currency, Decimal>,
}

impl RateTable {
    /// An empty table. The reference currency still resolves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a currency's rate.
    pub fn insert(&mut self, currency: Currency, rate: Decimal) {
        self.rates.insert(currency, rate.round_dp(RATE_SCALE));
    }

    /// Looks up a currency, applying the constant-reference and
    /// peg-proxy fallbacks when the currency has no stored rate.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Option<Decimal> {
        if currency == Currency::REFERENCE {
            return Some(RATE_BASIS);
        }
        if let Some(rate) = self.rates.get(&currency) {
            return Some(*rate);
        }
        fallback_rate(currency, |c| self.rates.get(&c).copied())
    }

}

impl FromIterator<(Currency, Decimal)> for RateTable {
    fn from_iter<T: IntoIterator<Item = (Currency, Decimal)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (currency, rate) in iter {
            table.insert(currency, rate);
        }
        table
    }
}

/// Derives a rate for currencies the external source does not quote.
///
/// The reference currency is the constant basis. MOP proxies HKD via
/// the fixed peg. Everything else has no fallback.
pub fn fallback_rate<L>(currency: Currency, lookup: L) -> Option<Decimal>
where
    L: Fn(Currency) -> Option<Decimal>,
{
    if currency == Currency::REFERENCE {
        return Some(RATE_BASIS);
    }
    match currency {
        Currency::Mop => lookup(Currency::Hkd).map(|hkd| (hkd * MOP_PER_HKD).round_dp(RATE_SCALE)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_new_rounds_to_rate_precision() {
        let rate = FxRate::new(Currency::Cny, date(), dec!(712.34567)).unwrap();
        // Banker's rounding on the trailing 67.
        assert_eq!(rate.rate, dec!(712.3457));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1.5))]
    fn test_new_rejects_non_positive(#[case] bad: Decimal) {
        let err = FxRate::new(Currency::Eur, date(), bad).unwrap_err();
        assert!(matches!(err, FxError::NonPositiveRate { .. }));
    }

    #[test]
    fn test_reference_is_constant_even_in_empty_table() {
        let table = RateTable::new();
        assert_eq!(table.get(Currency::Usd), Some(dec!(100)));
    }

    #[test]
    fn test_mop_proxies_hkd_via_peg() {
        let mut table = RateTable::new();
        table.insert(Currency::Hkd, dec!(780.0000));
        assert_eq!(table.get(Currency::Mop), Some(dec!(803.4000)));
    }

    #[test]
    fn test_stored_mop_beats_peg_proxy() {
        let mut table = RateTable::new();
        table.insert(Currency::Hkd, dec!(780.0000));
        table.insert(Currency::Mop, dec!(801.2500));
        assert_eq!(table.get(Currency::Mop), Some(dec!(801.2500)));
    }

    #[test]
    fn test_missing_currency_without_fallback_is_none() {
        let table = RateTable::new();
        assert_eq!(table.get(Currency::Jpy), None);
        assert_eq!(table.get(Currency::Mop), None);
    }
}
