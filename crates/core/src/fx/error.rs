//! FX error taxonomy.

use chrono::NaiveDate;

use ledgerbook_shared::types::Currency;

/// Errors from rate lookup and conversion.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// No rate could be obtained for the currency on the date, even
    /// after pulling from the external source and trying fallbacks.
    #[error("no rate available for {currency} on {date}")]
    RateUnavailable {
        /// The currency that could not be priced.
        currency: Currency,
        /// The requested rate date.
        date: NaiveDate,
    },

    /// A rate at or below zero was supplied or fetched.
    #[error("rate for {currency} must be positive, got {rate}")]
    NonPositiveRate {
        /// The offending currency.
        currency: Currency,
        /// The offending rate value.
        rate: rust_decimal::Decimal,
    },

    /// The external rate source failed or returned an unusable payload.
    #[error("rate source failure: {0}")]
    Source(String),
}
