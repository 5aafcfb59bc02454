//! Foreign-exchange rates and conversion.
//!
//! A rate is "units of currency per 100 units of the reference
//! currency" on a given date, stored at 4dp. Conversion between any
//! two supported currencies goes through the reference currency and
//! rounds to amount precision with banker's rounding. Fetching live
//! rates is abstracted behind [`RateSource`]; the cache-and-fallback
//! orchestration lives in the db crate's fx rate repository.

pub mod convert;
pub mod error;
pub mod rate;
pub mod source;

#[cfg(test)]
mod convert_props;

pub use convert::{convert, convert_from_base, convert_to_base};
pub use error::FxError;
pub use rate::{FxRate, RateTable, fallback_rate};
pub use source::{HttpRateSource, RateSource};
