//! External rate sources.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use ledgerbook_shared::types::{Currency, RATE_SCALE};

use super::error::FxError;
use super::rate::RATE_BASIS;

/// A provider of daily exchange rates.
///
/// Implementations return rates as "units per 100 reference units",
/// already rounded to rate precision. A currency absent from the
/// response is simply omitted from the map; the caller decides what to
/// do about gaps (fallbacks, retries).
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches rates for the given date for all supported currencies.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Source`] when the provider cannot be reached
    /// or returns an unusable payload.
    async fn fetch(&self, date: NaiveDate) -> Result<HashMap<Currency, Decimal>, FxError>;
}

/// Frankfurter-style HTTP rate source.
///
/// Queries `{base_url}/{date}?base={reference}&symbols=...` and scales
/// the per-unit response up to the per-100 storage convention.
pub struct HttpRateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateSource {
    /// Builds a source against `base_url` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Source`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FxError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FxError::Source(format!("building http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: HashMap<String, Decimal>,
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self, date: NaiveDate) -> Result<HashMap<Currency, Decimal>, FxError> {
        let symbols: Vec<&str> = Currency::ALL
            .iter()
            .filter(|c| **c != Currency::REFERENCE)
            .map(|c| c.code())
            .collect();
        let url = format!(
            "{}/{}?base={}&symbols={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            Currency::REFERENCE.code(),
            symbols.join(",")
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FxError::Source(format!("requesting {url}: {e}")))?
            .error_for_status()
            .map_err(|e| FxError::Source(format!("rate source status: {e}")))?;

        let payload: RatesPayload = response
            .json()
            .await
            .map_err(|e| FxError::Source(format!("decoding rate payload: {e}")))?;

        let mut rates = HashMap::new();
        for (code, per_unit) in payload.rates {
            // Unknown symbols in the payload are ignored, as are
            // non-positive quotes.
            let Ok(currency) = code.parse::<Currency>() else {
                tracing::warn!(code, "rate source returned unknown currency");
                continue;
            };
            if per_unit <= Decimal::ZERO {
                tracing::warn!(%currency, %per_unit, "rate source returned non-positive quote");
                continue;
            }
            rates.insert(currency, (per_unit * RATE_BASIS).round_dp(RATE_SCALE));
        }
        tracing::debug!(%date, fetched = rates.len(), "pulled rates from source");
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payload_scaling_convention() {
        // 7.1234 CNY per USD stores as 712.3400 per 100 USD.
        let per_unit = dec!(7.1234);
        assert_eq!((per_unit * RATE_BASIS).round_dp(RATE_SCALE), dec!(712.3400));
    }

    #[test]
    fn test_payload_shape_parses() {
        let json = r#"{"base":"USD","date":"2026-03-13","rates":{"CNY":7.1234,"EUR":0.9215}}"#;
        let payload: RatesPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.rates.get("CNY"), Some(&dec!(7.1234)));
        assert_eq!(payload.rates.get("EUR"), Some(&dec!(0.9215)));
    }
}
