//! FX rate repository: cached daily rates with pull-on-miss.
//!
//! Stored rates are "units per 100 reference units" at 4dp. A lookup
//! miss triggers one bulk pull for the date (always every supported
//! currency, never a single one), then falls back to derived rates
//! before giving up.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use ledgerbook_core::fx::{self, FxError, RateSource, RateTable};
use ledgerbook_shared::types::Currency;

use crate::entities::fx_rates;

/// Error types for rate operations.
#[derive(Debug, thiserror::Error)]
pub enum FxRateError {
    /// No rate obtainable for the currency and date.
    #[error(transparent)]
    Fx(#[from] FxError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// FX rate repository.
#[derive(Debug, Clone)]
pub struct FxRateRepository {
    db: DatabaseConnection,
}

impl FxRateRepository {
    /// Creates a new FX rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves one rate for a currency and date.
    ///
    /// Lookup order: stored row, bulk pull then stored row again,
    /// derived fallback (constant reference rate, peg proxies), then
    /// [`FxError::RateUnavailable`].
    ///
    /// # Errors
    ///
    /// Returns `RateUnavailable` when every step comes up empty, or a
    /// database error.
    pub async fn get_rate(
        &self,
        currency: Currency,
        date: NaiveDate,
        source: &dyn RateSource,
    ) -> Result<Decimal, FxRateError> {
        if currency == Currency::REFERENCE {
            return Ok(fx::rate::RATE_BASIS);
        }

        let stored = self.stored_map(date).await?;
        if let Some(rate) = stored.get(&currency) {
            return Ok(*rate);
        }

        // Miss: one bulk pull for the whole date, additive so manual
        // corrections survive. Fallbacks apply only after the pull.
        if let Err(err) = self.pull(date, false, source).await {
            tracing::warn!(%currency, %date, error = %err, "rate pull failed");
        }

        let table: RateTable = self.stored_map(date).await?.into_iter().collect();
        table
            .get(currency)
            .ok_or(FxRateError::Fx(FxError::RateUnavailable { currency, date }))
    }

    /// Pulls rates for every supported currency on `date` and stores
    /// them.
    ///
    /// With `overwrite` false the pull is additive: only currencies
    /// without a stored row for the date are inserted, so manual
    /// corrections are preserved. With `overwrite` true fetched values
    /// replace stored ones.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Source`] when the external source fails, or
    /// a database error.
    pub async fn pull(
        &self,
        date: NaiveDate,
        overwrite: bool,
        source: &dyn RateSource,
    ) -> Result<usize, FxRateError> {
        let fetched = source.fetch(date).await.map_err(FxRateError::Fx)?;
        if fetched.is_empty() {
            return Ok(0);
        }

        let existing: HashMap<Currency, fx_rates::Model> = self
            .stored_rows(date)
            .await?
            .into_iter()
            .filter_map(|row| {
                row.currency
                    .trim()
                    .parse::<Currency>()
                    .ok()
                    .map(|c| (c, row))
            })
            .collect();

        let now = chrono::Utc::now().into();
        let mut written = 0usize;

        for (currency, rate) in fetched {
            match existing.get(&currency) {
                Some(row) if overwrite => {
                    if row.rate != rate {
                        let mut active: fx_rates::ActiveModel = row.clone().into();
                        active.rate = Set(rate);
                        active.updated_at = Set(now);
                        active.update(&self.db).await?;
                        written += 1;
                    }
                }
                Some(_) => {} // additive pull keeps the stored value
                None => {
                    let active = fx_rates::ActiveModel {
                        currency: Set(currency.code().to_string()),
                        rate_date: Set(date),
                        rate: Set(rate),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    active.insert(&self.db).await?;
                    written += 1;
                }
            }
        }

        tracing::info!(%date, written, overwrite, "stored pulled rates");
        Ok(written)
    }

    /// Stores or replaces one rate by hand.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::NonPositiveRate`] for a rate at or below
    /// zero, or a database error.
    pub async fn set_rate(
        &self,
        currency: Currency,
        date: NaiveDate,
        rate: Decimal,
    ) -> Result<(), FxRateError> {
        let validated = fx::FxRate::new(currency, date, rate).map_err(FxRateError::Fx)?;
        let now = chrono::Utc::now().into();

        let existing = fx_rates::Entity::find_by_id((currency.code().to_string(), date))
            .one(&self.db)
            .await?;
        match existing {
            Some(row) => {
                let mut active: fx_rates::ActiveModel = row.into();
                active.rate = Set(validated.rate);
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let active = fx_rates::ActiveModel {
                    currency: Set(currency.code().to_string()),
                    rate_date: Set(date),
                    rate: Set(validated.rate),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&self.db).await?;
            }
        }
        Ok(())
    }

    /// Assembles the rate table for one date, pulling once when any
    /// supported currency is still unresolved (stored rows and
    /// fallbacks included). A manually corrected row for one currency
    /// must not suppress the pull for the others. Used by journal
    /// posting to convert a whole journal at a consistent set of
    /// rates.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure. A failed pull is
    /// logged and swallowed; missing currencies surface later as
    /// conversion misses.
    pub async fn rate_table(
        &self,
        date: NaiveDate,
        source: &dyn RateSource,
    ) -> Result<RateTable, FxRateError> {
        let table = self.stored_table(date).await?;
        if Currency::ALL.iter().all(|c| table.get(*c).is_some()) {
            return Ok(table);
        }
        if let Err(err) = self.pull(date, false, source).await {
            tracing::warn!(%date, error = %err, "rate pull failed");
        }
        self.stored_table(date).await
    }

    /// Converts an amount between currencies at one date's rates.
    ///
    /// # Errors
    ///
    /// Returns `RateUnavailable` when a needed rate is missing even
    /// after a pull.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
        date: NaiveDate,
        source: &dyn RateSource,
    ) -> Result<Decimal, FxRateError> {
        if from == to {
            return Ok(amount);
        }
        let table = self.rate_table(date, source).await?;
        fx::convert(amount, from, to, &table).ok_or_else(|| {
            let missing = if table.get(from).is_none() { from } else { to };
            FxRateError::Fx(FxError::RateUnavailable {
                currency: missing,
                date,
            })
        })
    }

    /// Stored rows for one date.
    async fn stored_rows(&self, date: NaiveDate) -> Result<Vec<fx_rates::Model>, DbErr> {
        fx_rates::Entity::find()
            .filter(fx_rates::Column::RateDate.eq(date))
            .all(&self.db)
            .await
    }

    async fn stored_map(&self, date: NaiveDate) -> Result<HashMap<Currency, Decimal>, FxRateError> {
        let rows = self.stored_rows(date).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.currency
                    .trim()
                    .parse::<Currency>()
                    .ok()
                    .map(|c| (c, row.rate))
            })
            .collect())
    }

    async fn stored_table(&self, date: NaiveDate) -> Result<RateTable, FxRateError> {
        Ok(self.stored_map(date).await?.into_iter().collect())
    }
}
