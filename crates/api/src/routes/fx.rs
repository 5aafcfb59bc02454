//! Foreign exchange routes.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_db::repositories::FxRateRepository;
use ledgerbook_shared::AppError;
use ledgerbook_shared::types::Currency;

use crate::AppState;
use crate::error::ApiError;

/// Creates the FX routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fx/rates", get(get_rate))
        .route("/fx/pull", post(pull_rates))
        .route("/fx/convert", get(convert))
}

fn parse_currency(raw: &str) -> Result<Currency, ApiError> {
    raw.parse::<Currency>()
        .map_err(|e| ApiError(AppError::BusinessRule(e)))
}

/// Query parameters for a single rate lookup.
#[derive(Debug, Deserialize)]
pub struct RateQuery {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Rate date; defaults to today.
    pub date: Option<NaiveDate>,
}

/// One resolved rate.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Rate date.
    pub date: NaiveDate,
    /// Units of `currency` per 100 reference units.
    pub rate: Decimal,
}

async fn get_rate(
    State(state): State<AppState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<RateResponse>, ApiError> {
    let currency = parse_currency(&query.currency)?;
    let date = query
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let repo = FxRateRepository::new((*state.db).clone());
    let rate = repo.get_rate(currency, date, &*state.rate_source).await?;
    Ok(Json(RateResponse {
        currency: currency.code().to_string(),
        date,
        rate,
    }))
}

/// Request body for a bulk rate pull.
#[derive(Debug, Deserialize)]
pub struct PullRequest {
    /// Rate date to pull; defaults to today.
    pub date: Option<NaiveDate>,
    /// Replace stored rates that differ instead of keeping them.
    #[serde(default)]
    pub overwrite: bool,
}

/// Outcome of a bulk rate pull.
#[derive(Debug, Serialize)]
pub struct PullResponse {
    /// Rate date pulled.
    pub date: NaiveDate,
    /// Rows inserted or updated.
    pub written: usize,
}

async fn pull_rates(
    State(state): State<AppState>,
    Json(body): Json<PullRequest>,
) -> Result<Json<PullResponse>, ApiError> {
    let date = body
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let repo = FxRateRepository::new((*state.db).clone());
    let written = repo
        .pull(date, body.overwrite, &*state.rate_source)
        .await?;
    Ok(Json(PullResponse { date, written }))
}

/// Query parameters for a conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// Amount in `from` currency.
    pub amount: Decimal,
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Rate date; defaults to today.
    pub date: Option<NaiveDate>,
}

/// A finished conversion.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Amount in `from` currency.
    pub amount: Decimal,
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Rate date used.
    pub date: NaiveDate,
    /// Amount in `to` currency.
    pub converted: Decimal,
}

async fn convert(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let from = parse_currency(&query.from)?;
    let to = parse_currency(&query.to)?;
    let date = query
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let repo = FxRateRepository::new((*state.db).clone());
    let converted = repo
        .convert(query.amount, from, to, date, &*state.rate_source)
        .await?;
    Ok(Json(ConvertResponse {
        amount: query.amount,
        from: from.code().to_string(),
        to: to.code().to_string(),
        date,
        converted,
    }))
}
