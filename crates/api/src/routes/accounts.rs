//! Account registry routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledgerbook_core::chart::AccountType;
use ledgerbook_db::repositories::{
    AccountRecord, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
use ledgerbook_shared::AppError;
use ledgerbook_shared::types::{AccountId, ChartNodeId, Currency};

use crate::AppState;
use crate::error::ApiError;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account).get(list_accounts))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(remove_account),
        )
        .route(
            "/charts/{type}/nodes/{chart_id}/accounts",
            get(list_chart_accounts),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Explicit id; generated when absent.
    pub id: Option<Uuid>,
    /// Chart node to hang under.
    pub chart_id: Uuid,
    /// Account name.
    pub name: String,
    /// ISO 4217 currency code; required for balance-sheet accounts.
    pub currency: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New name.
    pub name: Option<String>,
    /// New chart node.
    pub chart_id: Option<Uuid>,
    /// New description.
    pub description: Option<String>,
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Restrict to one statement type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

/// One account on the wire.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account id.
    pub id: Uuid,
    /// Owning chart node.
    pub chart_id: Uuid,
    /// Account name.
    pub name: String,
    /// Statement type.
    pub account_type: String,
    /// Currency code, when the type carries one.
    pub currency: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

impl From<AccountRecord> for AccountResponse {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            chart_id: record.chart_id.into_inner(),
            name: record.name,
            account_type: record.account_type.to_string(),
            currency: record.currency.map(|c| c.code().to_string()),
            description: record.description,
        }
    }
}

fn parse_currency(raw: Option<String>) -> Result<Option<Currency>, ApiError> {
    raw.map(|code| {
        code.parse::<Currency>()
            .map_err(|e| ApiError(AppError::BusinessRule(e)))
    })
    .transpose()
}

async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let record = repo
        .add(CreateAccountInput {
            id: body.id.map(AccountId::from_uuid),
            chart_id: ChartNodeId::from_uuid(body.chart_id),
            name: body.name,
            currency: parse_currency(body.currency)?,
            description: body.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let account_type = query
        .account_type
        .map(|raw| {
            raw.parse::<AccountType>()
                .map_err(|e| ApiError(AppError::BusinessRule(e)))
        })
        .transpose()?;

    let repo = AccountRepository::new((*state.db).clone());
    let records = repo.list(account_type).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let record = repo.get(AccountId::from_uuid(id)).await?;
    Ok(Json(record.into()))
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let record = repo
        .update(
            AccountId::from_uuid(id),
            UpdateAccountInput {
                name: body.name,
                chart_id: body.chart_id.map(ChartNodeId::from_uuid),
                description: body.description,
            },
        )
        .await?;
    Ok(Json(record.into()))
}

async fn remove_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    repo.remove(AccountId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_chart_accounts(
    State(state): State<AppState>,
    Path((_raw_type, chart_id)): Path<(String, Uuid)>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let records = repo.list_by_chart(ChartNodeId::from_uuid(chart_id)).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
