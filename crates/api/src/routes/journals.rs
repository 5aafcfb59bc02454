//! Journal routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledgerbook_core::journal::{EntryDirection, EntryInput, JournalInput, JournalSource};
use ledgerbook_db::repositories::{
    FxRateRepository, JournalBrief, JournalFilter, JournalRepository, JournalWithEntries,
};
use ledgerbook_shared::AppError;
use ledgerbook_shared::types::{AccountId, EntryId, JournalId, PageRequest, PageResponse};

use crate::AppState;
use crate::error::ApiError;

/// Creates the journal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journals", post(create_journal).get(list_journals))
        .route(
            "/journals/{id}",
            get(get_journal).put(update_journal).delete(remove_journal),
        )
}

/// One entry line in a journal request.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// Existing entry id when updating; omitted for new lines.
    pub id: Option<Uuid>,
    /// Account to post against.
    pub account_id: Uuid,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Amount in the account's currency.
    pub amount: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Grouping tag.
    pub tag: Option<String>,
}

/// Request body for creating or updating a journal.
#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    /// Accounting date; FX conversion uses this date's rates.
    pub journal_date: NaiveDate,
    /// Business origin; defaults to manual.
    pub source: Option<JournalSource>,
    /// Free-form note.
    pub note: Option<String>,
    /// Entry lines.
    pub entries: Vec<EntryRequest>,
}

impl From<JournalRequest> for JournalInput {
    fn from(body: JournalRequest) -> Self {
        Self {
            journal_date: body.journal_date,
            source: body.source.unwrap_or(JournalSource::Manual),
            note: body.note,
            entries: body
                .entries
                .into_iter()
                .map(|e| EntryInput {
                    id: e.id.map(EntryId::from_uuid),
                    account_id: AccountId::from_uuid(e.account_id),
                    direction: e.direction,
                    amount: e.amount,
                    description: e.description,
                    tag: e.tag,
                })
                .collect(),
        }
    }
}

/// Query parameters for listing journals.
#[derive(Debug, Deserialize)]
pub struct ListJournalsQuery {
    /// Restrict to one business origin.
    pub source: Option<JournalSource>,
    /// Earliest accounting date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest accounting date, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Comma-separated account ids; a journal matches when any entry
    /// touches one of them.
    pub account_ids: Option<String>,
    /// Comma-separated account names.
    pub account_names: Option<String>,
    /// Substring match on the note.
    pub note: Option<String>,
    /// Minimum base-currency debit total, inclusive.
    pub min_base_total: Option<Decimal>,
    /// Maximum base-currency debit total, inclusive.
    pub max_base_total: Option<Decimal>,
    /// Exact number of entries.
    pub entry_count: Option<usize>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ListJournalsQuery {
    fn into_filter(self) -> Result<(JournalFilter, PageRequest), ApiError> {
        let account_ids = self
            .account_ids
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<AccountId>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(|e| ApiError(AppError::BusinessRule(format!("invalid account id: {e}"))))?;

        let account_names = self.account_names.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        };

        let filter = JournalFilter {
            ids: None,
            source: self.source,
            date_from: self.date_from,
            date_to: self.date_to,
            account_ids,
            account_names,
            note_contains: self.note,
            min_base_total: self.min_base_total,
            max_base_total: self.max_base_total,
            entry_count: self.entry_count,
        };
        Ok((filter, page))
    }
}

/// One entry line on the wire.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry id.
    pub id: Uuid,
    /// Account posted to.
    pub account_id: Uuid,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Currency code of `amount`.
    pub currency: String,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Amount in base currency.
    pub amount_base: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Grouping tag.
    pub tag: Option<String>,
}

/// A journal with its entries on the wire.
#[derive(Debug, Serialize)]
pub struct JournalResponse {
    /// Journal id.
    pub id: Uuid,
    /// Accounting date.
    pub journal_date: NaiveDate,
    /// Business origin.
    pub source: JournalSource,
    /// Free-form note.
    pub note: Option<String>,
    /// Entries in stored order.
    pub entries: Vec<EntryResponse>,
}

impl From<JournalWithEntries> for JournalResponse {
    fn from(journal: JournalWithEntries) -> Self {
        Self {
            id: journal.id.into_inner(),
            journal_date: journal.journal_date,
            source: journal.source,
            note: journal.note,
            entries: journal
                .entries
                .into_iter()
                .map(|e| EntryResponse {
                    id: e.id.into_inner(),
                    account_id: e.account_id.into_inner(),
                    direction: e.direction,
                    currency: e.currency.code().to_string(),
                    amount: e.amount,
                    amount_base: e.amount_base,
                    description: e.description,
                    tag: e.tag,
                })
                .collect(),
        }
    }
}

/// A listing row: header plus derived figures.
#[derive(Debug, Serialize)]
pub struct JournalBriefResponse {
    /// Journal id.
    pub id: Uuid,
    /// Accounting date.
    pub journal_date: NaiveDate,
    /// Business origin.
    pub source: JournalSource,
    /// Free-form note.
    pub note: Option<String>,
    /// Number of entries.
    pub entry_count: usize,
    /// Base-currency debit total.
    pub total_base: Decimal,
}

impl From<JournalBrief> for JournalBriefResponse {
    fn from(brief: JournalBrief) -> Self {
        Self {
            id: brief.id.into_inner(),
            journal_date: brief.journal_date,
            source: brief.source,
            note: brief.note,
            entry_count: brief.entry_count,
            total_base: brief.debit_base,
        }
    }
}

async fn create_journal(
    State(state): State<AppState>,
    Json(body): Json<JournalRequest>,
) -> Result<(StatusCode, Json<JournalResponse>), ApiError> {
    let input: JournalInput = body.into();

    let fx = FxRateRepository::new((*state.db).clone());
    let rates = fx
        .rate_table(input.journal_date, &*state.rate_source)
        .await?;

    let repo = JournalRepository::new((*state.db).clone(), state.base_currency);
    let journal = repo.create(&input, &rates).await?;
    Ok((StatusCode::CREATED, Json(journal.into())))
}

async fn list_journals(
    State(state): State<AppState>,
    Query(query): Query<ListJournalsQuery>,
) -> Result<Json<PageResponse<JournalBriefResponse>>, ApiError> {
    let (filter, page) = query.into_filter()?;

    let repo = JournalRepository::new((*state.db).clone(), state.base_currency);
    let result = repo.list(&filter, &page).await?;
    Ok(Json(PageResponse {
        data: result.data.into_iter().map(Into::into).collect(),
        meta: result.meta,
    }))
}

async fn get_journal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalResponse>, ApiError> {
    let repo = JournalRepository::new((*state.db).clone(), state.base_currency);
    let journal = repo.get(JournalId::from_uuid(id)).await?;
    Ok(Json(journal.into()))
}

async fn update_journal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<JournalRequest>,
) -> Result<Json<JournalResponse>, ApiError> {
    let input: JournalInput = body.into();

    let fx = FxRateRepository::new((*state.db).clone());
    let rates = fx
        .rate_table(input.journal_date, &*state.rate_source)
        .await?;

    let repo = JournalRepository::new((*state.db).clone(), state.base_currency);
    let journal = repo.update(JournalId::from_uuid(id), &input, &rates).await?;
    Ok(Json(journal.into()))
}

async fn remove_journal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = JournalRepository::new((*state.db).clone(), state.base_currency);
    repo.remove(JournalId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_query() -> ListJournalsQuery {
        ListJournalsQuery {
            source: None,
            date_from: None,
            date_to: None,
            account_ids: None,
            account_names: None,
            note: None,
            min_base_total: None,
            max_base_total: None,
            entry_count: None,
            page: None,
            per_page: None,
        }
    }

    #[test]
    fn test_filter_defaults_pagination() {
        let (filter, page) = empty_query().into_filter().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 20);
        assert!(filter.account_ids.is_none());
        assert!(filter.account_names.is_none());
    }

    #[test]
    fn test_filter_splits_account_ids() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let mut query = empty_query();
        query.account_ids = Some(format!("{a}, {b},"));

        let (filter, _) = query.into_filter().unwrap();
        let ids = filter.account_ids.unwrap();
        assert_eq!(ids, vec![AccountId::from_uuid(a), AccountId::from_uuid(b)]);
    }

    #[test]
    fn test_filter_rejects_bad_account_id() {
        let mut query = empty_query();
        query.account_ids = Some("not-a-uuid".to_string());
        assert!(query.into_filter().is_err());
    }

    #[test]
    fn test_filter_splits_account_names() {
        let mut query = empty_query();
        query.account_names = Some("Bank CNY,Cash".to_string());

        let (filter, _) = query.into_filter().unwrap();
        assert_eq!(
            filter.account_names.unwrap(),
            vec!["Bank CNY".to_string(), "Cash".to_string()]
        );
    }
}
