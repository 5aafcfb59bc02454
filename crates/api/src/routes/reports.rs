//! Financial statement routes.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use ledgerbook_core::chart::AccountType;
use ledgerbook_core::journal::AccountFlow;
use ledgerbook_core::reporting::{
    BalanceSheetReport, IncomeStatementReport, ReportAccount, ReportingService,
};
use ledgerbook_db::repositories::{
    AccountRecord, AccountRepository, ChartRepository, JournalRepository,
};
use ledgerbook_shared::types::{AccountId, ChartNodeId};

use crate::AppState;
use crate::error::ApiError;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/income-statement", get(income_statement))
}

/// Query parameters for the balance sheet.
#[derive(Debug, Deserialize)]
pub struct BalanceSheetQuery {
    /// Balance date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

/// Query parameters for the income statement.
#[derive(Debug, Deserialize)]
pub struct IncomeStatementQuery {
    /// Window start, inclusive; open when absent.
    pub from: Option<NaiveDate>,
    /// Window end, inclusive; defaults to today.
    pub to: Option<NaiveDate>,
}

/// Groups one flow per account under its chart node. Accounts with no
/// postings still appear, with zero flows.
fn group_by_chart(
    records: Vec<AccountRecord>,
    flows: &HashMap<AccountId, AccountFlow>,
) -> HashMap<ChartNodeId, Vec<ReportAccount>> {
    let mut grouped: HashMap<ChartNodeId, Vec<ReportAccount>> = HashMap::new();
    for record in records {
        let (net_amount, net_base) = flows
            .get(&record.id)
            .map_or((Decimal::ZERO, Decimal::ZERO), |f| {
                (f.net_amount, f.net_base)
            });
        grouped.entry(record.chart_id).or_default().push(ReportAccount {
            account_id: record.id,
            name: record.name,
            currency: record.currency,
            net_amount,
            net_base,
        });
    }
    grouped
}

/// All-time income minus expense, from flows already floored at their
/// own windows.
fn net_income(records: &[AccountRecord], flows: &HashMap<AccountId, AccountFlow>) -> Decimal {
    records
        .iter()
        .filter_map(|record| {
            let flow = flows.get(&record.id)?;
            match record.account_type {
                AccountType::Income => Some(flow.net_base),
                AccountType::Expense => Some(-flow.net_base),
                _ => None,
            }
        })
        .sum()
}

async fn balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<BalanceSheetQuery>,
) -> Result<Json<BalanceSheetReport>, ApiError> {
    let as_of = query
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let charts = ChartRepository::new((*state.db).clone());
    let assets = charts.load(AccountType::Asset).await?;
    let liabilities = charts.load(AccountType::Liability).await?;
    let equity = charts.load(AccountType::Equity).await?;

    let accounts = AccountRepository::new((*state.db).clone());
    let records = accounts.list(None).await?;

    let journals = JournalRepository::new((*state.db).clone(), state.base_currency);
    let flows = journals.agg_accounts_flow(None, as_of).await?;

    let retained_earnings = net_income(&records, &flows);
    let grouped = group_by_chart(records, &flows);

    let report = ReportingService::balance_sheet(
        as_of,
        state.base_currency,
        &assets,
        &liabilities,
        &equity,
        &grouped,
        retained_earnings,
    )?;
    Ok(Json(report))
}

async fn income_statement(
    State(state): State<AppState>,
    Query(query): Query<IncomeStatementQuery>,
) -> Result<Json<IncomeStatementReport>, ApiError> {
    let end = query.to.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let charts = ChartRepository::new((*state.db).clone());
    let income = charts.load(AccountType::Income).await?;
    let expenses = charts.load(AccountType::Expense).await?;

    let accounts = AccountRepository::new((*state.db).clone());
    let records = accounts.list(None).await?;

    let journals = JournalRepository::new((*state.db).clone(), state.base_currency);
    let flows = journals.agg_accounts_flow(query.from, end).await?;

    let grouped = group_by_chart(records, &flows);

    let report = ReportingService::income_statement(
        query.from,
        end,
        state.base_currency,
        &income,
        &expenses,
        &grouped,
    )?;
    Ok(Json(report))
}
