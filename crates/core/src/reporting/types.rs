//! Report output shapes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_shared::types::{AccountId, ChartNodeId, Currency};

/// Rolled-up base-currency total for one chart node's subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSummary {
    /// Subtree net in base currency: own accounts plus all descendants.
    pub net_base: Decimal,
}

impl ChartSummary {
    /// A zero summary.
    pub const ZERO: Self = Self {
        net_base: Decimal::ZERO,
    };
}

/// One account line inside a report node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportAccount {
    /// The account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Native currency; `None` for income/expense accounts.
    pub currency: Option<Currency>,
    /// Net flow in the account's native currency.
    pub net_amount: Decimal,
    /// Net flow in base currency.
    pub net_base: Decimal,
}

/// One chart node in a report section, with its subtree rolled up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportNode {
    /// Chart node id; synthetic lines carry a fresh id.
    pub chart_id: ChartNodeId,
    /// Node name.
    pub name: String,
    /// Subtree roll-up.
    pub summary: ChartSummary,
    /// Accounts attached directly to this node.
    pub accounts: Vec<ReportAccount>,
    /// Child nodes, in chart order.
    pub children: Vec<ReportNode>,
    /// True for derived lines such as retained earnings.
    pub synthetic: bool,
}

/// Point-in-time balance sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Balance date (inclusive).
    pub as_of: NaiveDate,
    /// Base currency all totals are stated in.
    pub base_currency: Currency,
    /// Asset section roots.
    pub assets: Vec<ReportNode>,
    /// Liability section roots.
    pub liabilities: Vec<ReportNode>,
    /// Equity section roots, including the retained-earnings line.
    pub equity: Vec<ReportNode>,
    /// All-time income minus expense up to `as_of`. Derived, never a
    /// stored account.
    pub retained_earnings: Decimal,
    /// Section totals.
    pub total_assets: Decimal,
    /// Liability section total.
    pub total_liabilities: Decimal,
    /// Equity section total, retained earnings included.
    pub total_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Windowed income statement, base currency only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Window start (inclusive); open when absent.
    pub start: Option<NaiveDate>,
    /// Window end (inclusive).
    pub end: NaiveDate,
    /// Base currency all totals are stated in.
    pub base_currency: Currency,
    /// Income section roots.
    pub income: Vec<ReportNode>,
    /// Expense section roots.
    pub expenses: Vec<ReportNode>,
    /// Income section total.
    pub total_income: Decimal,
    /// Expense section total.
    pub total_expense: Decimal,
    /// Income minus expense over the window.
    pub net_profit: Decimal,
}
