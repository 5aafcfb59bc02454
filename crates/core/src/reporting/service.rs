//! Statement roll-up.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerbook_shared::types::{ChartNodeId, Currency};

use super::error::ReportingError;
use super::types::{
    BalanceSheetReport, ChartSummary, IncomeStatementReport, ReportAccount, ReportNode,
};
use crate::chart::{AccountType, ChartTree};

/// Name of the derived equity line on the balance sheet.
const RETAINED_EARNINGS: &str = "Retained Earnings";

/// Statement aggregation service.
///
/// Everything here is pure: flows are computed upstream by the journal
/// engine and handed in grouped by chart node.
pub struct ReportingService;

impl ReportingService {
    /// Builds a point-in-time balance sheet from the three
    /// balance-sheet chart forests and per-node account flows.
    ///
    /// `retained_earnings` is all-time income minus expense up to
    /// `as_of`; it appears as a synthetic equity line and counts
    /// toward the equity total.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::SectionTypeMismatch`] when a forest
    /// of the wrong statement type is supplied.
    pub fn balance_sheet(
        as_of: NaiveDate,
        base_currency: Currency,
        assets: &ChartTree,
        liabilities: &ChartTree,
        equity: &ChartTree,
        accounts: &HashMap<ChartNodeId, Vec<ReportAccount>>,
        retained_earnings: Decimal,
    ) -> Result<BalanceSheetReport, ReportingError> {
        let (asset_nodes, total_assets) = Self::section(AccountType::Asset, assets, accounts)?;
        let (liability_nodes, total_liabilities) =
            Self::section(AccountType::Liability, liabilities, accounts)?;
        let (mut equity_nodes, equity_subtotal) =
            Self::section(AccountType::Equity, equity, accounts)?;

        equity_nodes.push(ReportNode {
            chart_id: ChartNodeId::new(),
            name: RETAINED_EARNINGS.to_string(),
            summary: ChartSummary {
                net_base: retained_earnings,
            },
            accounts: Vec::new(),
            children: Vec::new(),
            synthetic: true,
        });
        let total_equity = equity_subtotal + retained_earnings;

        Ok(BalanceSheetReport {
            as_of,
            base_currency,
            assets: asset_nodes,
            liabilities: liability_nodes,
            equity: equity_nodes,
            retained_earnings,
            total_assets,
            total_liabilities,
            total_equity,
            is_balanced: total_assets == total_liabilities + total_equity,
        })
    }

    /// Builds a windowed income statement from the two
    /// income-statement chart forests and per-node account flows.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::SectionTypeMismatch`] when a forest
    /// of the wrong statement type is supplied.
    pub fn income_statement(
        start: Option<NaiveDate>,
        end: NaiveDate,
        base_currency: Currency,
        income: &ChartTree,
        expenses: &ChartTree,
        accounts: &HashMap<ChartNodeId, Vec<ReportAccount>>,
    ) -> Result<IncomeStatementReport, ReportingError> {
        let (income_nodes, total_income) = Self::section(AccountType::Income, income, accounts)?;
        let (expense_nodes, total_expense) =
            Self::section(AccountType::Expense, expenses, accounts)?;

        Ok(IncomeStatementReport {
            start,
            end,
            base_currency,
            income: income_nodes,
            expenses: expense_nodes,
            total_income,
            total_expense,
            net_profit: total_income - total_expense,
        })
    }

    /// Rolls one chart forest up into report nodes plus a section
    /// total. Nodes with no accounts and no children still appear,
    /// with a zero summary.
    fn section(
        expected: AccountType,
        tree: &ChartTree,
        accounts: &HashMap<ChartNodeId, Vec<ReportAccount>>,
    ) -> Result<(Vec<ReportNode>, Decimal), ReportingError> {
        if tree.account_type() != expected {
            return Err(ReportingError::SectionTypeMismatch {
                expected,
                actual: tree.account_type(),
            });
        }

        let nodes: Vec<ReportNode> = tree
            .roots()
            .iter()
            .filter_map(|id| Self::roll_up(tree, *id, accounts))
            .collect();
        let total = nodes.iter().map(|n| n.summary.net_base).sum();
        Ok((nodes, total))
    }

    /// Post-order roll-up of one subtree.
    fn roll_up(
        tree: &ChartTree,
        id: ChartNodeId,
        accounts: &HashMap<ChartNodeId, Vec<ReportAccount>>,
    ) -> Option<ReportNode> {
        let node = tree.find_by_id(id)?;

        let children: Vec<ReportNode> = tree
            .children_of(id)
            .iter()
            .filter_map(|child| Self::roll_up(tree, *child, accounts))
            .collect();

        let own_accounts = accounts.get(&id).cloned().unwrap_or_default();

        let own: Decimal = own_accounts.iter().map(|a| a.net_base).sum();
        let rolled: Decimal = children.iter().map(|c| c.summary.net_base).sum();

        Some(ReportNode {
            chart_id: id,
            name: node.name.clone(),
            summary: ChartSummary {
                net_base: own + rolled,
            },
            accounts: own_accounts,
            children,
            synthetic: false,
        })
    }
}
