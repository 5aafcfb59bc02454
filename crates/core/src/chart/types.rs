//! Chart of accounts domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_shared::types::ChartNodeId;

/// Statement type of an account or chart node.
///
/// Asset, liability, and equity accounts carry point-in-time balances;
/// income and expense accounts carry period flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (debit-normal, balance sheet).
    Asset,
    /// Liability account (credit-normal, balance sheet).
    Liability,
    /// Equity account (credit-normal, balance sheet).
    Equity,
    /// Income account (credit-normal, income statement).
    Income,
    /// Expense account (debit-normal, income statement).
    Expense,
}

impl AccountType {
    /// All statement types.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// The three balance-sheet statement types.
    pub const BALANCE_SHEET: [Self; 3] = [Self::Asset, Self::Liability, Self::Equity];

    /// The two income-statement types.
    pub const INCOME_STATEMENT: [Self; 2] = [Self::Income, Self::Expense];

    /// Returns true for asset/liability/equity.
    ///
    /// Balance-sheet accounts carry a transaction currency; income and
    /// expense accounts post only in base currency.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns the normal balance side for this statement type.
    #[must_use]
    pub const fn balance_side(self) -> BalanceSide {
        match self {
            Self::Asset | Self::Expense => BalanceSide::DebitNormal,
            Self::Liability | Self::Equity | Self::Income => BalanceSide::CreditNormal,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Normal balance side of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSide {
    /// Debit-normal accounts (asset, expense): net flow = debits - credits.
    DebitNormal,
    /// Credit-normal accounts (liability, equity, income): net flow = credits - debits.
    CreditNormal,
}

impl BalanceSide {
    /// Net signed flow for this side given debit and credit totals.
    #[must_use]
    pub fn signed_flow(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => debit - credit,
            Self::CreditNormal => credit - debit,
        }
    }
}

/// One node in the chart of accounts.
///
/// Nodes form a forest: `parent_id` is `None` for roots. The statement
/// type is immutable once the node is created; children always share
/// their parent's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartNode {
    /// Node identity.
    pub id: ChartNodeId,
    /// Display name.
    pub name: String,
    /// Statement type of this node and everything beneath it.
    pub account_type: AccountType,
    /// Parent node, or `None` for a root.
    pub parent_id: Option<ChartNodeId>,
}

impl ChartNode {
    /// Creates a new root node.
    #[must_use]
    pub fn root(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: ChartNodeId::new(),
            name: name.into(),
            account_type,
            parent_id: None,
        }
    }
}
