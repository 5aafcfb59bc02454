//! Journal domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_shared::types::currency::AMOUNT_SCALE;
use ledgerbook_shared::types::{AccountId, Currency, EntryId};

/// Direction of a single ledger entry.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/income accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/income accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl std::fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => f.write_str("debit"),
            Self::Credit => f.write_str("credit"),
        }
    }
}

/// Source tag classifying where a journal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalSource {
    /// Hand-entered journal.
    Manual,
    /// Generated from a sales invoice.
    Invoice,
    /// Generated from a purchase.
    Purchase,
    /// Generated from a payment.
    Payment,
    /// Generated from an expense claim.
    Expense,
    /// Generated from property, plant and equipment movements.
    Property,
    /// Generated from share transactions.
    Share,
}

impl std::fmt::Display for JournalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Manual => "manual",
            Self::Invoice => "invoice",
            Self::Purchase => "purchase",
            Self::Payment => "payment",
            Self::Expense => "expense",
            Self::Property => "property",
            Self::Share => "share",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for JournalSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "invoice" => Ok(Self::Invoice),
            "purchase" => Ok(Self::Purchase),
            "payment" => Ok(Self::Payment),
            "expense" => Ok(Self::Expense),
            "property" => Ok(Self::Property),
            "share" => Ok(Self::Share),
            _ => Err(format!("Unknown journal source: {s}")),
        }
    }
}

/// Input for a single entry in a journal.
///
/// The amount is in the account's native currency; the system resolves
/// the base-currency amount at the journal date.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// Existing entry id when updating, `None` for new entries.
    pub id: Option<EntryId>,
    /// The account to post against.
    pub account_id: AccountId,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Amount in the account's native currency (must be positive).
    pub amount: Decimal,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional project/event tag.
    pub tag: Option<String>,
}

/// Input for creating or updating a journal.
#[derive(Debug, Clone)]
pub struct JournalInput {
    /// The journal date; FX conversion uses rates for this date.
    pub journal_date: NaiveDate,
    /// Source tag.
    pub source: JournalSource,
    /// Free-text note.
    pub note: Option<String>,
    /// The entries to post.
    pub entries: Vec<EntryInput>,
}

/// An entry after validation and base-currency resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Existing entry id when updating, `None` for new entries.
    pub id: Option<EntryId>,
    /// The account posted against.
    pub account_id: AccountId,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Effective currency (account currency for balance-sheet accounts,
    /// base currency for income/expense accounts).
    pub currency: Currency,
    /// Amount in the effective currency.
    pub amount: Decimal,
    /// Amount converted into the book's base currency.
    pub amount_base: Decimal,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional project/event tag.
    pub tag: Option<String>,
}

/// Base-currency totals of a journal, used for the balance invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalTotals {
    /// Sum of debit amounts in base currency.
    pub debit_base: Decimal,
    /// Sum of credit amounts in base currency.
    pub credit_base: Decimal,
    /// Whether debits equal credits at amount precision.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates totals from debit and credit base-currency sums.
    ///
    /// Equality is checked after rounding both sides to amount
    /// precision (2dp), so multi-currency journals balance exactly in
    /// base currency even when raw currencies do not net to zero.
    #[must_use]
    pub fn new(debit_base: Decimal, credit_base: Decimal) -> Self {
        let debit = debit_base.round_dp(AMOUNT_SCALE);
        let credit = credit_base.round_dp(AMOUNT_SCALE);
        Self {
            debit_base: debit,
            credit_base: credit,
            is_balanced: debit == credit,
        }
    }

    /// Difference between debit and credit totals.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit_base - self.credit_base
    }
}
