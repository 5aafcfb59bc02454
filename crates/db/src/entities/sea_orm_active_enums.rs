//! Database enum mappings.
//!
//! Each enum mirrors a Postgres `CREATE TYPE ... AS ENUM` from the
//! initial migration, with lossless conversions to and from the core
//! domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Statement type of a chart node or account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Asset accounts.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability accounts.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity accounts.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income accounts.
    #[sea_orm(string_value = "income")]
    Income,
    /// Expense accounts.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<ledgerbook_core::chart::AccountType> for AccountType {
    fn from(value: ledgerbook_core::chart::AccountType) -> Self {
        match value {
            ledgerbook_core::chart::AccountType::Asset => Self::Asset,
            ledgerbook_core::chart::AccountType::Liability => Self::Liability,
            ledgerbook_core::chart::AccountType::Equity => Self::Equity,
            ledgerbook_core::chart::AccountType::Income => Self::Income,
            ledgerbook_core::chart::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for ledgerbook_core::chart::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

/// Side of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_direction")]
pub enum EntryDirection {
    /// Debit side.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credit side.
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<ledgerbook_core::journal::EntryDirection> for EntryDirection {
    fn from(value: ledgerbook_core::journal::EntryDirection) -> Self {
        match value {
            ledgerbook_core::journal::EntryDirection::Debit => Self::Debit,
            ledgerbook_core::journal::EntryDirection::Credit => Self::Credit,
        }
    }
}

impl From<EntryDirection> for ledgerbook_core::journal::EntryDirection {
    fn from(value: EntryDirection) -> Self {
        match value {
            EntryDirection::Debit => Self::Debit,
            EntryDirection::Credit => Self::Credit,
        }
    }
}

/// Business origin of a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_source")]
pub enum JournalSource {
    /// Hand-entered journal.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Sales invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Purchase record.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Incoming or outgoing payment.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Expense claim.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Property ledger event.
    #[sea_orm(string_value = "property")]
    Property,
    /// Share capital event.
    #[sea_orm(string_value = "share")]
    Share,
}

impl From<ledgerbook_core::journal::JournalSource> for JournalSource {
    fn from(value: ledgerbook_core::journal::JournalSource) -> Self {
        match value {
            ledgerbook_core::journal::JournalSource::Manual => Self::Manual,
            ledgerbook_core::journal::JournalSource::Invoice => Self::Invoice,
            ledgerbook_core::journal::JournalSource::Purchase => Self::Purchase,
            ledgerbook_core::journal::JournalSource::Payment => Self::Payment,
            ledgerbook_core::journal::JournalSource::Expense => Self::Expense,
            ledgerbook_core::journal::JournalSource::Property => Self::Property,
            ledgerbook_core::journal::JournalSource::Share => Self::Share,
        }
    }
}

impl From<JournalSource> for ledgerbook_core::journal::JournalSource {
    fn from(value: JournalSource) -> Self {
        match value {
            JournalSource::Manual => Self::Manual,
            JournalSource::Invoice => Self::Invoice,
            JournalSource::Purchase => Self::Purchase,
            JournalSource::Payment => Self::Payment,
            JournalSource::Expense => Self::Expense,
            JournalSource::Property => Self::Property,
            JournalSource::Share => Self::Share,
        }
    }
}
