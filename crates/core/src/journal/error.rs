//! Journal validation error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use ledgerbook_shared::types::{AccountId, Currency};

/// Errors raised while validating and resolving a journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Journal has no entries.
    #[error("Journal must have at least one entry")]
    Empty,

    /// Journal has only debits or only credits.
    #[error("Journal must have both debit and credit entries")]
    SingleSided,

    /// Entry amount is zero or negative.
    #[error("Entry amount must be positive")]
    NonPositiveAmount,

    /// An entry references an account that does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// A balance-sheet account is missing its transaction currency.
    #[error("Account {0} has no currency but its type requires one")]
    MissingCurrency(AccountId),

    /// No FX rate available for the entry's currency at the journal date.
    #[error("No exchange rate for {currency} on {date}")]
    NoRate {
        /// Currency needing conversion.
        currency: Currency,
        /// Journal date.
        date: NaiveDate,
    },

    /// Base-currency debits and credits do not match.
    #[error("Journal is unbalanced: debits ({debit}) != credits ({credit}) in base currency")]
    Unbalanced {
        /// Total base-currency debits.
        debit: Decimal,
        /// Total base-currency credits.
        credit: Decimal,
    },
}
