//! Journal validation and resolution.
//!
//! This is pure business logic with no database dependency: account
//! existence and FX conversion are injected as closures, so the same
//! pipeline runs against the repository in production and against maps
//! in tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerbook_shared::types::{AccountId, Currency};

use super::error::JournalError;
use super::types::{EntryDirection, JournalInput, JournalTotals, ResolvedEntry};
use crate::chart::AccountType;

/// Account facts needed to resolve an entry.
#[derive(Debug, Clone)]
pub struct AccountRef {
    /// The account id.
    pub id: AccountId,
    /// Statement type of the account.
    pub account_type: AccountType,
    /// Transaction currency; present exactly for balance-sheet accounts.
    pub currency: Option<Currency>,
}

/// Journal validation and resolution service.
pub struct JournalService;

impl JournalService {
    /// Validates a journal draft and resolves every entry into its
    /// effective currency and base-currency amount.
    ///
    /// Steps:
    /// 1. Require at least one entry, with both sides represented
    /// 2. Require every amount to be strictly positive
    /// 3. Resolve each entry's account and effective currency
    ///    (balance-sheet accounts post in their own currency, income
    ///    and expense accounts post in base currency)
    /// 4. Convert amounts to base currency at the journal date
    /// 5. Merge redundant entries (same account + currency + direction)
    /// 6. Enforce the balance invariant: base-currency debits equal
    ///    base-currency credits at amount precision; per-raw-currency
    ///    balancing is deliberately NOT required, the FX gain/loss
    ///    accounts absorb raw-currency mismatch
    ///
    /// # Errors
    ///
    /// Returns `JournalError` describing the first violation found.
    pub fn validate_and_resolve<L, C>(
        input: &JournalInput,
        base_currency: Currency,
        account_lookup: L,
        to_base: C,
    ) -> Result<(Vec<ResolvedEntry>, JournalTotals), JournalError>
    where
        L: Fn(AccountId) -> Option<AccountRef>,
        C: Fn(Decimal, Currency, NaiveDate) -> Option<Decimal>,
    {
        if input.entries.is_empty() {
            return Err(JournalError::Empty);
        }

        let has_debit = input
            .entries
            .iter()
            .any(|e| e.direction == EntryDirection::Debit);
        let has_credit = input
            .entries
            .iter()
            .any(|e| e.direction == EntryDirection::Credit);
        if !has_debit || !has_credit {
            return Err(JournalError::SingleSided);
        }

        let mut resolved = Vec::with_capacity(input.entries.len());
        for entry in &input.entries {
            if entry.amount <= Decimal::ZERO {
                return Err(JournalError::NonPositiveAmount);
            }

            let account = account_lookup(entry.account_id)
                .ok_or(JournalError::AccountNotFound(entry.account_id))?;

            let currency = if account.account_type.is_balance_sheet() {
                account
                    .currency
                    .ok_or(JournalError::MissingCurrency(account.id))?
            } else {
                // Income/expense accounts post only in base currency.
                base_currency
            };

            let amount_base = if currency == base_currency {
                entry.amount
            } else {
                to_base(entry.amount, currency, input.journal_date).ok_or(
                    JournalError::NoRate {
                        currency,
                        date: input.journal_date,
                    },
                )?
            };

            resolved.push(ResolvedEntry {
                id: entry.id,
                account_id: entry.account_id,
                direction: entry.direction,
                currency,
                amount: entry.amount,
                amount_base,
                description: entry.description.clone(),
                tag: entry.tag.clone(),
            });
        }

        let resolved = Self::merge_redundant(resolved);

        let totals = Self::totals(&resolved);
        if !totals.is_balanced {
            return Err(JournalError::Unbalanced {
                debit: totals.debit_base,
                credit: totals.credit_base,
            });
        }

        Ok((resolved, totals))
    }

    /// Combines entries hitting the same (account, currency, direction)
    /// into one, summing amounts. The merged entry keeps the first
    /// occurrence's position, description, and tag; merging never
    /// changes any account's net flow.
    #[must_use]
    pub fn merge_redundant(entries: Vec<ResolvedEntry>) -> Vec<ResolvedEntry> {
        let mut merged: Vec<ResolvedEntry> = Vec::with_capacity(entries.len());

        for entry in entries {
            let existing = merged.iter_mut().find(|m| {
                m.account_id == entry.account_id
                    && m.currency == entry.currency
                    && m.direction == entry.direction
            });
            match existing {
                Some(m) => {
                    m.amount += entry.amount;
                    m.amount_base += entry.amount_base;
                    // A merged entry loses its separate identity.
                    m.id = None;
                }
                None => merged.push(entry),
            }
        }

        merged
    }

    /// Returns true when no two entries are mergeable.
    #[must_use]
    pub fn is_non_redundant(entries: &[ResolvedEntry]) -> bool {
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if a.account_id == b.account_id
                    && a.currency == b.currency
                    && a.direction == b.direction
                {
                    return false;
                }
            }
        }
        true
    }

    /// Base-currency totals over resolved entries.
    #[must_use]
    pub fn totals(entries: &[ResolvedEntry]) -> JournalTotals {
        let debit: Decimal = entries
            .iter()
            .filter(|e| e.direction == EntryDirection::Debit)
            .map(|e| e.amount_base)
            .sum();
        let credit: Decimal = entries
            .iter()
            .filter(|e| e.direction == EntryDirection::Credit)
            .map(|e| e.amount_base)
            .sum();
        JournalTotals::new(debit, credit)
    }
}
