//! Account flow aggregation.
//!
//! A "flow" is the net signed movement of an account over a window,
//! signed by the account's normal balance side: asset and expense
//! accounts net debit-positive, liability, equity and income accounts
//! net credit-positive. Balance-sheet accounts ignore the window start
//! (a balance is a point-in-time snapshot); income-statement accounts
//! are genuinely windowed (a period flow). Flows are derived on demand
//! and never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerbook_shared::types::{AccountId, Currency};

use super::types::EntryDirection;
use crate::chart::AccountType;

/// Net flow of one account over a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountFlow {
    /// The account.
    pub account_id: AccountId,
    /// Statement type of the account.
    pub account_type: AccountType,
    /// Native currency; `None` for income/expense accounts (base only).
    pub currency: Option<Currency>,
    /// Net signed flow in the account's native currency.
    pub net_amount: Decimal,
    /// Net signed flow in base currency.
    pub net_base: Decimal,
}

impl AccountFlow {
    /// A zero flow for an account.
    #[must_use]
    pub fn zero(
        account_id: AccountId,
        account_type: AccountType,
        currency: Option<Currency>,
    ) -> Self {
        Self {
            account_id,
            account_type,
            currency,
            net_amount: Decimal::ZERO,
            net_base: Decimal::ZERO,
        }
    }
}

/// Effective date window for summing an account's entries.
///
/// Balance-sheet accounts drop the start floor; income-statement
/// accounts keep it.
#[must_use]
pub fn effective_window(
    account_type: AccountType,
    start: Option<NaiveDate>,
    end: NaiveDate,
) -> (Option<NaiveDate>, NaiveDate) {
    if account_type.is_balance_sheet() {
        (None, end)
    } else {
        (start, end)
    }
}

/// Accumulates (raw, base) entry amounts into a net signed flow.
///
/// Entries are `(direction, amount, amount_base)` triples, already
/// filtered to the effective window.
#[must_use]
pub fn accumulate_flow(
    account_type: AccountType,
    entries: impl IntoIterator<Item = (EntryDirection, Decimal, Decimal)>,
) -> (Decimal, Decimal) {
    let mut debit_amount = Decimal::ZERO;
    let mut credit_amount = Decimal::ZERO;
    let mut debit_base = Decimal::ZERO;
    let mut credit_base = Decimal::ZERO;

    for (direction, amount, amount_base) in entries {
        match direction {
            EntryDirection::Debit => {
                debit_amount += amount;
                debit_base += amount_base;
            }
            EntryDirection::Credit => {
                credit_amount += amount;
                credit_base += amount_base;
            }
        }
    }

    let side = account_type.balance_side();
    (
        side.signed_flow(debit_amount, credit_amount),
        side.signed_flow(debit_base, credit_base),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_flow_is_debit_positive() {
        let (net, net_base) = accumulate_flow(
            AccountType::Asset,
            vec![
                (EntryDirection::Debit, dec!(100), dec!(100)),
                (EntryDirection::Credit, dec!(98), dec!(98)),
            ],
        );
        assert_eq!(net, dec!(2));
        assert_eq!(net_base, dec!(2));
    }

    #[test]
    fn test_income_flow_is_credit_positive() {
        let (net, _) = accumulate_flow(
            AccountType::Income,
            vec![
                (EntryDirection::Credit, dec!(500), dec!(500)),
                (EntryDirection::Debit, dec!(20), dec!(20)),
            ],
        );
        assert_eq!(net, dec!(480));
    }

    #[test]
    fn test_bank_payment_scenario() {
        // Credit Bank 98.00: asset nets -98.00.
        let (net, net_base) = accumulate_flow(
            AccountType::Asset,
            vec![(EntryDirection::Credit, dec!(98.00), dec!(98.00))],
        );
        assert_eq!(net, dec!(-98.00));
        assert_eq!(net_base, dec!(-98.00));
    }

    #[test]
    fn test_effective_window_balance_sheet_drops_start() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1);
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();

        assert_eq!(
            effective_window(AccountType::Asset, start, end),
            (None, end)
        );
        assert_eq!(
            effective_window(AccountType::Equity, start, end),
            (None, end)
        );
    }

    #[test]
    fn test_effective_window_income_statement_keeps_start() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1);
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();

        assert_eq!(
            effective_window(AccountType::Expense, start, end),
            (start, end)
        );
    }

    #[test]
    fn test_empty_entries_yield_zero_flow() {
        let (net, net_base) = accumulate_flow(AccountType::Liability, vec![]);
        assert_eq!(net, Decimal::ZERO);
        assert_eq!(net_base, Decimal::ZERO);
    }
}
