//! Property tests for journal resolution.

use proptest::prelude::*;
use rust_decimal::Decimal;

use ledgerbook_shared::types::{AccountId, Currency};

use super::service::JournalService;
use super::types::{EntryDirection, ResolvedEntry};

fn arb_direction() -> impl Strategy<Value = EntryDirection> {
    prop_oneof![Just(EntryDirection::Debit), Just(EntryDirection::Credit)]
}

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Cny), Just(Currency::Usd), Just(Currency::Eur)]
}

/// Cents in a bounded range, so sums stay well inside Decimal range.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Small pool of account ids so merges actually happen.
fn arb_resolved_entry(accounts: Vec<AccountId>) -> impl Strategy<Value = ResolvedEntry> {
    (
        0..accounts.len(),
        arb_direction(),
        arb_currency(),
        arb_amount(),
    )
        .prop_map(move |(idx, direction, currency, amount)| ResolvedEntry {
            id: None,
            account_id: accounts[idx],
            direction,
            currency,
            amount,
            amount_base: amount,
            description: None,
            tag: None,
        })
}

fn arb_entries() -> impl Strategy<Value = Vec<ResolvedEntry>> {
    let accounts: Vec<AccountId> = (0..3).map(|_| AccountId::new()).collect();
    prop::collection::vec(arb_resolved_entry(accounts), 1..12)
}

/// Net signed flow (debit minus credit) per (account, currency) pair.
fn net_flows(entries: &[ResolvedEntry]) -> Vec<(AccountId, Currency, Decimal, Decimal)> {
    let mut flows: Vec<(AccountId, Currency, Decimal, Decimal)> = Vec::new();
    for entry in entries {
        let signed_amount = match entry.direction {
            EntryDirection::Debit => entry.amount,
            EntryDirection::Credit => -entry.amount,
        };
        let signed_base = match entry.direction {
            EntryDirection::Debit => entry.amount_base,
            EntryDirection::Credit => -entry.amount_base,
        };
        match flows
            .iter_mut()
            .find(|(id, cur, _, _)| *id == entry.account_id && *cur == entry.currency)
        {
            Some((_, _, amount, base)) => {
                *amount += signed_amount;
                *base += signed_base;
            }
            None => flows.push((entry.account_id, entry.currency, signed_amount, signed_base)),
        }
    }
    flows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    flows
}

proptest! {
    /// Merging never changes any account's net flow.
    #[test]
    fn prop_merge_preserves_net_flow(entries in arb_entries()) {
        let before = net_flows(&entries);
        let merged = JournalService::merge_redundant(entries);
        let after = net_flows(&merged);
        prop_assert_eq!(before, after);
    }

    /// Merge output has no remaining mergeable pair.
    #[test]
    fn prop_merge_output_is_non_redundant(entries in arb_entries()) {
        let merged = JournalService::merge_redundant(entries);
        prop_assert!(JournalService::is_non_redundant(&merged));
    }

    /// Merging never increases the entry count and never empties a
    /// non-empty journal.
    #[test]
    fn prop_merge_bounds_entry_count(entries in arb_entries()) {
        let len_before = entries.len();
        let merged = JournalService::merge_redundant(entries);
        prop_assert!(!merged.is_empty());
        prop_assert!(merged.len() <= len_before);
    }

    /// Totals are direction-partitioned sums of base amounts, and the
    /// balanced flag agrees with exact equality at amount precision.
    #[test]
    fn prop_totals_partition_base_amounts(entries in arb_entries()) {
        let totals = JournalService::totals(&entries);

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

        prop_assert_eq!(totals.debit_base, debit.round_dp(2));
        prop_assert_eq!(totals.credit_base, credit.round_dp(2));
        prop_assert_eq!(totals.is_balanced, totals.difference() == Decimal::ZERO);
    }

    /// Merging commutes with totals: same base totals before and after.
    #[test]
    fn prop_merge_preserves_totals(entries in arb_entries()) {
        let before = JournalService::totals(&entries);
        let merged = JournalService::merge_redundant(entries);
        let after = JournalService::totals(&merged);
        prop_assert_eq!(before.debit_base, after.debit_base);
        prop_assert_eq!(before.credit_base, after.credit_base);
    }
}

#[test]
fn prop_support_net_flow_signs() {
    // Sanity anchor for the helper itself.
    let account = AccountId::new();
    let entries = vec![
        ResolvedEntry {
            id: None,
            account_id: account,
            direction: EntryDirection::Debit,
            currency: Currency::Cny,
            amount: Decimal::new(500, 2),
            amount_base: Decimal::new(500, 2),
            description: None,
            tag: None,
        },
        ResolvedEntry {
            id: None,
            account_id: account,
            direction: EntryDirection::Credit,
            currency: Currency::Cny,
            amount: Decimal::new(200, 2),
            amount_base: Decimal::new(200, 2),
            description: None,
            tag: None,
        },
    ];
    let flows = net_flows(&entries);
    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].2, Decimal::new(300, 2));
}
