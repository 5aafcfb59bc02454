//! Database seeder for Ledgerbook development and testing.
//!
//! Seeds the default chart of accounts, a handful of sample accounts,
//! and a day of exchange rates for local development.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use ledgerbook_core::chart::{AccountType, ChartNode, ChartTree};
use ledgerbook_db::repositories::{
    AccountError, AccountRepository, ChartRepository, CreateAccountInput, FxRateRepository,
};
use ledgerbook_shared::types::Currency;

/// Default root nodes per statement type.
const DEFAULT_CHARTS: &[(AccountType, &[&str])] = &[
    (AccountType::Asset, &["Current Assets", "Fixed Assets"]),
    (
        AccountType::Liability,
        &["Current Liabilities", "Long-term Liabilities"],
    ),
    (AccountType::Equity, &["Owner's Equity"]),
    (AccountType::Income, &["Operating Income", "Other Income"]),
    (
        AccountType::Expense,
        &["Operating Expenses", "Other Expenses"],
    ),
];

/// Sample accounts: (chart node name, account name, currency code).
const SAMPLE_ACCOUNTS: &[(&str, &str, Option<&str>)] = &[
    ("Current Assets", "Bank CNY", Some("CNY")),
    ("Current Assets", "Cash", Some("CNY")),
    ("Current Liabilities", "Accounts Payable", Some("CNY")),
    ("Owner's Equity", "Share Capital", Some("CNY")),
    ("Operating Income", "Consulting Revenue", None),
    ("Operating Expenses", "Office Rent", None),
];

/// Sample rates per 100 USD for today.
const SAMPLE_RATES: &[(&str, &str)] = &[
    ("CNY", "712.34"),
    ("EUR", "92.15"),
    ("JPY", "14950.00"),
    ("GBP", "79.05"),
    ("HKD", "780.00"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = ledgerbook_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding charts of accounts...");
    seed_charts(&db).await;

    println!("Seeding sample accounts...");
    seed_accounts(&db).await;

    println!("Seeding exchange rates...");
    seed_rates(&db).await;

    println!("Seeding complete!");
}

/// Seeds the default chart forest for each statement type that is
/// still empty. Types with existing nodes are left alone.
async fn seed_charts(db: &DatabaseConnection) {
    let repo = ChartRepository::new(db.clone());

    for (account_type, roots) in DEFAULT_CHARTS {
        let existing = repo
            .load(*account_type)
            .await
            .expect("Failed to load chart");
        if !existing.roots().is_empty() {
            println!("  {account_type} chart already exists, skipping...");
            continue;
        }

        let mut tree = ChartTree::new(*account_type);
        for name in *roots {
            tree.attach(ChartNode::root(*name, *account_type), None)
                .expect("Failed to build default chart");
        }

        match repo.save(&tree).await {
            Ok(()) => println!("  Created {account_type} chart ({} nodes)", roots.len()),
            Err(e) => eprintln!("Failed to save {account_type} chart: {e}"),
        }
    }
}

/// Seeds sample accounts under the default chart nodes; accounts that
/// already exist (by name) are skipped.
async fn seed_accounts(db: &DatabaseConnection) {
    let charts = ChartRepository::new(db.clone());
    let accounts = AccountRepository::new(db.clone());

    let mut inserted = 0;
    for (node_name, account_name, currency_code) in SAMPLE_ACCOUNTS {
        let account_type = DEFAULT_CHARTS
            .iter()
            .find(|(_, names)| names.contains(node_name))
            .map(|(ty, _)| *ty)
            .expect("sample account references a default node");

        let tree = charts
            .load(account_type)
            .await
            .expect("Failed to load chart");
        let Some(node) = tree.find_by_name(node_name) else {
            eprintln!("Chart node {node_name} not found, skipping {account_name}");
            continue;
        };

        let currency = currency_code.map(|code| {
            Currency::from_str(code).expect("sample account carries a known currency")
        });

        let input = CreateAccountInput {
            id: None,
            chart_id: node.id,
            name: (*account_name).to_string(),
            currency,
            description: None,
        };

        match accounts.add(input).await {
            Ok(_) => inserted += 1,
            Err(AccountError::AlreadyExists(_)) => {
                println!("  Account {account_name} already exists, skipping...");
            }
            Err(e) => eprintln!("Failed to insert account {account_name}: {e}"),
        }
    }

    println!("  Inserted {inserted} accounts");
}

/// Seeds today's exchange rates; existing rows are overwritten.
async fn seed_rates(db: &DatabaseConnection) {
    let repo = FxRateRepository::new(db.clone());
    let today = Utc::now().date_naive();

    let mut written = 0;
    for (code, raw) in SAMPLE_RATES {
        let currency = Currency::from_str(code).expect("sample rate carries a known currency");
        let rate = Decimal::from_str(raw).expect("sample rate parses");

        match repo.set_rate(currency, today, rate).await {
            Ok(()) => written += 1,
            Err(e) => eprintln!("Failed to insert rate for {code}: {e}"),
        }
    }

    println!("  Wrote {written} exchange rates for {today}");
}
