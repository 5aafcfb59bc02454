//! Initial database migration.
//!
//! Creates the enums and the five book tables: charts, accounts,
//! journals, entries, fx_rates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CHARTS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(ENTRIES_SQL).await?;
        db.execute_unprepared(FX_RATES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DOWN_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
-- Statement types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'income',
    'expense'
);

-- Entry sides
CREATE TYPE entry_direction AS ENUM ('debit', 'credit');

-- Journal origins
CREATE TYPE journal_source AS ENUM (
    'manual',
    'invoice',
    'purchase',
    'payment',
    'expense',
    'property',
    'share'
);
";

const CHARTS_SQL: &str = r"
CREATE TABLE charts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    parent_id UUID REFERENCES charts(id),
    position INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (account_type, name)
);

CREATE INDEX idx_charts_type ON charts(account_type);
CREATE INDEX idx_charts_parent ON charts(parent_id) WHERE parent_id IS NOT NULL;
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    chart_id UUID NOT NULL REFERENCES charts(id),
    name VARCHAR(255) NOT NULL UNIQUE,
    account_type account_type NOT NULL,
    currency CHAR(3),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Balance-sheet accounts carry a currency; income statement
    -- accounts never do.
    CONSTRAINT chk_currency_presence CHECK (
        (account_type IN ('asset', 'liability', 'equity') AND currency IS NOT NULL)
        OR
        (account_type IN ('income', 'expense') AND currency IS NULL)
    )
);

CREATE INDEX idx_accounts_chart ON accounts(chart_id);
CREATE INDEX idx_accounts_type ON accounts(account_type);
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY,
    journal_date DATE NOT NULL,
    source journal_source NOT NULL DEFAULT 'manual',
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_journals_date ON journals(journal_date);
CREATE INDEX idx_journals_source ON journals(source);
";

const ENTRIES_SQL: &str = r"
CREATE TABLE entries (
    id UUID PRIMARY KEY,
    journal_id UUID NOT NULL REFERENCES journals(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    direction entry_direction NOT NULL,
    currency CHAR(3) NOT NULL,
    amount NUMERIC(20, 2) NOT NULL,
    amount_base NUMERIC(20, 2) NOT NULL,
    description TEXT,
    tag VARCHAR(100),
    position INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_amount_base_positive CHECK (amount_base > 0)
);

CREATE INDEX idx_entries_journal ON entries(journal_id);
CREATE INDEX idx_entries_account ON entries(account_id);
";

const FX_RATES_SQL: &str = r"
CREATE TABLE fx_rates (
    currency CHAR(3) NOT NULL,
    rate_date DATE NOT NULL,
    rate NUMERIC(20, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (currency, rate_date),
    CONSTRAINT chk_rate_positive CHECK (rate > 0)
);

CREATE INDEX idx_fx_rates_date ON fx_rates(rate_date);
";

const DOWN_SQL: &str = r"
DROP TABLE IF EXISTS fx_rates CASCADE;
DROP TABLE IF EXISTS entries CASCADE;
DROP TABLE IF EXISTS journals CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS charts CASCADE;

DROP TYPE IF EXISTS journal_source CASCADE;
DROP TYPE IF EXISTS entry_direction CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
";
