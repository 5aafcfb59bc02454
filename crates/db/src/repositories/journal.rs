//! Journal repository: atomic persistence of validated journals.
//!
//! Validation and resolution are pure and live in the core crate; this
//! repository feeds them account facts and one date's rate table, then
//! writes header and entries together in a single transaction. No code
//! path ever persists an unbalanced or partial journal.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use ledgerbook_core::fx::{self, RateTable};
use ledgerbook_core::journal::{
    AccountFlow, AccountRef, EntryDirection, JournalError, JournalInput, JournalService,
    JournalSource, ResolvedEntry, accumulate_flow, effective_window,
};
use ledgerbook_shared::types::{
    AccountId, Currency, EntryId, JournalId, PageRequest, PageResponse,
};

use crate::entities::{accounts, entries, journals, sea_orm_active_enums};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalRepoError {
    /// The draft failed validation before any row was touched.
    #[error(transparent)]
    Validation(#[from] JournalError),

    /// Journal not found.
    #[error("Journal not found: {0}")]
    NotFound(JournalId),

    /// A stored value failed to restate in domain types.
    #[error("Stored journal data is corrupt: {0}")]
    InvalidStoredData(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One stored ledger line, restated in domain types.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    /// Entry id.
    pub id: EntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Currency of `amount`.
    pub currency: Currency,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Amount in base currency.
    pub amount_base: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Grouping tag.
    pub tag: Option<String>,
}

/// A journal header with its entries.
#[derive(Debug, Clone)]
pub struct JournalWithEntries {
    /// Journal id.
    pub id: JournalId,
    /// Accounting date.
    pub journal_date: NaiveDate,
    /// Business origin.
    pub source: JournalSource,
    /// Free-form note.
    pub note: Option<String>,
    /// Entries in stored order.
    pub entries: Vec<EntryRecord>,
}

/// A journal header with derived listing figures, no entry detail.
#[derive(Debug, Clone)]
pub struct JournalBrief {
    /// Journal id.
    pub id: JournalId,
    /// Accounting date.
    pub journal_date: NaiveDate,
    /// Business origin.
    pub source: JournalSource,
    /// Free-form note.
    pub note: Option<String>,
    /// Number of entries in the journal.
    pub entry_count: usize,
    /// Sum of base-currency debits (equals the credit sum).
    pub debit_base: Decimal,
}

/// Filters for journal listing. All fields are conjunctive; a journal
/// matches an account filter when ANY of its entries does.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Restrict to these journal ids.
    pub ids: Option<Vec<JournalId>>,
    /// Restrict to one business origin.
    pub source: Option<JournalSource>,
    /// Earliest accounting date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest accounting date, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Journals touching any of these accounts.
    pub account_ids: Option<Vec<AccountId>>,
    /// Journals touching any account with one of these names.
    pub account_names: Option<Vec<String>>,
    /// Substring match on the note.
    pub note_contains: Option<String>,
    /// Minimum base-currency debit total, inclusive.
    pub min_base_total: Option<Decimal>,
    /// Maximum base-currency debit total, inclusive.
    pub max_base_total: Option<Decimal>,
    /// Exact number of entries.
    pub entry_count: Option<usize>,
}

/// Journal repository for atomic journal writes and derived flows.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    base_currency: Currency,
}

impl JournalRepository {
    /// Creates a new journal repository for a book in `base_currency`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, base_currency: Currency) -> Self {
        Self { db, base_currency }
    }

    /// Validates and persists a new journal in one transaction.
    ///
    /// `rates` must be the rate table for the journal's date; it is
    /// only consulted for entries in a non-base currency.
    ///
    /// # Errors
    ///
    /// Returns a validation error (including `AccountNotFound` and
    /// `NoRate`) without touching the database, or a database error.
    pub async fn create(
        &self,
        input: &JournalInput,
        rates: &RateTable,
    ) -> Result<JournalWithEntries, JournalRepoError> {
        let (resolved, _totals) = self.validate(input, rates).await?;

        let id = JournalId::new();
        let now = chrono::Utc::now().into();

        let txn = self.db.begin().await?;
        let header = journals::ActiveModel {
            id: Set(id.into_inner()),
            journal_date: Set(input.journal_date),
            source: Set(input.source.into()),
            note: Set(input.note.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        header.insert(&txn).await?;

        for (position, entry) in resolved.iter().enumerate() {
            Self::insert_entry(&txn, id, entry, position, now).await?;
        }
        txn.commit().await?;

        tracing::info!(journal = %id, entries = resolved.len(), "journal created");
        self.get(id).await
    }

    /// Replaces a journal's header fields and reconciles its entries
    /// by id: matching entries are updated, absent ones deleted, new
    /// ones inserted. One transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an absent journal, a validation error,
    /// or a database error.
    pub async fn update(
        &self,
        id: JournalId,
        input: &JournalInput,
        rates: &RateTable,
    ) -> Result<JournalWithEntries, JournalRepoError> {
        let (resolved, _totals) = self.validate(input, rates).await?;

        let txn = self.db.begin().await?;

        let header = journals::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(JournalRepoError::NotFound(id))?;

        let now = chrono::Utc::now().into();
        let mut active: journals::ActiveModel = header.into();
        active.journal_date = Set(input.journal_date);
        active.source = Set(input.source.into());
        active.note = Set(input.note.clone());
        active.updated_at = Set(now);
        active.update(&txn).await?;

        let existing_ids: HashSet<Uuid> = entries::Entity::find()
            .filter(entries::Column::JournalId.eq(id.into_inner()))
            .select_only()
            .column(entries::Column::Id)
            .into_tuple::<Uuid>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        let mut kept: HashSet<Uuid> = HashSet::new();
        for (position, entry) in resolved.iter().enumerate() {
            let pos = i32::try_from(position).unwrap_or(i32::MAX);
            match entry.id {
                Some(entry_id) if existing_ids.contains(&entry_id.into_inner()) => {
                    kept.insert(entry_id.into_inner());
                    let model = entries::ActiveModel {
                        id: Set(entry_id.into_inner()),
                        journal_id: Set(id.into_inner()),
                        account_id: Set(entry.account_id.into_inner()),
                        direction: Set(entry.direction.into()),
                        currency: Set(entry.currency.code().to_string()),
                        amount: Set(entry.amount),
                        amount_base: Set(entry.amount_base),
                        description: Set(entry.description.clone()),
                        tag: Set(entry.tag.clone()),
                        position: Set(pos),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    model.update(&txn).await?;
                }
                _ => {
                    Self::insert_entry(&txn, id, entry, position, now).await?;
                }
            }
        }

        let stale: Vec<Uuid> = existing_ids.difference(&kept).copied().collect();
        if !stale.is_empty() {
            entries::Entity::delete_many()
                .filter(entries::Column::Id.is_in(stale))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        self.get(id).await
    }

    /// Deletes a journal and its entries in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the journal does not exist.
    pub async fn remove(&self, id: JournalId) -> Result<(), JournalRepoError> {
        let txn = self.db.begin().await?;

        let header = journals::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(JournalRepoError::NotFound(id))?;

        entries::Entity::delete_many()
            .filter(entries::Column::JournalId.eq(id.into_inner()))
            .exec(&txn)
            .await?;
        journals::Entity::delete_by_id(header.id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(journal = %id, "journal removed");
        Ok(())
    }

    /// Fetches one journal with its entries in stored order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the journal does not exist.
    pub async fn get(&self, id: JournalId) -> Result<JournalWithEntries, JournalRepoError> {
        let header = journals::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(JournalRepoError::NotFound(id))?;

        let rows = entries::Entity::find()
            .filter(entries::Column::JournalId.eq(id.into_inner()))
            .order_by_asc(entries::Column::Position)
            .all(&self.db)
            .await?;

        let entries = rows
            .into_iter()
            .map(Self::restate_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JournalWithEntries {
            id,
            journal_date: header.journal_date,
            source: header.source.into(),
            note: header.note,
            entries,
        })
    }

    /// Lists journals as brief records with pagination.
    ///
    /// Header-level filters run in the database; figures derived from
    /// entries (totals, entry count) are computed and filtered after
    /// loading the matching journals' entries.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list(
        &self,
        filter: &JournalFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<JournalBrief>, JournalRepoError> {
        let mut query = journals::Entity::find()
            .order_by_desc(journals::Column::JournalDate)
            .order_by_desc(journals::Column::CreatedAt);

        if let Some(ids) = &filter.ids {
            let raw: Vec<Uuid> = ids.iter().map(|i| i.into_inner()).collect();
            query = query.filter(journals::Column::Id.is_in(raw));
        }
        if let Some(source) = filter.source {
            query = query.filter(
                journals::Column::Source.eq(sea_orm_active_enums::JournalSource::from(source)),
            );
        }
        if let Some(from) = filter.date_from {
            query = query.filter(journals::Column::JournalDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(journals::Column::JournalDate.lte(to));
        }
        if let Some(needle) = &filter.note_contains {
            query = query.filter(journals::Column::Note.contains(needle.as_str()));
        }
        if let Some(member_ids) = self.account_member_journals(filter).await? {
            let raw: Vec<Uuid> = member_ids.into_iter().collect();
            query = query.filter(journals::Column::Id.is_in(raw));
        }

        let headers = query.all(&self.db).await?;

        // Entry-derived figures for the survivors, one query.
        let header_ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        let mut debit_totals: HashMap<Uuid, Decimal> = HashMap::new();
        if !header_ids.is_empty() {
            let rows = entries::Entity::find()
                .filter(entries::Column::JournalId.is_in(header_ids))
                .all(&self.db)
                .await?;
            for row in rows {
                *counts.entry(row.journal_id).or_default() += 1;
                if row.direction == sea_orm_active_enums::EntryDirection::Debit {
                    *debit_totals.entry(row.journal_id).or_default() += row.amount_base;
                }
            }
        }

        let briefs: Vec<JournalBrief> = headers
            .into_iter()
            .map(|h| JournalBrief {
                id: JournalId::from_uuid(h.id),
                journal_date: h.journal_date,
                source: h.source.into(),
                note: h.note,
                entry_count: counts.get(&h.id).copied().unwrap_or(0),
                debit_base: debit_totals.get(&h.id).copied().unwrap_or(Decimal::ZERO),
            })
            .filter(|b| {
                filter.min_base_total.is_none_or(|min| b.debit_base >= min)
                    && filter.max_base_total.is_none_or(|max| b.debit_base <= max)
                    && filter.entry_count.is_none_or(|n| b.entry_count == n)
            })
            .collect();

        let total = u64::try_from(briefs.len()).unwrap_or(u64::MAX);
        let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let data: Vec<JournalBrief> = briefs
            .into_iter()
            .skip(start)
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Net signed flow of one account over a window.
    ///
    /// Balance-sheet accounts ignore `start` (a balance is
    /// point-in-time); income-statement accounts are windowed.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` (as a validation error) for an absent
    /// account, or a database error.
    pub async fn sum_account_flow(
        &self,
        account_id: AccountId,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<AccountFlow, JournalRepoError> {
        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(JournalRepoError::Validation(JournalError::AccountNotFound(
                account_id,
            )))?;
        let account_type = account.account_type.into();
        let currency = Self::restate_currency(account.currency.as_deref())?;

        let (floor, ceiling) = effective_window(account_type, start, end);

        let mut query = entries::Entity::find()
            .filter(entries::Column::AccountId.eq(account_id.into_inner()))
            .join(JoinType::InnerJoin, entries::Relation::Journals.def())
            .filter(journals::Column::JournalDate.lte(ceiling));
        if let Some(floor) = floor {
            query = query.filter(journals::Column::JournalDate.gte(floor));
        }
        let rows = query.all(&self.db).await?;

        let (net_amount, net_base) = accumulate_flow(
            account_type,
            rows.iter()
                .map(|r| (r.direction.into(), r.amount, r.amount_base)),
        );

        Ok(AccountFlow {
            account_id,
            account_type,
            currency,
            net_amount,
            net_base,
        })
    }

    /// Flows for every account touched up to `end`, keyed by account.
    ///
    /// One pass over the entries; each account's statement type
    /// decides whether `start` applies to it.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn agg_accounts_flow(
        &self,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<HashMap<AccountId, AccountFlow>, JournalRepoError> {
        let account_rows = accounts::Entity::find().all(&self.db).await?;
        let mut account_facts: HashMap<Uuid, (ledgerbook_core::chart::AccountType, Option<Currency>)> =
            HashMap::new();
        for row in account_rows {
            let currency = Self::restate_currency(row.currency.as_deref())?;
            account_facts.insert(row.id, (row.account_type.into(), currency));
        }

        let rows = entries::Entity::find()
            .find_also_related(journals::Entity)
            .filter(journals::Column::JournalDate.lte(end))
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<(EntryDirection, Decimal, Decimal)>> = HashMap::new();
        for (entry, journal) in rows {
            let Some(journal) = journal else { continue };
            let Some((account_type, _)) = account_facts.get(&entry.account_id) else {
                continue;
            };
            // The start floor only applies to windowed accounts.
            if !account_type.is_balance_sheet() {
                if let Some(floor) = start {
                    if journal.journal_date < floor {
                        continue;
                    }
                }
            }
            grouped.entry(entry.account_id).or_default().push((
                entry.direction.into(),
                entry.amount,
                entry.amount_base,
            ));
        }

        let mut flows = HashMap::new();
        for (account_uuid, entry_triples) in grouped {
            let Some((account_type, currency)) = account_facts.get(&account_uuid) else {
                continue;
            };
            let (net_amount, net_base) = accumulate_flow(*account_type, entry_triples);
            let account_id = AccountId::from_uuid(account_uuid);
            flows.insert(
                account_id,
                AccountFlow {
                    account_id,
                    account_type: *account_type,
                    currency: *currency,
                    net_amount,
                    net_base,
                },
            );
        }
        Ok(flows)
    }

    /// Resolves a draft against stored accounts and one date's rates.
    async fn validate(
        &self,
        input: &JournalInput,
        rates: &RateTable,
    ) -> Result<(Vec<ResolvedEntry>, ledgerbook_core::journal::JournalTotals), JournalRepoError>
    {
        let wanted: HashSet<Uuid> = input
            .entries
            .iter()
            .map(|e| e.account_id.into_inner())
            .collect();
        let rows = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(wanted.into_iter().collect::<Vec<_>>()))
            .all(&self.db)
            .await?;

        let mut refs: HashMap<AccountId, AccountRef> = HashMap::new();
        for row in rows {
            let id = AccountId::from_uuid(row.id);
            let currency = Self::restate_currency(row.currency.as_deref())?;
            refs.insert(
                id,
                AccountRef {
                    id,
                    account_type: row.account_type.into(),
                    currency,
                },
            );
        }

        let base = self.base_currency;
        let result = JournalService::validate_and_resolve(
            input,
            base,
            |id| refs.get(&id).cloned(),
            |amount, currency, _date| fx::convert_to_base(amount, currency, base, rates),
        )?;
        Ok(result)
    }

    async fn insert_entry(
        txn: &DatabaseTransaction,
        journal_id: JournalId,
        entry: &ResolvedEntry,
        position: usize,
        now: chrono::DateTime<chrono::FixedOffset>,
    ) -> Result<(), DbErr> {
        // Always a fresh id: a client-supplied id only selects the entry
        // to update during reconciliation, it never names a new row.
        let model = entries::ActiveModel {
            id: Set(EntryId::new().into_inner()),
            journal_id: Set(journal_id.into_inner()),
            account_id: Set(entry.account_id.into_inner()),
            direction: Set(entry.direction.into()),
            currency: Set(entry.currency.code().to_string()),
            amount: Set(entry.amount),
            amount_base: Set(entry.amount_base),
            description: Set(entry.description.clone()),
            tag: Set(entry.tag.clone()),
            position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(txn).await?;
        Ok(())
    }

    fn restate_entry(row: entries::Model) -> Result<EntryRecord, JournalRepoError> {
        let currency = row
            .currency
            .trim()
            .parse::<Currency>()
            .map_err(JournalRepoError::InvalidStoredData)?;
        Ok(EntryRecord {
            id: EntryId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            direction: row.direction.into(),
            currency,
            amount: row.amount,
            amount_base: row.amount_base,
            description: row.description,
            tag: row.tag,
        })
    }

    fn restate_currency(code: Option<&str>) -> Result<Option<Currency>, JournalRepoError> {
        match code {
            Some(raw) => raw
                .trim()
                .parse::<Currency>()
                .map(Some)
                .map_err(JournalRepoError::InvalidStoredData),
            None => Ok(None),
        }
    }

    /// Journal ids touching the filtered accounts, or `None` when no
    /// account filter is set.
    async fn account_member_journals(
        &self,
        filter: &JournalFilter,
    ) -> Result<Option<HashSet<Uuid>>, JournalRepoError> {
        if filter.account_ids.is_none() && filter.account_names.is_none() {
            return Ok(None);
        }

        let mut account_ids: HashSet<Uuid> = filter
            .account_ids
            .iter()
            .flatten()
            .map(|id| id.into_inner())
            .collect();

        if let Some(names) = &filter.account_names {
            let named: Vec<Uuid> = accounts::Entity::find()
                .filter(accounts::Column::Name.is_in(names.clone()))
                .select_only()
                .column(accounts::Column::Id)
                .into_tuple::<Uuid>()
                .all(&self.db)
                .await?;
            account_ids.extend(named);
        }

        if account_ids.is_empty() {
            // Filter set but nothing matches: empty result, not "no
            // filter".
            return Ok(Some(HashSet::new()));
        }

        let journal_ids: Vec<Uuid> = entries::Entity::find()
            .filter(entries::Column::AccountId.is_in(account_ids.into_iter().collect::<Vec<_>>()))
            .select_only()
            .column(entries::Column::JournalId)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await?;
        Ok(Some(journal_ids.into_iter().collect()))
    }
}
