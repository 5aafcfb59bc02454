//! Account repository for the account registry.
//!
//! Accounts hang under chart nodes and inherit the node's statement
//! type. Balance-sheet accounts must carry a transaction currency;
//! income and expense accounts must not (they post in base currency).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use ledgerbook_core::chart::AccountType;
use ledgerbook_shared::types::{AccountId, ChartNodeId, Currency};

use crate::entities::{accounts, charts, entries, sea_orm_active_enums};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account id or name already taken.
    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Referenced chart node does not exist.
    #[error("Chart node not found: {0}")]
    ChartNotFound(ChartNodeId),

    /// Balance-sheet accounts need a currency.
    #[error("Accounts of type '{0}' require a currency")]
    CurrencyRequired(AccountType),

    /// Income and expense accounts post in base currency only.
    #[error("Accounts of type '{0}' must not carry a currency")]
    CurrencyForbidden(AccountType),

    /// Moving an account may never change its statement type.
    #[error("Move would change account type from '{from}' to '{to}'")]
    MoveChangesType {
        /// Current statement type.
        from: AccountType,
        /// Statement type of the destination chart node.
        to: AccountType,
    },

    /// Account still referenced by journal entries.
    #[error("Account is referenced by {count} journal entr(ies)")]
    HasEntries {
        /// Number of referencing entries.
        count: u64,
    },

    /// A stored currency code failed to parse. Data corruption.
    #[error("Stored currency '{0}' is not a supported code")]
    InvalidStoredCurrency(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Explicit id; generated when absent.
    pub id: Option<AccountId>,
    /// Chart node to hang under.
    pub chart_id: ChartNodeId,
    /// Account name, unique across the book.
    pub name: String,
    /// Transaction currency; required for balance-sheet accounts,
    /// forbidden otherwise.
    pub currency: Option<Currency>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Input for updating an account. Currency is immutable once set, so
/// it does not appear here.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name.
    pub name: Option<String>,
    /// New chart node; must carry the same statement type.
    pub chart_id: Option<ChartNodeId>,
    /// New description (replaces the old one).
    pub description: Option<String>,
}

/// A stored account, restated in domain types.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Account id.
    pub id: AccountId,
    /// Owning chart node.
    pub chart_id: ChartNodeId,
    /// Account name.
    pub name: String,
    /// Statement type.
    pub account_type: AccountType,
    /// Transaction currency, when the type carries one.
    pub currency: Option<Currency>,
    /// Free-form description.
    pub description: Option<String>,
}

impl TryFrom<accounts::Model> for AccountRecord {
    type Error = AccountError;

    fn try_from(model: accounts::Model) -> Result<Self, Self::Error> {
        let currency = match model.currency {
            Some(code) => Some(
                code.trim()
                    .parse::<Currency>()
                    .map_err(|_| AccountError::InvalidStoredCurrency(code))?,
            ),
            None => None,
        };
        Ok(Self {
            id: AccountId::from_uuid(model.id),
            chart_id: ChartNodeId::from_uuid(model.chart_id),
            name: model.name,
            account_type: model.account_type.into(),
            currency,
            description: model.description,
        })
    }
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new account under a chart node.
    ///
    /// The statement type is inherited from the chart node, never
    /// supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error on id or name collision, absent chart node, or
    /// currency-presence violation.
    pub async fn add(&self, input: CreateAccountInput) -> Result<AccountRecord, AccountError> {
        let chart = charts::Entity::find_by_id(input.chart_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::ChartNotFound(input.chart_id))?;
        let account_type: AccountType = chart.account_type.into();

        Self::check_currency_rule(account_type, input.currency.as_ref())?;

        let id = input.id.unwrap_or_else(AccountId::new);
        if accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(AccountError::AlreadyExists(id.to_string()));
        }
        let name_taken = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if name_taken.is_some() {
            return Err(AccountError::AlreadyExists(input.name));
        }

        let now = chrono::Utc::now().into();
        let model = accounts::ActiveModel {
            id: Set(id.into_inner()),
            chart_id: Set(input.chart_id.into_inner()),
            name: Set(input.name),
            account_type: Set(chart.account_type),
            currency: Set(input.currency.map(|c| c.code().to_string())),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&self.db).await?;
        inserted.try_into()
    }

    /// Updates an account's name, chart node, or description.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an absent account, `MoveChangesType`
    /// when the destination node has a different statement type, or
    /// `AlreadyExists` on a name collision.
    pub async fn update(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<AccountRecord, AccountError> {
        let existing = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        if let Some(target) = input.chart_id {
            let chart = charts::Entity::find_by_id(target.into_inner())
                .one(&self.db)
                .await?
                .ok_or(AccountError::ChartNotFound(target))?;
            if chart.account_type != existing.account_type {
                return Err(AccountError::MoveChangesType {
                    from: existing.account_type.into(),
                    to: chart.account_type.into(),
                });
            }
        }

        if let Some(name) = &input.name {
            let clash = accounts::Entity::find()
                .filter(accounts::Column::Name.eq(name))
                .filter(accounts::Column::Id.ne(id.into_inner()))
                .one(&self.db)
                .await?;
            if clash.is_some() {
                return Err(AccountError::AlreadyExists(name.clone()));
            }
        }

        let mut active: accounts::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(chart_id) = input.chart_id {
            active.chart_id = Set(chart_id.into_inner());
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        updated.try_into()
    }

    /// Deletes an account that no entry references.
    ///
    /// # Errors
    ///
    /// Returns `HasEntries` while journal entries still post to the
    /// account, or `NotFound` when it does not exist.
    pub async fn remove(&self, id: AccountId) -> Result<(), AccountError> {
        let txn = self.db.begin().await?;

        let existing = accounts::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let count = entries::Entity::find()
            .filter(entries::Column::AccountId.eq(id.into_inner()))
            .count(&txn)
            .await?;
        if count > 0 {
            return Err(AccountError::HasEntries { count });
        }

        accounts::Entity::delete_by_id(existing.id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Fetches one account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the account does not exist.
    pub async fn get(&self, id: AccountId) -> Result<AccountRecord, AccountError> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?
            .try_into()
    }

    /// Lists accounts, optionally restricted to one statement type,
    /// ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list(
        &self,
        account_type: Option<AccountType>,
    ) -> Result<Vec<AccountRecord>, AccountError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Name);
        if let Some(ty) = account_type {
            query = query.filter(
                accounts::Column::AccountType.eq(sea_orm_active_enums::AccountType::from(ty)),
            );
        }
        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(AccountRecord::try_from)
            .collect()
    }

    /// Lists the accounts hanging directly under one chart node.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_by_chart(
        &self,
        chart_id: ChartNodeId,
    ) -> Result<Vec<AccountRecord>, AccountError> {
        accounts::Entity::find()
            .filter(accounts::Column::ChartId.eq(chart_id.into_inner()))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(AccountRecord::try_from)
            .collect()
    }

    fn check_currency_rule(
        account_type: AccountType,
        currency: Option<&Currency>,
    ) -> Result<(), AccountError> {
        if account_type.is_balance_sheet() {
            if currency.is_none() {
                return Err(AccountError::CurrencyRequired(account_type));
            }
        } else if currency.is_some() {
            return Err(AccountError::CurrencyForbidden(account_type));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(AccountType::Asset, true)]
    #[case(AccountType::Liability, true)]
    #[case(AccountType::Equity, true)]
    #[case(AccountType::Income, false)]
    #[case(AccountType::Expense, false)]
    fn test_currency_rule(#[case] account_type: AccountType, #[case] needs_currency: bool) {
        let with = AccountRepository::check_currency_rule(account_type, Some(&Currency::Cny));
        let without = AccountRepository::check_currency_rule(account_type, None);

        if needs_currency {
            assert!(with.is_ok());
            assert!(matches!(without, Err(AccountError::CurrencyRequired(_))));
        } else {
            assert!(matches!(with, Err(AccountError::CurrencyForbidden(_))));
            assert!(without.is_ok());
        }
    }

    #[test]
    fn test_record_parses_stored_currency() {
        let now = chrono::Utc::now().into();
        let model = accounts::Model {
            id: Uuid::new_v4(),
            chart_id: Uuid::new_v4(),
            name: "Bank CNY".to_string(),
            account_type: sea_orm_active_enums::AccountType::Asset,
            // CHAR(3) columns come back space-padded only for shorter
            // codes; ISO codes are exactly three chars.
            currency: Some("CNY".to_string()),
            description: None,
            created_at: now,
            updated_at: now,
        };
        let record = AccountRecord::try_from(model).unwrap();
        assert_eq!(record.currency, Some(Currency::Cny));
        assert_eq!(record.account_type, AccountType::Asset);
    }

    #[test]
    fn test_record_rejects_unknown_currency() {
        let now = chrono::Utc::now().into();
        let model = accounts::Model {
            id: Uuid::new_v4(),
            chart_id: Uuid::new_v4(),
            name: "Broken".to_string(),
            account_type: sea_orm_active_enums::AccountType::Asset,
            currency: Some("ZZZ".to_string()),
            description: None,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            AccountRecord::try_from(model),
            Err(AccountError::InvalidStoredCurrency(_))
        ));
    }
}
