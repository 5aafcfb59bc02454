//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Validation that needs no database stays in the core
//! crate; repositories call into it before touching rows.

pub mod account;
pub mod chart;
pub mod fx_rate;
pub mod journal;

pub use account::{
    AccountError, AccountRecord, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
pub use chart::{ChartRepoError, ChartRepository};
pub use fx_rate::{FxRateError, FxRateRepository};
pub use journal::{
    JournalBrief, JournalFilter, JournalRepoError, JournalRepository, JournalWithEntries,
};
