//! Double-entry journal logic.
//!
//! A journal is an atomic, balanced group of ledger entries. This
//! module owns the validation and resolution pipeline (amounts, account
//! references, base-currency conversion, redundancy merging, the
//! balance invariant) and the pure flow aggregation used by reporting.
//! Persistence lives in the db crate.

pub mod error;
pub mod flow;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::JournalError;
pub use flow::{AccountFlow, accumulate_flow, effective_window};
pub use service::{AccountRef, JournalService};
pub use types::{
    EntryDirection, EntryInput, JournalInput, JournalSource, JournalTotals, ResolvedEntry,
};
