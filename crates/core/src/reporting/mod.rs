//! Financial statement aggregation.
//!
//! Pure roll-up over a chart forest and per-account flows already
//! computed by the journal engine. Balance sheets are point-in-time
//! (with a derived retained-earnings equity line); income statements
//! are windowed and base-currency only.

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportingError;
pub use service::ReportingService;
pub use types::{
    BalanceSheetReport, ChartSummary, IncomeStatementReport, ReportAccount, ReportNode,
};
