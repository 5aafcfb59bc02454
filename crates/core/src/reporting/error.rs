//! Reporting error taxonomy.

use crate::chart::AccountType;

/// Errors from statement aggregation.
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    /// A chart forest of the wrong statement type was supplied for a
    /// report section.
    #[error("report section expects a {expected} chart, got {actual}")]
    SectionTypeMismatch {
        /// The statement type the section requires.
        expected: AccountType,
        /// The statement type of the supplied chart.
        actual: AccountType,
    },
}
