//! Statistics error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while preparing statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatisticsError {
    /// Invalid date range.
    #[error("Invalid date range: fromDate {from} is after toDate {to}")]
    InvalidDateRange {
        /// Start date.
        from: NaiveDate,
        /// End date.
        to: NaiveDate,
    },

    /// A total does not fit into `i64`.
    #[error("Statistics total overflowed")]
    Overflow,
}
