//! Statistics over expenses, incomes and income tax payments.

pub mod error;
pub mod service;
pub mod types;


pub use error::StatisticsError;
pub use service::StatisticsService;
pub use types::{
    AmountsStatistics, CategoryAmountsStatistics, DateRange, IncomeTaxPaymentsStatistics,
    StatisticsEntry, StatisticsTotals,
};
