//! Lifecycle status derivation for expenses, incomes and invoices.
//!
//! Statuses are never set by users; they follow from which amounts and
//! dates a record carries.

pub mod amounts;
pub mod invoice;

pub use amounts::AmountsStatus;
pub use invoice::{InvoiceDates, InvoiceStatus};
