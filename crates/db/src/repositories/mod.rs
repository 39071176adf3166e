//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped to a workspace; updates use optimistic locking on
//! the `version` column.

mod calculation;
mod pagination;

pub mod category;
pub mod customer;
pub mod document;
pub mod expense;
pub mod general_tax;
pub mod income;
pub mod income_tax_payment;
pub mod invoice;
pub mod references;
pub mod statistics;
pub mod workspace;

pub use category::{CategoryInput, CategoryRepository};
pub use customer::{CustomerInput, CustomerRepository};
pub use document::{DocumentInput, DocumentRepository};
pub use expense::{ExpenseInput, ExpenseRepository};
pub use general_tax::{GeneralTaxInput, GeneralTaxRepository};
pub use income::{IncomeInput, IncomeRepository};
pub use income_tax_payment::{IncomeTaxPaymentInput, IncomeTaxPaymentRepository};
pub use invoice::{InvoiceInput, InvoiceRepository, invoice_dates};
pub use statistics::StatisticsRepository;
pub use workspace::{WorkspaceInput, WorkspaceRepository};
