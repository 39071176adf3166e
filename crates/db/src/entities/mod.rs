//! `SeaORM` entity definitions.

pub mod categories;
pub mod customers;
pub mod documents;
pub mod expenses;
pub mod general_taxes;
pub mod income_tax_payments;
pub mod incomes;
pub mod invoices;
pub mod sea_orm_active_enums;
pub mod workspaces;
