//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `amounts` - Conversion, business share and general tax calculation
//! - `status` - Status derivation for expenses, incomes and invoices
//! - `statistics` - Aggregation of amounts by category and date range

pub mod amounts;
pub mod statistics;
pub mod status;
