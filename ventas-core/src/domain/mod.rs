//! Core domain entities
//!
//! Sales records, the columnar frame they are cleaned into, and the
//! aggregates computed from it. Pure data structures - no I/O.

mod revenue;
mod sale;
pub mod result;

pub use revenue::{
    format_currency, format_quantity, Analysis, CleanReport, MonthlyRevenue, TopProduct, YearMonth,
};
pub use sale::{Column, Sale, SalesFrame};
