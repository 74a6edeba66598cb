//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The pipeline
//! depends only on these traits, not on concrete implementations.

mod chart;
mod store;

pub use chart::ChartRenderer;
pub use store::{SalesStore, MONTHLY_TABLE, SALES_TABLE};
