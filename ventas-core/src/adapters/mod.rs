//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the SalesStore port
//! - plotters for the ChartRenderer port

pub mod chart;
pub mod duckdb;
