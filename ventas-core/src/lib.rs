//! Ventas Core - Cleaning, analysis and storage of sales records
//!
//! This crate implements a batch pipeline following hexagonal architecture:
//!
//! - **domain**: Core entities (Sale, SalesFrame, MonthlyRevenue, Analysis)
//! - **ports**: Trait definitions for external dependencies (SalesStore, ChartRenderer)
//! - **services**: Pipeline stages and their orchestration
//! - **adapters**: Concrete implementations (DuckDB, plotters)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::io::Write;

use adapters::chart::PlottersChart;
use adapters::duckdb::DuckDbStore;
use config::Config;
use services::{Pipeline, RunSummary};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Analysis, CleanReport, MonthlyRevenue, Sale, SalesFrame, TopProduct, YearMonth};
pub use services::StageStatus;

/// Main context for pipeline runs
///
/// Wires the DuckDB store and the plotters renderer to the paths in the
/// configuration.
pub struct VentasContext {
    pub pipeline: Pipeline<DuckDbStore, PlottersChart>,
}

impl VentasContext {
    pub fn new(config: Config) -> Self {
        let store = DuckDbStore::new(&config.database_path);
        let pipeline = Pipeline::new(config, store, PlottersChart::default());
        Self { pipeline }
    }

    pub fn config(&self) -> &Config {
        self.pipeline.config()
    }

    pub fn store(&self) -> &DuckDbStore {
        self.pipeline.store()
    }

    /// Run the full pipeline, printing the report to stdout
    pub fn run(&self) -> RunSummary {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }

    /// Run the full pipeline, writing the report to `out`
    pub fn run_to<W: Write>(&self, out: &mut W) -> RunSummary {
        self.pipeline.run(out)
    }
}
