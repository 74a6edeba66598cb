//! Pipeline service - runs load, totals, analysis, persistence and chart in order
//!
//! Each stage returns a tagged result. A failing stage is logged, recorded in
//! the [`RunSummary`] and replaced by a neutral value so later stages can
//! decide whether to run.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::domain::result::Error;
use crate::domain::{Analysis, CleanReport, SalesFrame};
use crate::ports::{ChartRenderer, SalesStore};
use crate::services::analysis::{try_analyze, write_report};
use crate::services::chart::try_render_chart;
use crate::services::cleaning::try_load_and_clean;
use crate::services::persistence::try_persist;
use crate::services::totals::try_line_totals;

const NO_DATA: &str = "no data could be loaded";

/// Outcome of one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Skipped { reason: String },
    Failed { error: String },
}

impl StageStatus {
    fn skipped(reason: impl Into<String>) -> Self {
        StageStatus::Skipped {
            reason: reason.into(),
        }
    }

    fn failed(error: &Error) -> Self {
        StageStatus::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StageStatus::Completed)
    }
}

/// What a pipeline run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub database_path: PathBuf,
    pub chart_path: PathBuf,
    pub load: StageStatus,
    pub clean_report: Option<CleanReport>,
    pub totals: StageStatus,
    pub analysis_status: StageStatus,
    pub analysis: Analysis,
    pub persist: StageStatus,
    pub chart: StageStatus,
}

impl RunSummary {
    fn new(config: &Config) -> Self {
        let not_run = StageStatus::skipped(NO_DATA);
        Self {
            input_path: config.input_path.clone(),
            database_path: config.database_path.clone(),
            chart_path: config.chart_path.clone(),
            load: not_run.clone(),
            clean_report: None,
            totals: not_run.clone(),
            analysis_status: not_run.clone(),
            analysis: Analysis::empty(),
            persist: not_run.clone(),
            chart: not_run,
        }
    }

    /// True when the run ended after loading because there was nothing to process
    pub fn stopped(&self) -> bool {
        !self.load.is_completed()
    }
}

/// Batch pipeline over a store and a chart renderer
pub struct Pipeline<S, R> {
    config: Config,
    store: S,
    renderer: R,
}

impl<S: SalesStore, R: ChartRenderer> Pipeline<S, R> {
    pub fn new(config: Config, store: S, renderer: R) -> Self {
        Self {
            config,
            store,
            renderer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run every stage, writing the analysis report to `out`
    pub fn run<W: Write>(&self, out: &mut W) -> RunSummary {
        let mut summary = RunSummary::new(&self.config);

        let cleaned = match try_load_and_clean(&self.config.input_path, &self.config.csv) {
            Ok(cleaned) => cleaned,
            Err(e) => {
                tracing::error!("Failed to load {}: {}", self.config.input_path.display(), e);
                tracing::warn!("{}; stopping", NO_DATA);
                summary.load = StageStatus::failed(&e);
                return summary;
            }
        };
        summary.clean_report = Some(cleaned.report);

        if cleaned.frame.is_empty() {
            tracing::warn!("{}; stopping", NO_DATA);
            summary.load = StageStatus::skipped("no rows survived cleaning");
            return summary;
        }
        summary.load = StageStatus::Completed;

        let mut frame = cleaned.frame;
        summary.totals = self.attach_totals(&mut frame);

        match try_analyze(&frame) {
            Ok(analysis) => {
                if let Err(e) = write_report(&analysis, out) {
                    tracing::error!("Failed to write analysis report: {}", e);
                }
                summary.analysis = analysis;
                summary.analysis_status = StageStatus::Completed;
            }
            Err(e) => {
                tracing::warn!("Skipping analysis: {}", e);
                summary.analysis_status = StageStatus::failed(&e);
            }
        }

        let monthly = &summary.analysis.monthly;
        summary.persist = if monthly.is_empty() {
            tracing::warn!("Skipping persistence: no monthly revenue");
            StageStatus::skipped("no monthly revenue")
        } else {
            match try_persist(&self.store, &frame, monthly) {
                Ok(()) => StageStatus::Completed,
                Err(e) => {
                    tracing::error!("Failed to store results in {}: {}", self.store.destination(), e);
                    StageStatus::failed(&e)
                }
            }
        };

        summary.chart = if monthly.is_empty() {
            tracing::warn!("Skipping chart: no monthly revenue");
            StageStatus::skipped("no monthly revenue")
        } else {
            match try_render_chart(&self.renderer, monthly, &self.config.chart_path) {
                Ok(()) => StageStatus::Completed,
                Err(e) => {
                    tracing::error!(
                        "Failed to render chart {}: {}",
                        self.config.chart_path.display(),
                        e
                    );
                    StageStatus::failed(&e)
                }
            }
        };

        summary
    }

    fn attach_totals(&self, frame: &mut SalesFrame) -> StageStatus {
        match try_line_totals(frame).and_then(|totals| frame.set_totals(totals)) {
            Ok(()) => StageStatus::Completed,
            Err(e) => {
                tracing::error!("Cannot compute line totals: {}", e);
                StageStatus::failed(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::domain::result::Result;
    use crate::domain::MonthlyRevenue;

    #[derive(Default)]
    struct FakeStore {
        written: RefCell<Vec<(usize, usize)>>,
        fail: bool,
    }

    impl SalesStore for FakeStore {
        fn replace_sales(&self, _frame: &SalesFrame) -> Result<()> {
            Ok(())
        }

        fn replace_monthly_revenue(&self, _monthly: &MonthlyRevenue) -> Result<()> {
            Ok(())
        }

        fn replace_all(&self, frame: &SalesFrame, monthly: &MonthlyRevenue) -> Result<()> {
            if self.fail {
                return Err(Error::storage("database is locked"));
            }
            self.written.borrow_mut().push((frame.len(), monthly.len()));
            Ok(())
        }

        fn destination(&self) -> String {
            "fake".to_string()
        }
    }

    #[derive(Default)]
    struct FakeRenderer {
        rendered: RefCell<Vec<usize>>,
        fail: bool,
    }

    impl ChartRenderer for FakeRenderer {
        fn render(&self, monthly: &MonthlyRevenue, _path: &Path) -> Result<()> {
            if self.fail {
                return Err(Error::render("no fonts"));
            }
            self.rendered.borrow_mut().push(monthly.len());
            Ok(())
        }
    }

    fn config_with_csv(temp: &TempDir, content: &str) -> Config {
        let input = temp.path().join("ventas.csv");
        std::fs::write(&input, content).unwrap();
        Config::default()
            .with_input_path(input)
            .with_database_path(temp.path().join("ventas.duckdb"))
            .with_chart_path(temp.path().join("grafico.png"))
    }

    const SCENARIO: &str = "\
fecha,producto,cantidad,precio_unitario
2023-05-01,A,10,100
2023-05-15,B,5,20
2023-06-01,A,1,100
";

    #[test]
    fn test_full_run_completes_every_stage() {
        let temp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(
            config_with_csv(&temp, SCENARIO),
            FakeStore::default(),
            FakeRenderer::default(),
        );

        let mut out = Vec::new();
        let summary = pipeline.run(&mut out);

        assert!(!summary.stopped());
        assert!(summary.totals.is_completed());
        assert!(summary.analysis_status.is_completed());
        assert!(summary.persist.is_completed());
        assert!(summary.chart.is_completed());
        assert_eq!(summary.clean_report.unwrap().rows_kept, 3);
        assert_eq!(summary.analysis.top_by_revenue.unwrap().product, "A");

        assert_eq!(*pipeline.store.written.borrow(), vec![(3, 2)]);
        assert_eq!(*pipeline.renderer.rendered.borrow(), vec![2]);

        let report = String::from_utf8(out).unwrap();
        assert!(report.starts_with("--- Sales analysis results ---"));
        assert_eq!(report.matches("Revenue by month").count(), 1);
    }

    #[test]
    fn test_missing_input_stops_run() {
        let temp = TempDir::new().unwrap();
        let config = Config::default().with_input_path(temp.path().join("absent.csv"));
        let pipeline = Pipeline::new(config, FakeStore::default(), FakeRenderer::default());

        let mut out = Vec::new();
        let summary = pipeline.run(&mut out);

        assert!(summary.stopped());
        assert!(matches!(summary.load, StageStatus::Failed { .. }));
        assert!(summary.clean_report.is_none());
        assert_eq!(summary.persist, StageStatus::skipped(NO_DATA));
        assert!(pipeline.store.written.borrow().is_empty());
        assert!(pipeline.renderer.rendered.borrow().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_all_rows_dropped_stops_run() {
        let temp = TempDir::new().unwrap();
        let csv = "fecha,producto,cantidad,precio_unitario\n2023-05-01,A,0,10\n,B,1,1\n";
        let pipeline = Pipeline::new(
            config_with_csv(&temp, csv),
            FakeStore::default(),
            FakeRenderer::default(),
        );

        let mut out = Vec::new();
        let summary = pipeline.run(&mut out);

        assert!(summary.stopped());
        assert!(matches!(summary.load, StageStatus::Skipped { .. }));
        assert_eq!(summary.clean_report.unwrap().rows_read, 2);
        assert!(pipeline.store.written.borrow().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_store_failure_does_not_block_chart() {
        let temp = TempDir::new().unwrap();
        let store = FakeStore {
            fail: true,
            ..Default::default()
        };
        let pipeline = Pipeline::new(config_with_csv(&temp, SCENARIO), store, FakeRenderer::default());

        let summary = pipeline.run(&mut Vec::new());

        assert!(matches!(summary.persist, StageStatus::Failed { ref error } if error.contains("locked")));
        assert!(summary.chart.is_completed());
    }

    #[test]
    fn test_render_failure_is_recorded() {
        let temp = TempDir::new().unwrap();
        let renderer = FakeRenderer {
            fail: true,
            ..Default::default()
        };
        let pipeline = Pipeline::new(config_with_csv(&temp, SCENARIO), FakeStore::default(), renderer);

        let summary = pipeline.run(&mut Vec::new());

        assert!(summary.persist.is_completed());
        assert!(matches!(summary.chart, StageStatus::Failed { .. }));
    }

    #[test]
    fn test_summary_serializes_stage_tags() {
        let temp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(
            config_with_csv(&temp, SCENARIO),
            FakeStore::default(),
            FakeRenderer::default(),
        );

        let summary = pipeline.run(&mut Vec::new());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["persist"]["status"], "completed");
        assert_eq!(json["analysis"]["monthly"]["2023-05"], 1100.0);
    }
}
