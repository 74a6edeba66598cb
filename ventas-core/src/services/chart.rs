//! Chart service - renders the monthly revenue aggregate

use std::path::Path;

use crate::adapters::chart::PlottersChart;
use crate::domain::result::{Error, Result};
use crate::domain::MonthlyRevenue;
use crate::ports::ChartRenderer;

/// Render `monthly` to `path`. An empty aggregate writes nothing.
pub fn try_render_chart<R: ChartRenderer + ?Sized>(
    renderer: &R,
    monthly: &MonthlyRevenue,
    path: &Path,
) -> Result<()> {
    if monthly.is_empty() {
        return Err(Error::empty("no monthly revenue to chart"));
    }
    renderer.render(monthly, path)?;
    tracing::info!(path = %path.display(), months = monthly.len(), "Chart written");
    Ok(())
}

/// Render a bar chart to `destination`, logging any failure
pub fn render_chart(monthly: &MonthlyRevenue, destination: &Path) {
    match try_render_chart(&PlottersChart::default(), monthly, destination) {
        Ok(()) => {}
        Err(Error::EmptyDataset(reason)) => {
            tracing::warn!("Skipping chart: {}", reason);
        }
        Err(e) => {
            tracing::error!("Failed to render chart {}: {}", destination.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    use crate::domain::YearMonth;

    struct CountingRenderer {
        calls: Cell<usize>,
    }

    impl ChartRenderer for CountingRenderer {
        fn render(&self, _monthly: &MonthlyRevenue, _path: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_empty_aggregate_never_reaches_renderer() {
        let renderer = CountingRenderer { calls: Cell::new(0) };

        let err = try_render_chart(&renderer, &MonthlyRevenue::new(), Path::new("x.png")).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset(_)));
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn test_renderer_called_once() {
        let renderer = CountingRenderer { calls: Cell::new(0) };
        let monthly: MonthlyRevenue = vec![(YearMonth::new(2023, 5), 10.0)].into_iter().collect();

        try_render_chart(&renderer, &monthly, Path::new("x.png")).unwrap();
        assert_eq!(renderer.calls.get(), 1);
    }

    #[test]
    fn test_render_chart_empty_writes_no_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("grafico.png");

        render_chart(&MonthlyRevenue::new(), &path);
        assert!(!path.exists());
    }
}
