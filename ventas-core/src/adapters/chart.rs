//! Plotters chart renderer
//!
//! Draws monthly revenue as a bar chart. The backend follows the file
//! extension: `.svg` uses the SVG backend, anything else is written as a
//! bitmap (PNG for `.png`).

use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::result::{Error, Result};
use crate::domain::{format_currency, MonthlyRevenue};
use crate::ports::ChartRenderer;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);
const FONT: &str = "sans-serif";

/// Output format picked from the destination path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Bitmap,
    Svg,
}

impl ChartFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ChartFormat::Svg,
            _ => ChartFormat::Bitmap,
        }
    }
}

/// Bar chart of monthly revenue
#[derive(Debug, Clone)]
pub struct PlottersChart {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for PlottersChart {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            title: "Monthly revenue".to_string(),
        }
    }
}

impl ChartRenderer for PlottersChart {
    fn render(&self, monthly: &MonthlyRevenue, path: &Path) -> Result<()> {
        if monthly.is_empty() {
            return Err(Error::empty("no monthly revenue to chart"));
        }

        let size = (self.width, self.height);
        let drawn = match ChartFormat::from_path(path) {
            ChartFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw_bars(&root, monthly, &self.title)
                    .and_then(|_| root.present())
                    .map_err(|e| e.to_string())
            }
            ChartFormat::Bitmap => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                draw_bars(&root, monthly, &self.title)
                    .and_then(|_| root.present())
                    .map_err(|e| e.to_string())
            }
        };

        drawn.map_err(|e| Error::render(format!("{}: {}", path.display(), e)))
    }
}

/// Vertical range with headroom above the tallest bar for its label
fn value_range(monthly: &MonthlyRevenue) -> (f64, f64) {
    let (min, max) = monthly
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), (_, v)| (lo.min(v), hi.max(v)));
    let span = max - min;
    if span <= 0.0 {
        (0.0, 1.0)
    } else {
        (min, max + span * 0.15)
    }
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    monthly: &MonthlyRevenue,
    title: &str,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let labels: Vec<String> = monthly.iter().map(|(m, _)| m.to_string()).collect();
    let values: Vec<f64> = monthly.iter().map(|(_, v)| v).collect();
    let (y_min, y_max) = value_range(monthly);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 28).into_font().style(FontStyle::Bold))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.15))
        .x_labels(labels.len())
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v: &f64| format_currency(*v))
        .x_desc("Month")
        .y_desc("Revenue")
        .axis_desc_style((FONT, 16))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(12)
            .data(values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
    )?;

    let label_style = TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        Text::new(
            format_currency(*v),
            (SegmentValue::CenterOf(i as u32), *v),
            label_style.clone(),
        )
    }))?;

    Ok(())
}
