//! Analysis service - top products and monthly revenue

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::domain::result::{Error, Result};
use crate::domain::{
    format_currency, format_quantity, Analysis, Column, MonthlyRevenue, SalesFrame, TopProduct,
    YearMonth,
};

const REPORT_HEADER: &str = "--- Sales analysis results ---";
const REPORT_FOOTER: &str = "------------------------------";

/// Analyze `frame` and print the report to stdout.
pub fn analyze(frame: &SalesFrame) -> Analysis {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    analyze_to(frame, &mut out)
}

/// Analyze `frame` and write the report to `out`.
///
/// Frames that cannot be analyzed (empty, or without totals) are logged and
/// produce [`Analysis::empty`] with no report.
pub fn analyze_to<W: Write>(frame: &SalesFrame, out: &mut W) -> Analysis {
    let analysis = match try_analyze(frame) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!("Skipping analysis: {}", e);
            return Analysis::empty();
        }
    };

    if let Err(e) = write_report(&analysis, out) {
        tracing::error!("Failed to write analysis report: {}", e);
    }
    analysis
}

/// Compute the analysis, reporting why a frame cannot be analyzed
pub fn try_analyze(frame: &SalesFrame) -> Result<Analysis> {
    if frame.is_empty() {
        return Err(Error::empty("no rows to analyze"));
    }

    let (Some(products), Some(quantities), Some(totals), Some(dates)) = (
        frame.products(),
        frame.quantities(),
        frame.totals(),
        frame.dates(),
    ) else {
        return Err(Error::missing_columns(
            frame
                .missing(&[Column::Date, Column::Product, Column::Quantity, Column::Total])
                .into_iter()
                .map(Column::name),
        ));
    };

    let top_by_quantity = top_product(products, quantities);
    let top_by_revenue = top_product(products, totals);
    let monthly: MonthlyRevenue = dates
        .iter()
        .zip(totals)
        .map(|(date, total)| (YearMonth::of(*date), *total))
        .collect();

    Ok(Analysis {
        top_by_quantity,
        top_by_revenue,
        monthly,
    })
}

/// Sum `values` per product and return the product with the largest sum.
///
/// Ties go to the lexicographically smallest product name.
pub fn top_product(products: &[String], values: &[f64]) -> Option<TopProduct> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for (product, value) in products.iter().zip(values) {
        *sums.entry(product.as_str()).or_insert(0.0) += value;
    }

    let mut best: Option<(&str, f64)> = None;
    for (product, sum) in sums {
        match best {
            Some((_, best_sum)) if sum <= best_sum => {}
            _ => best = Some((product, sum)),
        }
    }

    best.map(|(product, value)| TopProduct {
        product: product.to_string(),
        value,
    })
}

/// Write the human-readable report for `analysis`
pub fn write_report<W: Write>(analysis: &Analysis, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", REPORT_HEADER)?;
    if let Some(top) = &analysis.top_by_quantity {
        writeln!(
            out,
            "a) Top product by quantity: {} (units: {})",
            top.product,
            format_quantity(top.value)
        )?;
    }
    if let Some(top) = &analysis.top_by_revenue {
        writeln!(
            out,
            "b) Top product by revenue: {} (total: {})",
            top.product,
            format_currency(top.value)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "c) Revenue by month:")?;
    for (month, total) in analysis.monthly.iter() {
        writeln!(out, "   {}: {}", month, format_currency(total))?;
    }
    writeln!(out, "{}", REPORT_FOOTER)?;
    Ok(())
}
