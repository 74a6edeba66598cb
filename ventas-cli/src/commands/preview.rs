//! Preview command - show cleaned rows and the cleaning report

use anyhow::Result;
use colored::Colorize;

use ventas_core::domain::{format_currency, format_quantity};
use ventas_core::services::{try_load_and_clean, with_total};

use super::{load_config, ConfigOverrides};
use crate::output;

pub fn run(overrides: &ConfigOverrides, limit: usize) -> Result<()> {
    let config = load_config(overrides)?;
    let cleaned = match try_load_and_clean(&config.input_path, &config.csv) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            tracing::error!("Failed to load {}: {}", config.input_path.display(), e);
            output::warning("No data could be loaded.");
            return Ok(());
        }
    };
    let report = cleaned.report.clone();
    let frame = with_total(cleaned.frame);

    println!("{}", format!("Preview of {}", config.input_path.display()).bold());
    println!();

    let sales = frame.sales().unwrap_or_default();
    let totals = frame.totals().unwrap_or_default();
    if sales.is_empty() {
        output::warning("No rows survived cleaning.");
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["fecha", "producto", "cantidad", "precio_unitario", "total"]);
        for (sale, total) in sales.iter().zip(totals).take(limit) {
            table.add_row(vec![
                sale.date.format("%Y-%m-%d").to_string(),
                sale.product.clone(),
                format_quantity(sale.quantity),
                sale.unit_price.to_string(),
                format_currency(*total),
            ]);
        }
        println!("{}", table);
        if sales.len() > limit {
            output::info(&format!("... {} more rows", sales.len() - limit));
        }
    }
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Rows read".to_string(), report.rows_read.to_string()]);
    table.add_row(vec!["Rows kept".to_string(), report.rows_kept.to_string()]);
    table.add_row(vec!["Dates repaired".to_string(), report.dates_repaired.to_string()]);
    table.add_row(vec!["Dropped: missing field".to_string(), report.dropped_missing.to_string()]);
    table.add_row(vec!["Dropped: invalid date".to_string(), report.dropped_invalid_date.to_string()]);
    table.add_row(vec!["Dropped: invalid number".to_string(), report.dropped_invalid_number.to_string()]);
    table.add_row(vec!["Dropped: quantity <= 0".to_string(), report.dropped_non_positive.to_string()]);
    println!("{}", table);

    Ok(())
}
