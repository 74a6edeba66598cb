//! Run command - full pipeline

use anyhow::Result;
use colored::Colorize;

use ventas_core::services::RunSummary;
use ventas_core::VentasContext;

use super::{load_config, ConfigOverrides};
use crate::output;

pub fn run(overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let ctx = VentasContext::new(load_config(overrides)?);

    if json {
        let summary = ctx.run_to(&mut std::io::sink());
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let summary = ctx.run();
    println!();
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("{}", "Run summary".bold());

    if let Some(report) = &summary.clean_report {
        output::info(&format!(
            "Read {} rows from {}, kept {}, dropped {} ({} dates repaired)",
            report.rows_read,
            summary.input_path.display(),
            report.rows_kept,
            report.dropped(),
            report.dates_repaired
        ));
    }

    output::stage("Load", &summary.load);
    if summary.stopped() {
        return;
    }
    output::stage("Totals", &summary.totals);
    output::stage("Analysis", &summary.analysis_status);
    output::stage(
        &format!("Store to {}", summary.database_path.display()),
        &summary.persist,
    );
    output::stage(&format!("Chart {}", summary.chart_path.display()), &summary.chart);
}
