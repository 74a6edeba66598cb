//! Summary command - read back the stored tables

use anyhow::{Context, Result};
use colored::Colorize;

use ventas_core::adapters::duckdb::DuckDbStore;
use ventas_core::domain::format_currency;

use super::{load_config, ConfigOverrides};
use crate::output;

pub fn run(overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let config = load_config(overrides)?;
    if !config.database_path.exists() {
        anyhow::bail!("Database not found: {}", config.database_path.display());
    }

    let store = DuckDbStore::new(&config.database_path);
    let summary = store
        .summary()
        .with_context(|| format!("Failed to read {}", config.database_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", format!("Stored results in {}", store.path().display()).bold());
    println!();
    output::info(&format!(
        "{} sales rows ({})",
        summary.sales_rows,
        summary.sales_columns.join(", ")
    ));
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Month", "Revenue"]);
    for (month, revenue) in &summary.monthly {
        table.add_row(vec![month.clone(), format_currency(*revenue)]);
    }
    println!("{}", table);

    Ok(())
}
