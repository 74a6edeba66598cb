//! Analyze command - clean and analyze without side effects

use anyhow::Result;

use ventas_core::services::{analyze, try_analyze, try_load_and_clean, with_total};
use ventas_core::Analysis;

use super::{load_config, ConfigOverrides};
use crate::output;

pub fn run(overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let config = load_config(overrides)?;

    let frame = match try_load_and_clean(&config.input_path, &config.csv) {
        Ok(cleaned) => with_total(cleaned.frame),
        Err(e) => {
            tracing::error!("Failed to load {}: {}", config.input_path.display(), e);
            output::warning("No data could be loaded.");
            return Ok(());
        }
    };

    if json {
        let analysis = try_analyze(&frame).unwrap_or_else(|e| {
            tracing::warn!("Skipping analysis: {}", e);
            Analysis::empty()
        });
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    if frame.is_empty() {
        output::warning("No data could be loaded.");
        return Ok(());
    }

    analyze(&frame);
    Ok(())
}
