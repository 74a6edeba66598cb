//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use ventas_core::StageStatus;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print one line per pipeline stage outcome
pub fn stage(name: &str, status: &StageStatus) {
    match status {
        StageStatus::Completed => success(&format!("✓ {}", name)),
        StageStatus::Skipped { reason } => warning(&format!("- {} skipped: {}", name, reason)),
        StageStatus::Failed { error } => {
            println!("{}", format!("✗ {} failed: {}", name, error).red())
        }
    }
}
