//! Service layer - pipeline stages and their orchestration
//!
//! Each stage has a tagged form (`try_*`, returning `Result`) and a plain
//! form that logs failures and hands back a neutral value.

pub mod analysis;
pub mod chart;
pub mod cleaning;
pub mod persistence;
pub mod pipeline;
pub mod totals;

pub use analysis::{analyze, analyze_to, top_product, try_analyze, write_report};
pub use chart::{render_chart, try_render_chart};
pub use cleaning::{clean_reader, load_and_clean, try_load_and_clean, CleanedSales};
pub use persistence::{persist, try_persist};
pub use pipeline::{Pipeline, RunSummary, StageStatus};
pub use totals::{try_line_totals, with_total};
