//! Ventas CLI - Sales CSV cleaning, analysis and charting

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod logging;
mod output;

use commands::{analyze, preview, run as run_cmd, summary, ConfigOverrides};

/// Ventas - clean, analyze and chart a sales CSV
#[derive(Parser)]
#[command(name = "ventas", version, about, long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "VENTAS_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Options for reading the input file
#[derive(Args, Debug, Default)]
struct InputArgs {
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Sales CSV file
    #[arg(long)]
    input: Option<PathBuf>,
    /// Field delimiter of the CSV file
    #[arg(long)]
    delimiter: Option<char>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: clean, analyze, store and chart
    Run {
        #[command(flatten)]
        input: InputArgs,
        /// DuckDB database file
        #[arg(long)]
        database: Option<PathBuf>,
        /// Chart image file (.png or .svg)
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Print the run summary as JSON instead of the report
        #[arg(long)]
        json: bool,
    },

    /// Clean and analyze without storing or charting
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the cleaned rows and what was dropped
    Preview {
        #[command(flatten)]
        input: InputArgs,
        /// Number of rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show what the last run stored in the database
    Summary {
        /// JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// DuckDB database file
        #[arg(long)]
        database: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl From<InputArgs> for ConfigOverrides {
    fn from(args: InputArgs) -> Self {
        Self {
            settings: args.settings,
            input: args.input,
            delimiter: args.delimiter,
            ..Default::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { input, database, chart, json } => {
            let overrides = ConfigOverrides {
                database,
                chart,
                ..ConfigOverrides::from(input)
            };
            run_cmd::run(&overrides, json)
        }
        Commands::Analyze { input, json } => analyze::run(&ConfigOverrides::from(input), json),
        Commands::Preview { input, limit } => preview::run(&ConfigOverrides::from(input), limit),
        Commands::Summary { settings, database, json } => {
            let overrides = ConfigOverrides {
                settings,
                database,
                ..Default::default()
            };
            summary::run(&overrides, json)
        }
    }
}
