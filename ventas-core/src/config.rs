//! Configuration management
//!
//! Settings are layered, lowest priority first:
//! 1. Built-in defaults (`ventas.csv`, `ventas.duckdb`, `grafico.png`)
//! 2. A JSON settings file:
//! ```json
//! { "inputPath": "data/ventas.csv", "databasePath": "out/ventas.duckdb",
//!   "chartPath": "out/grafico.png", "delimiter": ";" }
//! ```
//! 3. Environment variables `VENTAS_INPUT`, `VENTAS_DATABASE`, `VENTAS_CHART`
//! 4. Explicit overrides from the caller (CLI flags)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

pub const DEFAULT_INPUT_PATH: &str = "ventas.csv";
pub const DEFAULT_DATABASE_PATH: &str = "ventas.duckdb";
pub const DEFAULT_CHART_PATH: &str = "grafico.png";

/// Settings file looked up in the working directory when none is given
pub const SETTINGS_FILE: &str = "ventas.json";

/// Raw settings file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    input_path: Option<PathBuf>,
    #[serde(default)]
    database_path: Option<PathBuf>,
    #[serde(default)]
    chart_path: Option<PathBuf>,
    #[serde(default)]
    delimiter: Option<char>,
}

/// How the input file is tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    /// Options with a delimiter given as a character; must be a single ASCII byte
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(Error::config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                delimiter
            )));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }
}

/// Pipeline configuration, passed explicitly to the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub input_path: PathBuf,
    pub database_path: PathBuf,
    pub chart_path: PathBuf,
    pub csv: CsvOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            csv: CsvOptions::default(),
        }
    }
}

impl Config {
    /// Load config from a settings file and the process environment.
    ///
    /// With `settings_path` the file must exist and parse. Without it,
    /// `ventas.json` in the working directory and then
    /// `<config dir>/ventas/settings.json` are tried; a missing file there
    /// just means defaults.
    pub fn load(settings_path: Option<&Path>) -> Result<Self> {
        let config = match settings_path {
            Some(path) => Self::from_settings_file(path)?,
            None => match Self::discover_settings_file() {
                Some(path) => Self::from_settings_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Read a settings file on top of the defaults
    pub fn from_settings_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read settings file {}: {}", path.display(), e))
        })?;
        let raw: SettingsFile = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("Invalid settings file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Loaded settings file");
        Self::default().merge(raw)
    }

    /// Apply `VENTAS_*` overrides using `lookup` to read variables
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("VENTAS_INPUT").filter(|v| !v.is_empty()) {
            self.input_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("VENTAS_DATABASE").filter(|v| !v.is_empty()) {
            self.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("VENTAS_CHART").filter(|v| !v.is_empty()) {
            self.chart_path = PathBuf::from(v);
        }
        Ok(self)
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_chart_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_path = path.into();
        self
    }

    pub fn with_csv(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    fn merge(mut self, raw: SettingsFile) -> Result<Self> {
        if let Some(p) = raw.input_path {
            self.input_path = p;
        }
        if let Some(p) = raw.database_path {
            self.database_path = p;
        }
        if let Some(p) = raw.chart_path {
            self.chart_path = p;
        }
        if let Some(d) = raw.delimiter {
            self.csv = CsvOptions::with_delimiter(d)?;
        }
        Ok(self)
    }

    fn discover_settings_file() -> Option<PathBuf> {
        let local = PathBuf::from(SETTINGS_FILE);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("ventas").join("settings.json"))
            .filter(|p| p.is_file())
    }
}
