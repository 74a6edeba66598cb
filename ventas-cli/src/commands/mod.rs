//! CLI command implementations

pub mod analyze;
pub mod preview;
pub mod run;
pub mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use ventas_core::config::{Config, CsvOptions};

/// Values given on the command line; these win over settings and environment
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub settings: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub delimiter: Option<char>,
}

/// Build the run configuration: defaults, settings file, environment, flags
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = Config::load(overrides.settings.as_deref()).context("Failed to load settings")?;

    if let Some(ref input) = overrides.input {
        config = config.with_input_path(input);
    }
    if let Some(ref database) = overrides.database {
        config = config.with_database_path(database);
    }
    if let Some(ref chart) = overrides.chart {
        config = config.with_chart_path(chart);
    }
    if let Some(delimiter) = overrides.delimiter {
        config = config.with_csv(CsvOptions::with_delimiter(delimiter)?);
    }

    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_settings_file() {
        let temp = TempDir::new().unwrap();
        let settings = temp.path().join("settings.json");
        std::fs::write(&settings, r#"{ "inputPath": "from-file.csv", "chartPath": "file.png" }"#).unwrap();

        let config = load_config(&ConfigOverrides {
            settings: Some(settings),
            chart: Some(PathBuf::from("flag.svg")),
            delimiter: Some(';'),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.chart_path, PathBuf::from("flag.svg"));
        assert_eq!(config.csv.delimiter, b';');
        if std::env::var_os("VENTAS_INPUT").is_none() {
            assert_eq!(config.input_path, PathBuf::from("from-file.csv"));
        }
    }

    #[test]
    fn test_malformed_settings_is_an_error() {
        let temp = TempDir::new().unwrap();
        let settings = temp.path().join("settings.json");
        std::fs::write(&settings, "not json").unwrap();

        let result = load_config(&ConfigOverrides {
            settings: Some(settings),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_flag_is_an_error() {
        let temp = TempDir::new().unwrap();
        let settings = temp.path().join("settings.json");
        std::fs::write(&settings, "{}").unwrap();

        let result = load_config(&ConfigOverrides {
            settings: Some(settings),
            delimiter: Some('→'),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
