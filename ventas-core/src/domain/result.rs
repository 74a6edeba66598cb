//! Result and error types for the core library

use std::path::PathBuf;

use thiserror::Error;

/// Core library error type
///
/// Every pipeline stage returns one of these instead of panicking. The
/// orchestrator matches on the variant to decide which later stages to skip.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Could not read input: {0}")]
    InputUnreadable(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Inconsistent dataset shape: {0}")]
    Shape(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an unreadable-input error
    pub fn unreadable(msg: impl Into<String>) -> Self {
        Self::InputUnreadable(msg.into())
    }

    /// Create a missing-columns error
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingColumns(columns.into_iter().map(Into::into).collect())
    }

    /// Create a shape error
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Create an empty-dataset error
    pub fn empty(msg: impl Into<String>) -> Self {
        Self::EmptyDataset(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::InputUnreadable(err.to_string())
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_names() {
        let err = Error::missing_columns(["cantidad", "precio_unitario"]);
        assert_eq!(
            err.to_string(),
            "Missing required columns: cantidad, precio_unitario"
        );
    }

    #[test]
    fn test_input_not_found_shows_path() {
        let err = Error::InputNotFound(PathBuf::from("nope/ventas.csv"));
        assert!(err.to_string().contains("nope/ventas.csv"));
    }
}
