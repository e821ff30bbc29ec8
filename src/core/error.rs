//! Error types for gameplay data loading.

use thiserror::Error;

/// Errors that can occur when loading config, scene or dialogue data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A scene reference did not match the registry.
    #[error("Unknown scene {0}")]
    UnknownScene(String),
}

impl DataLoadError {
    /// Read a data file, mapping io failures to load errors.
    pub fn read(path: &std::path::Path) -> Result<String, DataLoadError> {
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(path.display().to_string()));
        }
        std::fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }

    /// Parse RON text, attributing failures to `path`.
    pub fn parse<T: serde::de::DeserializeOwned>(path: &str, contents: &str) -> Result<T, DataLoadError> {
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })
    }
}
