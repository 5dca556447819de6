//! Error types for the export pipeline.
//!
//! The flattening core never fails: unknown fields resolve to empty cells.
//! Everything around it can, and reports through this hierarchy:
//!
//! - [`ConfigError`] - Bad user input or configuration files
//! - [`SearchError`] - Failures talking to the search index
//! - [`WriteError`] - CSV/XML sink failures
//! - [`ExportError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised before any record is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file is not valid JSON for the expected shape.
    #[error("Invalid config JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Field list and display-name list cannot be zipped.
    #[error("The field map has {names} elements but {fields} fields were requested")]
    FieldMapMismatch { fields: usize, names: usize },

    /// Collection ids are UUIDs.
    #[error("Invalid collection id '{0}': expected a UUID")]
    InvalidCollectionId(String),

    /// Unknown environment name.
    #[error("Unknown environment '{0}' (expected 'production' or 'staging')")]
    UnknownEnvironment(String),

    /// No fields left to export.
    #[error("No fields requested")]
    NoFields,
}

// =============================================================================
// Search Errors
// =============================================================================

/// Errors from the search backend. Never retried here.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed before a response arrived.
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    /// Backend answered with a non-success status.
    #[error("Search backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not look like a search response.
    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    /// Failed to read an offline dump of hits.
    #[error("Failed to read hits file: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::RequestFailed(e.to_string())
    }
}

// =============================================================================
// Writer Errors
// =============================================================================

/// Errors while serializing rows.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Output could not be opened or written.
    #[error("Output IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoder failure.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// XML encoder failure.
    #[error("XML error: {0}")]
    XmlError(String),

    /// A row did not match the header width.
    #[error("Row has {got} cells but {expected} headers were written")]
    RowWidth { expected: usize, got: usize },
}

impl From<quick_xml::Error> for WriteError {
    fn from(e: quick_xml::Error) -> Self {
        WriteError::XmlError(e.to_string())
    }
}

// =============================================================================
// Export Errors (top-level)
// =============================================================================

/// Top-level export orchestration errors.
///
/// This is the error type returned by [`crate::export::run_export`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Search backend error.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Output error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Result type for writers.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for export runs.
pub type ExportResult<T> = Result<T, ExportError>;
