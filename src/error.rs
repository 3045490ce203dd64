//! Error types for sheetql.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for sheetql operations.
#[derive(Error, Debug)]
pub enum SheetqlError {
    /// Spreadsheet ingestion errors (unreadable workbook, empty sheet, etc.)
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Table store errors (connection failures, decode failures, etc.)
    #[error("Store error: {0}")]
    Store(String),

    /// The named table does not exist in the store.
    ///
    /// Kept distinct from an empty result set so callers can tell
    /// "no such table" apart from "no rows".
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Query execution errors (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Generation model errors (rate limits, auth, timeouts, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Export errors (write failures, rename failures, etc.)
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration errors (missing API key, invalid arguments, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SheetqlError {
    /// Creates an ingest error with the given message.
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }

    /// Creates a store error with the given message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates an export error with the given message.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Ingest(_) => "Ingest Error",
            Self::Store(_) => "Store Error",
            Self::TableNotFound(_) => "Table Not Found",
            Self::Query(_) => "Query Error",
            Self::Llm(_) => "LLM Error",
            Self::Export(_) => "Export Error",
            Self::Config(_) => "Configuration Error",
        }
    }

    /// Returns true if this error means the target table does not exist.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_))
    }
}

/// Result type alias using SheetqlError.
pub type Result<T> = std::result::Result<T, SheetqlError>;
