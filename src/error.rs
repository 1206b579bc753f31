//! Error types shared by every layer.
//!
//! Only infrastructure problems are errors. Join misses, nulls, duplicate
//! rentals and negative durations are data, and the reports surface them.

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query build error: {0}")]
    Query(#[from] sea_query::error::Error),

    #[error("Invalid timestamp in column {column}: {value:?}")]
    InvalidTimestamp { column: &'static str, value: String },

    #[error("Invalid amount in column {column}: {value:?}")]
    InvalidAmount { column: &'static str, value: String },

    #[error("Storage backend not supported in this build: {0}")]
    UnsupportedBackend(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for ReportError {
    fn from(e: serde_yaml::Error) -> Self {
        ReportError::Serialization(e.to_string())
    }
}
