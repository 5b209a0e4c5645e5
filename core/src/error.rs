use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date range: {reason}")]
    InvalidRange { reason: String },

    #[error("Missing scope: {reason}")]
    MissingScope { reason: String },

    #[error("Unsupported granularity '{value}' (expected WEEK or MONTH)")]
    UnsupportedGranularity { value: String },

    #[error("Unknown order status '{value}'")]
    UnknownStatus { value: String },

    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnalyticsError {
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }

    pub fn missing_scope(reason: impl Into<String>) -> Self {
        Self::MissingScope {
            reason: reason.into(),
        }
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
