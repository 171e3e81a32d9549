//! Error types for loading and trimming worksheets.

use thiserror::Error;

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while resolving, loading or trimming a worksheet
#[derive(Debug, Error)]
pub enum DataError {
    /// URL is not a Google Sheets edit URL
    #[error("Invalid Google Sheets URL format: {0}")]
    InvalidFormat(String),

    /// URL fragment carries no `gid`
    #[error("gid parameter missing in the URL: {0}")]
    MissingTabId(String),

    /// Transport, HTTP status or CSV parse failure
    #[error("Failed to fetch worksheet: {0}")]
    FetchFailed(String),

    /// Service account credential missing, invalid or rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Spreadsheet or worksheet does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Skip count larger than the grid
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Slicing or header promotion failed
    #[error("Please check your skip_rows, skip_cols, & has_header values: {0}")]
    TrimFailed(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::FetchFailed(err.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::FetchFailed(err.to_string())
    }
}
