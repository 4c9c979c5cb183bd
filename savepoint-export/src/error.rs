//! Error types for the export pipeline.

use thiserror::Error;

/// Errors that can occur while exporting a savepoint.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The configured backend URL is invalid.
    #[error("invalid conversion backend URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("conversion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A request or response body was not valid JSON.
    #[error("failed to parse conversion payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend rejected the request. The body is its error message.
    #[error("{body}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The artifact could not be delivered.
    #[error("failed to write export artifact: {0}")]
    Sink(#[from] std::io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
