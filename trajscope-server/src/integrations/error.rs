// Trajscope Integration Layer - Error Types
//
// Failures talking to the trajectory backend. None of them are fatal: the
// worker logs them and the application keeps running.

use thiserror::Error;

/// Errors that can occur while querying the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrationError {
    /// Endpoint could not be turned into a request URL
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Transport failure (connection refused, timeout, reset, ...)
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    /// Backend answered with a non-2xx status
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// Response body was not valid JSON
    #[error("failed to parse response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },

    /// Query queue closed (worker gone), request dropped
    #[error("query queue closed")]
    ChannelClosed,
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for IntegrationError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::ChannelClosed
    }
}

/// Result type for integration operations
pub type IntegrationResult<T> = Result<T, IntegrationError>;
