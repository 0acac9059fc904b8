//! Error types raised while talking to the scoreboard backend.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ApiError`] failures.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures that can occur while fetching a scoreboard document.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build scoreboard API client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The configured base URL cannot be joined with a document name.
    #[error("invalid scoreboard API URL `{url}`")]
    InvalidUrl { url: String },
    /// The request could not be sent or the connection dropped.
    #[error("failed to send scoreboard request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status code.
    #[error("unexpected scoreboard response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be parsed into the expected document.
    #[error("failed to decode scoreboard response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}
