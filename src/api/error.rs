//! API client errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced when talking to the marketplace API.
///
/// [`ApiError::Remote`] carries the server-supplied `message` when the error
/// body has one, and a generic status line otherwise. [`ApiError::Network`]
/// covers everything that prevented a response from arriving, including the
/// client-side request timeout.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not complete.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Remote {
        /// HTTP status of the response.
        status: StatusCode,
        /// Server-supplied message, or a generic status line.
        message: String,
    },
}

impl ApiError {
    /// Whether this error came back from the server rather than the
    /// transport.
    pub fn is_remote(&self) -> bool {
        matches!(self, ApiError::Remote { .. })
    }
}
