//! Error types for engine operations.

use crate::{request::Request, response::Response};
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad local arguments, raised before any request is sent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The engine reported a failure (non-2xx response). Carries the
    /// original request and response for caller diagnostics.
    #[error("remote operation failed: {} {} returned HTTP {}", .request.method(), .request.path(), .response.status())]
    Remote {
        /// The request that was sent.
        request: Request,
        /// The response the engine returned.
        response: Response,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g. reading an attachment file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Build a remote-operation error from the request/response pair.
    pub(crate) fn remote(request: Request, response: Response) -> Self {
        Self::Remote { request, response }
    }

    /// Check if this is an engine-reported failure.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Get the HTTP status code if the engine reported one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { response, .. } => Some(response.status().as_u16()),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get the failed request, if this error carries one.
    pub fn request(&self) -> Option<&Request> {
        match self {
            Self::Remote { request, .. } => Some(request),
            _ => None,
        }
    }

    /// Get the engine response, if this error carries one.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Remote { response, .. } => Some(response),
            _ => None,
        }
    }
}
