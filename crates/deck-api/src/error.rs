//! API client error types.

use thiserror::Error;

use deck_core::problem::{ProblemDetails, codes};

/// Errors that can occur when talking to the taskdeck API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned an RFC 9457 problem details body.
    #[error("API problem ({status}): {title}", status = .0.status, title = .0.title)]
    Problem(ProblemDetails),

    /// The server rate-limited the request (429).
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds from the `Retry-After` header; 60 when absent or
        /// unparseable.
        retry_after_secs: u64,
        /// Problem details body, when the server sent one.
        problem: Option<ProblemDetails>,
    },

    /// Non-success response whose body was not a problem details object.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status of the failure, when one is known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Problem(problem) => Some(problem.status),
            Self::RateLimited { .. } => Some(429),
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }

    /// Whether this failure is a field-level validation problem, surfaced
    /// to forms for inline display.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Problem(problem) if problem.code.as_deref() == Some(codes::VALIDATION_ERROR)
        )
    }
}
