//! Server error taxonomy and its translation into RFC 9457 problem details.
//!
//! Handlers return `Result<_, ServerError>`; every error leaves the process
//! as an `application/problem+json` body with a machine-readable `code`.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use deck_core::problem::{InvalidParam, ProblemDetails, codes};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// Field-level validation failures, carried as `invalidParams`.
    #[error("request validation failed")]
    Validation(Vec<InvalidParam>),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Weekly task-creation limit reached.
    #[error("weekly task limit of {limit} reached")]
    RateLimited { limit: u32 },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServerError {
    fn to_problem(&self) -> ProblemDetails {
        match self {
            Self::Validation(params) => ProblemDetails::new("Request validation failed", 400)
                .with_code(codes::VALIDATION_ERROR)
                .with_invalid_params(params.clone()),
            Self::NotFound { entity, id } => ProblemDetails::new("Not Found", 404)
                .with_code(codes::NOT_FOUND)
                .with_detail(format!("{entity} {id} does not exist")),
            Self::Unauthorized(reason) => ProblemDetails::new("Unauthorized", 401)
                .with_code(codes::UNAUTHORIZED)
                .with_detail(*reason),
            Self::RateLimited { limit } => ProblemDetails::new("Rate limit exceeded", 429)
                .with_code(codes::RATE_LIMIT_EXCEEDED)
                .with_detail(format!("Weekly task creation limit of {limit} reached")),
            Self::Db(_) | Self::Internal(_) => ProblemDetails::new("Internal Server Error", 500)
                .with_code(codes::INTERNAL_ERROR),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        if problem.status >= 500 {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = problem.status, "request rejected");
        }
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
