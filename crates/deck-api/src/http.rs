//! Shared HTTP response helpers for the API client.
//!
//! Centralizes the error branch: a non-success response body is parsed and,
//! when it matches the problem details shape, surfaced as
//! [`ApiError::Problem`] so callers can read the status, code, and
//! field-level `invalidParams`. 429 responses carry their `Retry-After`
//! value as [`ApiError::RateLimited`]; anything else becomes
//! [`ApiError::Api`].

use deck_core::envelope::Envelope;
use deck_core::problem::{ProblemDetails, looks_like_problem};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Check an HTTP response for error conditions.
///
/// Returns the response unchanged on success. On a non-success status the
/// body is read and classified: 429 becomes [`ApiError::RateLimited`] with
/// `Retry-After` parsed (keeping the problem body when one was sent),
/// problem details bodies (RFC 9457) become [`ApiError::Problem`],
/// everything else [`ApiError::Api`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status().as_u16();
    let retry_after = (status == 429).then(|| parse_retry_after(&resp));
    let body = resp.text().await.unwrap_or_default();

    let problem = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .filter(looks_like_problem)
        .and_then(|value| serde_json::from_value::<ProblemDetails>(value).ok());

    if let Some(retry_after_secs) = retry_after {
        return Err(ApiError::RateLimited {
            retry_after_secs,
            problem,
        });
    }
    if let Some(problem) = problem {
        return Err(ApiError::Problem(problem));
    }
    Err(ApiError::Api {
        status,
        message: body,
    })
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Decode a success envelope, requiring `data` to be present.
pub async fn read_data<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let envelope: Envelope<T> = resp.json().await?;
    envelope
        .data
        .ok_or_else(|| ApiError::Parse("response envelope carried null data".to_string()))
}

/// Decode a success envelope, returning `data` and the envelope metadata.
pub async fn read_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Envelope<T>, ApiError> {
    Ok(resp.json().await?)
}
