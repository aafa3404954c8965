//! Correlation middleware.
//!
//! Every request gets a request id (echoed from `X-Request-ID` or
//! generated) and, when the caller sends one, a trace id parsed from the
//! W3C `traceparent` header or the legacy `X-Trace-ID` fallback. Both are
//! echoed on the response and attached to the request lifecycle logs.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";
const TRACEPARENT_HEADER: &str = "traceparent";

/// `traceparent` is `version-traceid-spanid-flags`; the trace id field is
/// 32 lowercase hex chars.
fn trace_id_from_traceparent(value: &str) -> Option<&str> {
    let mut fields = value.split('-');
    let _version = fields.next()?;
    let trace_id = fields.next()?;
    (trace_id.len() == 32 && trace_id.chars().all(|c| c.is_ascii_hexdigit()))
        .then_some(trace_id)
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string)
}

fn trace_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TRACEPARENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(trace_id_from_traceparent)
        .or_else(|| {
            headers
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
        })
        .map(ToString::to_string)
}

pub async fn correlation(request: Request, next: Next) -> Response {
    let request_id = request_id(request.headers());
    let trace_id = trace_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(%request_id, trace_id = ?trace_id, %method, %path, "request received");
    let mut response = next.run(request).await;
    tracing::debug!(%request_id, status = %response.status(), %method, %path, "request completed");

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    if let Some(trace_id) = trace_id {
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert(TRACE_ID_HEADER, value);
        }
    }
    response
}
