//! RFC 9457 problem details, the only error body shape on the wire.
//!
//! The client's error branch must distinguish a problem body from the
//! success envelope; [`looks_like_problem`] mirrors that type guard.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Machine-readable problem codes used in the `code` extension.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// One field-level validation failure, carried in the `invalidParams`
/// extension of a 400 problem.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InvalidParam {
    pub name: String,
    pub reason: String,
}

/// RFC 9457 Problem Details body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type", default = "default_type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_params: Option<Vec<InvalidParam>>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

fn default_type() -> String {
    "about:blank".to_string()
}

impl ProblemDetails {
    /// A minimal problem with the given title and HTTP status.
    #[must_use]
    pub fn new(title: impl Into<String>, status: u16) -> Self {
        Self {
            type_: default_type(),
            title: title.into(),
            status,
            detail: None,
            instance: None,
            code: None,
            request_id: None,
            trace_id: None,
            invalid_params: None,
            extensions: Map::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    #[must_use]
    pub fn with_invalid_params(mut self, params: Vec<InvalidParam>) -> Self {
        self.invalid_params = Some(params);
        self
    }
}

/// Type guard: does this JSON value look like a problem details body rather
/// than a success envelope? Checks for `title` plus a numeric `status`,
/// matching the shape contract rather than the content type header.
#[must_use]
pub fn looks_like_problem(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("title") && obj.get("status").is_some_and(Value::is_number))
}
