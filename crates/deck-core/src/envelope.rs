//! Success response envelope shared by the server and the API client.
//!
//! Every successful response is `{data, metaData: {message, status,
//! timestamp, responseCode, pagination?}}`. Errors never use this shape;
//! they are RFC 9457 problem details (see [`crate::problem`]).

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Derive the full pagination block from a page window and total count.
    #[must_use]
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total_count.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            page_size,
            total_count,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// `metaData` block of the envelope.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub message: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub response_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Success envelope wrapping `data`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub meta_data: ResponseMeta,
}

impl<T> Envelope<T> {
    fn build(
        data: Option<T>,
        message: &str,
        status: &str,
        response_code: u16,
        pagination: Option<Pagination>,
    ) -> Self {
        Self {
            data,
            meta_data: ResponseMeta {
                message: message.to_string(),
                status: status.to_string(),
                timestamp: Utc::now(),
                response_code,
                pagination,
            },
        }
    }

    /// 200 envelope.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self::build(Some(data), "Success", "OK", 200, None)
    }

    /// 201 envelope.
    #[must_use]
    pub fn created(data: T) -> Self {
        Self::build(Some(data), "Created", "CREATED", 201, None)
    }

    /// 200 envelope carrying pagination metadata.
    #[must_use]
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self::build(Some(data), "Success", "OK", 200, Some(pagination))
    }

    /// 204 envelope with empty data.
    #[must_use]
    pub fn no_content() -> Self {
        Self::build(None, "Success", "OK", 204, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pagination_math() {
        let p = Pagination::new(2, 5, 12);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let first = Pagination::new(1, 5, 12);
        assert!(!first.has_prev);
        let last = Pagination::new(3, 5, 12);
        assert!(!last.has_next);

        let empty = Pagination::new(1, 5, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn envelope_wire_shape_is_camel_case() {
        let envelope = Envelope::paginated(vec![1, 2, 3], Pagination::new(1, 5, 3));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["metaData"]["responseCode"], 200);
        assert_eq!(value["metaData"]["status"], "OK");
        assert_eq!(value["metaData"]["pagination"]["pageSize"], 5);
        assert_eq!(value["metaData"]["pagination"]["hasNext"], false);
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn no_content_has_null_data() {
        let envelope = Envelope::<()>::no_content();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["metaData"]["responseCode"], 204);
    }
}
