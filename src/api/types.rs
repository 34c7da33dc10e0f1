//! API query and error types.

use serde::{Deserialize, Serialize};

/// Optional range query parameters for the hourly endpoint.
#[derive(Debug, Deserialize)]
pub struct HourlyQuery {
    /// First hour (inclusive).
    pub from: Option<usize>,
    /// Last hour (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_shape() {
        let body = serde_json::to_value(ErrorResponse {
            error: "bad range".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "error": "bad range" }));
    }

    #[test]
    fn hourly_query_fields_are_optional() {
        let q: HourlyQuery = serde_json::from_str(r#"{"from": 3}"#).unwrap();
        assert_eq!(q.from, Some(3));
        assert_eq!(q.to, None);
    }
}
