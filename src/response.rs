//! Engine response wrapper.

use crate::error::Result;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A response from the engine: HTTP status plus parsed JSON body.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    body: Value,
}

impl Response {
    pub(crate) fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if the engine reported an error: non-2xx status or an `error`
    /// key in the body.
    pub fn has_error(&self) -> bool {
        !self.is_success() || self.body.get("error").is_some()
    }

    /// Get the response body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consume the response and return the body.
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Deserialize the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// The `_version` assigned by the engine on a write, if present.
    pub fn version(&self) -> Option<i64> {
        self.body.get("_version").and_then(|v| v.as_i64())
    }

    /// Whether the engine acknowledged the operation. Reads `acknowledged`,
    /// falling back to the legacy `ok` flag.
    pub fn acknowledged(&self) -> bool {
        self.body
            .get("acknowledged")
            .or_else(|| self.body.get("ok"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// The engine's error reason, if the body carries one. Handles both the
    /// bare-string and `{type, reason}` error shapes.
    pub fn error_reason(&self) -> Option<&str> {
        let error = self.body.get("error")?;
        error
            .as_str()
            .or_else(|| error.get("reason").and_then(|r| r.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_accessor() {
        let response = Response::new(StatusCode::OK, json!({ "_id": "1", "_version": 3 }));
        assert_eq!(response.version(), Some(3));
        assert!(!response.has_error());
    }

    #[test]
    fn test_acknowledged_falls_back_to_ok() {
        let legacy = Response::new(StatusCode::OK, json!({ "ok": true }));
        assert!(legacy.acknowledged());

        let current = Response::new(StatusCode::OK, json!({ "acknowledged": true }));
        assert!(current.acknowledged());

        let neither = Response::new(StatusCode::OK, json!({}));
        assert!(!neither.acknowledged());
    }

    #[test]
    fn test_error_reason_shapes() {
        let bare = Response::new(
            StatusCode::NOT_FOUND,
            json!({ "error": "IndexMissingException[[missing] missing]", "status": 404 }),
        );
        assert!(bare.has_error());
        assert_eq!(
            bare.error_reason(),
            Some("IndexMissingException[[missing] missing]")
        );

        let structured = Response::new(
            StatusCode::BAD_REQUEST,
            json!({ "error": { "type": "mapper_parsing_exception", "reason": "failed to parse" } }),
        );
        assert_eq!(structured.error_reason(), Some("failed to parse"));
    }
}
