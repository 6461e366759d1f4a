//! Response envelopes
//!
//! Every endpoint wraps its payload in the same envelope: successful
//! responses carry `data` plus optional `meta`, failures carry a machine
//! readable `code` and a human readable `message`. Clients can branch on
//! the `success` flag without inspecting the status code first.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
        }
    }

    /// Success with side-channel information such as pagination.
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            meta: Some(meta),
            ..Self::success(data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        let mut response = Self::new(code, message);
        response.error.details = Some(details);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_absent_fields() {
        let body = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(body, json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_success_with_meta_keeps_meta() {
        let body =
            serde_json::to_value(ApiResponse::success_with_meta("x", json!({"total": 3})))
                .unwrap();
        assert_eq!(body["meta"]["total"], 3);
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "no such cargo")).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": {"code": "NOT_FOUND", "message": "no such cargo"}
            })
        );
    }

    #[test]
    fn test_error_details_are_carried() {
        let body = serde_json::to_value(ErrorResponse::with_details(
            "EXPECTATION_FAILED",
            "no cargo records were imported",
            json!({"failedImports": 4}),
        ))
        .unwrap();
        assert_eq!(body["error"]["details"]["failedImports"], 4);
    }
}
