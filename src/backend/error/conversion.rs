/**
 * Error Conversion
 *
 * This module converts backend errors into HTTP responses, and request
 * extraction failures into backend errors.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "success": false,
 *   "message": "Error message",
 *   "status": 400
 * }
 * ```
 */

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    /// Convert a backend error into a JSON error response
    ///
    /// 5xx errors are logged with their full detail here, so handlers can
    /// propagate them with `?` without logging first.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_internal() {
            tracing::error!("Request failed: {}", self);
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for BackendError {
    /// Malformed, mistyped or non-JSON bodies are all client errors
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        BackendError::validation("Invalid request body")
    }
}
