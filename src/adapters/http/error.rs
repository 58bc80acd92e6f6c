//! API error handling.
//!
//! Every failure is rendered as `{"success": false, "error": "..."}`. Upstream
//! details of 5xx errors stay in the server log.

use crate::domain::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = ErrorResponse {
            success: false,
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::BadRequest(msg),
            DomainError::ExtractionUnavailable(_) => Self::Internal("AI processing failed".to_string()),
            DomainError::SinkUnavailable(_) => {
                Self::Internal("Failed to create task in sheets".to_string())
            }
            DomainError::ExtractionMalformed(_) | DomainError::Config(_) => {
                Self::Internal("An internal error occurred".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request_with_plain_message() {
        let err = ApiError::from(DomainError::InvalidInput("too short".to_string()));
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "too short"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_hide_details() {
        let err = ApiError::from(DomainError::ExtractionUnavailable(
            "401 invalid api key sk-abc".to_string(),
        ));
        assert!(matches!(err, ApiError::Internal(ref m) if m == "AI processing failed"));

        let err = ApiError::from(DomainError::SinkUnavailable("403 forbidden".to_string()));
        assert!(matches!(err, ApiError::Internal(ref m) if m == "Failed to create task in sheets"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_serialization() {
        let resp = ErrorResponse {
            success: false,
            error: "boom".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"boom"}"#);
    }
}
