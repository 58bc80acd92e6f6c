//! Request handlers: status page, email processing, health check.

use axum::{
    Form, Json,
    body::Body,
    extract::{FromRequest, Multipart, Request, State, rejection::JsonRejection},
    http::{HeaderMap, header::CONTENT_TYPE},
    response::Html,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use super::{ApiError, state::AppState, templates};
use crate::domain::{DomainError, ExtractedRecord, MIN_EMAIL_CHARS, TaskReceipt};

/// Email text posted to `/process`, from a JSON body or a form field
/// (URL-encoded or multipart).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailSubmission {
    #[serde(default)]
    pub email_content: String,
}

fn invalid_submission() -> ApiError {
    ApiError::BadRequest(format!(
        "Email content is required and must be at least {} characters",
        MIN_EMAIL_CHARS
    ))
}

impl<S> FromRequest<S> for EmailSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let parsed = if is_multipart(&headers) {
            read_multipart(req, state).await
        } else if has_json_content_type(headers, state).await {
            Json::<Self>::from_request(req, state)
                .await
                .map(|Json(s)| s)
                .map_err(|e| e.body_text())
        } else {
            Form::<Self>::from_request(req, state)
                .await
                .map(|Form(s)| s)
                .map_err(|e| e.body_text())
        };

        parsed.map_err(|reason| {
            warn!(%reason, "rejected email submission body");
            invalid_submission()
        })
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

/// First `email_content` part of a multipart form; absent field reads as empty.
async fn read_multipart<S>(req: Request, state: &S) -> Result<EmailSubmission, String>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| e.body_text())?;
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        if field.name() == Some("email_content") {
            let email_content = field.text().await.map_err(|e| e.body_text())?;
            return Ok(EmailSubmission { email_content });
        }
    }
    Ok(EmailSubmission::default())
}

/// Runs axum's own `Json` content-type check against the headers only.
async fn has_json_content_type<S>(headers: HeaderMap, state: &S) -> bool
where
    S: Send + Sync,
{
    let mut headers_only = Request::new(Body::empty());
    *headers_only.headers_mut() = headers;
    !matches!(
        Json::<Value>::from_request(headers_only, state).await,
        Err(JsonRejection::MissingJsonContentType(_))
    )
}

/// Combined result of a processed email.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub extracted_data: ExtractedRecord,
    pub task_created: TaskReceipt,
    pub message: String,
}

/// `POST /process`: validate, extract, record.
pub async fn process_email(
    State(state): State<AppState>,
    submission: EmailSubmission,
) -> Result<Json<ProcessResponse>, ApiError> {
    match state.intake.process(&submission.email_content).await {
        Ok(processed) => Ok(Json(ProcessResponse {
            success: true,
            extracted_data: processed.extracted,
            task_created: processed.task,
            message: "Email processed successfully!".to_string(),
        })),
        Err(e) => {
            if matches!(e, DomainError::InvalidInput(_)) {
                warn!(error = %e, "rejected email submission");
            } else {
                error!(error = %e, "error processing email");
            }
            Err(e.into())
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mock_mode: bool,
    pub openai_configured: bool,
    pub sheets_configured: bool,
}

/// `GET /health`: configuration report, no side effects.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        mock_mode: state.status.mock_mode,
        openai_configured: state.status.openai_configured,
        sheets_configured: state.status.sheets_configured,
    })
}

/// `GET /`: status page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let view = templates::StatusView {
        mode: templates::mode_message(state.status.mock_mode).to_string(),
        openai_configured: state.status.openai_configured,
        sheets_configured: state.status.sheets_configured,
    };
    state.page.render(&view).map(Html).map_err(|e| {
        error!(error = %e, "status page rendering failed");
        ApiError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serialization() {
        let resp = HealthResponse {
            status: "healthy".to_string(),
            mock_mode: true,
            openai_configured: false,
            sheets_configured: false,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["mock_mode"], true);
        assert_eq!(json["openai_configured"], false);
    }

    #[test]
    fn submission_defaults_missing_field_to_empty() {
        let s: EmailSubmission = serde_json::from_str("{}").unwrap();
        assert!(s.email_content.is_empty());
    }
}
