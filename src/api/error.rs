//! API error responses.
//!
//! Every failure returns `{ "success": false, "error": ..., "code": ... }`
//! with an HTTP status matching the code, so clients can branch on `code`
//! without parsing error prose.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::checklist::generate::GenerateError;
use crate::checklist::ChecklistError;
use crate::session::ProcessError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Process(e) => (
                StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                e.code(),
            ),
            Self::Checklist(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CHECKLIST_LOAD_ERROR"),
            Self::Generate(GenerateError::Timeout) => (StatusCode::GATEWAY_TIMEOUT, "LLM_TIMEOUT"),
            Self::Generate(GenerateError::Endpoint(_)) => {
                (StatusCode::BAD_GATEWAY, "LLM_GENERATION_FAILED")
            }
            Self::Generate(GenerateError::Unparseable) => {
                (StatusCode::BAD_GATEWAY, "LLM_INVALID_RESPONSE")
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "API request failed");
        }
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            code,
            detail: None,
        };
        (status, Json(body)).into_response()
    }
}
