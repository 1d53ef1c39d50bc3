//! Shared API state and helpers.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::checklist::ChecklistStore;
use crate::config::AppConfig;
use crate::session::VerificationSession;
use crate::verify::LlmEndpointClient;

/// Shared state handed to every handler via `State`.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ChecklistStore>,
    pub session: Arc<VerificationSession>,
    pub llm: Arc<LlmEndpointClient>,
}

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct SuccessBody<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessBody<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Extract a bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
