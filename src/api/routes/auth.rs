//! Token validation route.
//!
//! Format-level validation only: a live probe against the serving endpoint
//! would spend quota on every login attempt. Tokens of a plausible shape are
//! accepted and fail loudly at first use instead.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;

const MIN_TOKEN_LENGTH: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ValidateTokenBody {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub success: bool,
    pub message: String,
}

pub async fn validate_token(
    Json(body): Json<ValidateTokenBody>,
) -> Result<Json<ValidateTokenResponse>, ApiError> {
    let token = body.token.unwrap_or_default();
    if token.len() < MIN_TOKEN_LENGTH {
        return Err(ApiError::BadRequest("Invalid token format".into()));
    }

    if !plausible_token(&token) {
        return Err(ApiError::Unauthorized("Invalid API token".into()));
    }

    Ok(Json(ValidateTokenResponse {
        success: true,
        message: "Token validated successfully".to_string(),
    }))
}

/// Platform tokens start with `dapi`; anything else must at least be long
/// enough to be a credential.
fn plausible_token(token: &str) -> bool {
    token.starts_with("dapi") || token.len() > 20
}
