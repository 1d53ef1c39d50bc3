//! Checklist CRUD and LLM-assisted generation routes.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{bearer_token, ApiContext, SuccessBody};
use crate::checklist::generate::{
    generate_items, simulate_generation, GenerateRequest, GeneratedItem,
};
use crate::checklist::{ChecklistDefinition, ChecklistInput, ChecklistSummary};
use crate::session::ProcessError;

pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<SuccessBody<Vec<ChecklistSummary>>>, ApiError> {
    let checklists = ctx.store.list()?;
    Ok(Json(SuccessBody::new(checklists)))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(input): Json<ChecklistInput>,
) -> Result<Json<SuccessBody<ChecklistDefinition>>, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Checklist name is required".into()));
    }
    let saved = ctx.store.save(input)?;
    tracing::info!(checklist_id = %saved.id, name = %saved.name, "checklist saved");
    Ok(Json(SuccessBody::new(saved)))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody<ChecklistDefinition>>, ApiError> {
    let checklist = ctx
        .store
        .load(&id)?
        .ok_or(ApiError::Process(ProcessError::ChecklistNotFound(id)))?;
    Ok(Json(SuccessBody::new(checklist)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(mut input): Json<ChecklistInput>,
) -> Result<Json<SuccessBody<ChecklistDefinition>>, ApiError> {
    if ctx.store.load(&id)?.is_none() {
        return Err(ApiError::Process(ProcessError::ChecklistNotFound(id)));
    }
    input.id = Some(id);
    let saved = ctx.store.save(input)?;
    Ok(Json(SuccessBody::new(saved)))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody<Deleted>>, ApiError> {
    if !ctx.store.delete(&id)? {
        return Err(ApiError::Process(ProcessError::ChecklistNotFound(id)));
    }
    tracing::info!(checklist_id = %id, "checklist deleted");
    Ok(Json(SuccessBody::new(Deleted { deleted: true })))
}

#[derive(Debug, Serialize)]
pub struct GeneratedItems {
    pub items: Vec<GeneratedItem>,
}

/// Generate checklist items for a document type. The real backend needs a
/// bearer token; the simulated backend serves canned pools without one.
pub async fn generate(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<SuccessBody<GeneratedItems>>, ApiError> {
    let items = if ctx.config.verify.use_real_api {
        let token = bearer_token(&headers)
            .ok_or(ApiError::Process(ProcessError::Unauthorized))?;
        generate_items(
            ctx.llm.as_ref(),
            &token,
            &request,
            ctx.config.verify.generate_timeout_secs,
        )
        .await?
    } else {
        simulate_generation(request.document_type(), request.item_count())
    };

    tracing::info!(
        document_type = request.document_type(),
        count = items.len(),
        "generated checklist items"
    );
    Ok(Json(SuccessBody::new(GeneratedItems { items })))
}
