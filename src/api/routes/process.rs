//! Document processing routes.
//!
//! `POST /api/process` runs a full session and returns the report in one
//! response. `GET /api/process` runs the same session over SSE, emitting
//! events as items settle. `EventSource` cannot set request headers, so the
//! GET route also accepts the token as a `token` query parameter.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::stream::Stream;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{bearer_token, ApiContext, SuccessBody};
use crate::session::{validate_request, SessionEvent};
use crate::verify::VerificationReport;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBody {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub document_path: Option<String>,
    #[serde(default)]
    pub checklist_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessQuery {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub document_path: Option<String>,
    #[serde(default)]
    pub checklist_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

pub async fn collected(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Json(body): Json<ProcessBody>,
) -> Result<Json<SuccessBody<VerificationReport>>, ApiError> {
    let token = bearer_token(&headers);
    let request = validate_request(
        body.filename.as_deref(),
        body.document_path.as_deref(),
        body.checklist_id.as_deref(),
        token.as_deref(),
        ctx.store.as_ref(),
    )
    .await?;

    tracing::info!(
        filename = %request.filename,
        checklist_id = %request.checklist.id,
        items = request.checklist.items.len(),
        "processing document"
    );
    let report = ctx.session.run_collected(&request).await;
    Ok(Json(SuccessBody::new(report)))
}

pub async fn streamed(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    Query(query): Query<ProcessQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>>, ApiError> {
    let token = bearer_token(&headers).or(query.token.clone());
    let request = validate_request(
        query.filename.as_deref(),
        query.document_path.as_deref(),
        query.checklist_id.as_deref(),
        token.as_deref(),
        ctx.store.as_ref(),
    )
    .await?;

    tracing::info!(
        filename = %request.filename,
        checklist_id = %request.checklist.id,
        items = request.checklist.items.len(),
        "processing document over SSE"
    );
    let rx = ctx.session.stream(request);

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Ok(to_sse_event(&event)), rx))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &SessionEvent) -> Event {
    match serde_json::to_value(event) {
        Ok(json) => Event::default().data(json.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize session event");
            Event::default().data(
                serde_json::json!({"type": "error", "error": "event serialization failed"})
                    .to_string(),
            )
        }
    }
}
