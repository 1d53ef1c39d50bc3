//! Processing session orchestration.
//!
//! A session verifies one document against one checklist. Two consumption
//! modes share the same pipeline: `run_collected` returns a full report,
//! `stream` emits `SessionEvent`s over a channel as items settle. In both,
//! the document text is loaded once, every checklist item gets a result,
//! and per-item failures never abort the session.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::checklist::{ChecklistDefinition, ChecklistItemDefinition, ChecklistStore};
use crate::config::VerifyConfig;
use crate::document::DocumentLoader;
use crate::verify::{run_batch, VerificationReport, VerificationResult, VerifyBackend};

use super::events::SessionEvent;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Session-fatal errors. Per-item verification failures are never errors;
/// these cover everything that prevents a session from starting or finishing.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Missing required parameters")]
    MissingParameters,

    #[error("No authentication token provided")]
    Unauthorized,

    #[error("Document file not found")]
    DocumentNotFound,

    #[error("Failed to load checklist: {0}")]
    ChecklistLoadError(String),

    #[error("Checklist not found: {0}")]
    ChecklistNotFound(String),

    #[error("Checklist has no items: {0}")]
    ChecklistEmpty(String),

    #[error("Processing failed: {0}")]
    Processing(String),
}

impl ProcessError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameters => "MISSING_PARAMETERS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            Self::ChecklistLoadError(_) => "CHECKLIST_LOAD_ERROR",
            Self::ChecklistNotFound(_) => "CHECKLIST_NOT_FOUND",
            Self::ChecklistEmpty(_) => "CHECKLIST_EMPTY",
            Self::Processing(_) => "PROCESSING_ERROR",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::MissingParameters | Self::ChecklistEmpty(_) => 400,
            Self::Unauthorized => 401,
            Self::DocumentNotFound | Self::ChecklistNotFound(_) => 404,
            Self::ChecklistLoadError(_) | Self::Processing(_) => 500,
        }
    }
}

/// A fully validated processing request: document exists, checklist loaded,
/// token present.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub filename: String,
    pub document_path: PathBuf,
    pub checklist: ChecklistDefinition,
    pub token: String,
}

/// Validate raw request parameters into a runnable session request.
///
/// The empty-items check lives here so both consumption modes reject a
/// degenerate checklist before any document I/O happens.
pub async fn validate_request(
    filename: Option<&str>,
    document_path: Option<&str>,
    checklist_id: Option<&str>,
    token: Option<&str>,
    store: &dyn ChecklistStore,
) -> Result<ValidatedRequest, ProcessError> {
    let (filename, document_path, checklist_id) = match (filename, document_path, checklist_id) {
        (Some(f), Some(p), Some(c)) if !f.is_empty() && !p.is_empty() && !c.is_empty() => (f, p, c),
        _ => return Err(ProcessError::MissingParameters),
    };

    let token = match token {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(ProcessError::Unauthorized),
    };

    let document_path = PathBuf::from(document_path);
    match tokio::fs::metadata(&document_path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(ProcessError::DocumentNotFound),
    }

    let checklist = store
        .load(checklist_id)
        .map_err(|e| ProcessError::ChecklistLoadError(e.to_string()))?
        .ok_or_else(|| ProcessError::ChecklistNotFound(checklist_id.to_string()))?;

    if checklist.items.is_empty() {
        return Err(ProcessError::ChecklistEmpty(checklist_id.to_string()));
    }

    Ok(ValidatedRequest {
        filename: filename.to_string(),
        document_path,
        checklist,
        token,
    })
}

/// Runs validated sessions against a fixed backend and loader.
pub struct VerificationSession {
    config: VerifyConfig,
    backend: Arc<VerifyBackend>,
    loader: DocumentLoader,
}

impl VerificationSession {
    pub fn new(config: VerifyConfig, backend: Arc<VerifyBackend>, loader: DocumentLoader) -> Self {
        Self {
            config,
            backend,
            loader,
        }
    }

    /// Run the whole session and return the report once every item settled.
    pub async fn run_collected(&self, request: &ValidatedRequest) -> VerificationReport {
        let loaded = self.loader.load(&request.document_path).await;
        let dispatch = dispatch_closure(
            Arc::clone(&self.backend),
            loaded.text.into(),
            request.token.as_str().into(),
        );
        let results = run_batch(
            &request.checklist.items,
            self.config.max_concurrency,
            dispatch,
            None,
        )
        .await;

        tracing::info!(
            checklist_id = %request.checklist.id,
            total = results.len(),
            "session complete"
        );
        VerificationReport::new(
            request.filename.clone(),
            request.document_path.display().to_string(),
            &request.checklist,
            results,
        )
    }

    /// Run the session in the background, emitting events as items settle.
    /// The returned receiver yields `processing` events for every item, one
    /// `result` per item, and exactly one terminal event.
    ///
    /// A dropped receiver stops event delivery but not the batch itself;
    /// in-flight verification calls run to completion.
    pub fn stream(&self, request: ValidatedRequest) -> mpsc::Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let backend = Arc::clone(&self.backend);
        let loader = self.loader.clone();
        let max_concurrency = self.config.max_concurrency;

        tokio::spawn(async move {
            let outcome =
                stream_session(backend, loader, max_concurrency, &request, tx.clone()).await;
            let terminal = match outcome {
                Ok(()) => SessionEvent::complete(&request.checklist),
                Err(e) => {
                    tracing::error!(error = %e, code = e.code(), "streaming session failed");
                    SessionEvent::Error {
                        error: e.to_string(),
                        code: Some(e.code().to_string()),
                        detail: None,
                    }
                }
            };
            let _ = tx.send(terminal).await;
        });

        rx
    }
}

async fn stream_session(
    backend: Arc<VerifyBackend>,
    loader: DocumentLoader,
    max_concurrency: usize,
    request: &ValidatedRequest,
    tx: mpsc::Sender<SessionEvent>,
) -> Result<(), ProcessError> {
    // Validation already rejects empty checklists; this guard covers callers
    // that construct a ValidatedRequest by hand.
    if request.checklist.items.is_empty() {
        return Err(ProcessError::ChecklistEmpty(request.checklist.id.clone()));
    }

    let loaded = loader.load(&request.document_path).await;

    for item in &request.checklist.items {
        if tx
            .send(SessionEvent::Processing { item_id: item.id })
            .await
            .is_err()
        {
            tracing::debug!("event receiver dropped before processing started");
            return Ok(());
        }
    }

    let (progress_tx, mut progress_rx) = mpsc::channel::<VerificationResult>(EVENT_CHANNEL_CAPACITY);
    let relay_tx = tx.clone();
    let relay = tokio::spawn(async move {
        while let Some(result) = progress_rx.recv().await {
            if relay_tx
                .send(SessionEvent::Result { data: result })
                .await
                .is_err()
            {
                break;
            }
        }
    });

    let dispatch = dispatch_closure(
        backend,
        loaded.text.into(),
        request.token.as_str().into(),
    );
    let results = run_batch(
        &request.checklist.items,
        max_concurrency,
        dispatch,
        Some(progress_tx),
    )
    .await;

    // All progress senders are gone once run_batch returns, so the relay
    // drains and exits before the terminal event is sent.
    let _ = relay.await;

    tracing::info!(
        checklist_id = %request.checklist.id,
        total = results.len(),
        "streaming session complete"
    );
    Ok(())
}

/// Per-item dispatch closure for the batch runner. Shared text and token go
/// behind `Arc<str>` so each spawned task gets a cheap owned handle.
fn dispatch_closure(
    backend: Arc<VerifyBackend>,
    text: Arc<str>,
    token: Arc<str>,
) -> impl Fn(ChecklistItemDefinition) -> futures_util::future::BoxFuture<'static, VerificationResult>
{
    move |item| {
        let backend = Arc::clone(&backend);
        let text = Arc::clone(&text);
        let token = Arc::clone(&token);
        Box::pin(async move { backend.verify(&token, &text, &item).await })
    }
}
