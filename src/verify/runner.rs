//! Bounded-concurrency batch runner.
//!
//! Items run in slices of `max_concurrency`: every task in a slice is
//! spawned, then the whole slice is joined before the next slice starts.
//! Results are collected in input order regardless of completion order.
//! Progress notifications fire per-settle from inside each task, so a
//! listener sees results as they land, not when the slice joins.
//!
//! A panicking task is contained to its own item: the `JoinError` becomes a
//! synthesized `failed` result and the rest of the batch proceeds.

use std::future::Future;

use tokio::sync::mpsc;

use super::types::VerificationResult;
use crate::checklist::ChecklistItemDefinition;

/// Run `dispatch` over every item with at most `max_concurrency` in flight.
pub async fn run_batch<F, Fut>(
    items: &[ChecklistItemDefinition],
    max_concurrency: usize,
    dispatch: F,
    progress: Option<mpsc::Sender<VerificationResult>>,
) -> Vec<VerificationResult>
where
    F: Fn(ChecklistItemDefinition) -> Fut,
    Fut: Future<Output = VerificationResult> + Send + 'static,
{
    let concurrency = max_concurrency.max(1);
    let mut results = Vec::with_capacity(items.len());

    for slice in items.chunks(concurrency) {
        let handles: Vec<_> = slice
            .iter()
            .map(|item| {
                let future = dispatch(item.clone());
                let progress = progress.clone();
                tokio::spawn(async move {
                    let result = future.await;
                    if let Some(tx) = &progress {
                        // Receiver gone means the listener disconnected;
                        // keep computing so the batch still completes.
                        let _ = tx.send(result.clone()).await;
                    }
                    result
                })
            })
            .collect();

        for (handle, item) in handles.into_iter().zip(slice) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(join_err) => {
                    tracing::error!(item_id = item.id, error = %join_err, "verification task aborted");
                    let result = VerificationResult::failure(
                        item.id,
                        "Processing failed",
                        format!("Verification task aborted: {join_err}"),
                    );
                    if let Some(tx) = &progress {
                        let _ = tx.send(result.clone()).await;
                    }
                    results.push(result);
                }
            }
        }
    }

    results
}
