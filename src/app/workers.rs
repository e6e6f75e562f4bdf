use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{ApplyOutcome, ListEngine};
use crate::error::EngineError;
use crate::sources::PagedListSource;
use crate::state::{FetchRequest, PageResponse};

/// What: Spawn the background worker that runs page requests.
///
/// Inputs:
/// - `source`: Paged list source shared with the spawned fetches.
/// - `request_rx`: Refetch events from the engine's dispatcher.
/// - `response_tx`: Channel receiving tagged responses for `apply_response`.
///
/// Output:
/// - Handle of the worker task; it ends when `request_rx` closes.
///
/// Details:
/// - Each request runs in its own task so a slow page does not block newer ones.
/// - A request from a newer filter generation aborts fetches still running for
///   older generations; their responses would be discarded as stale anyway.
/// - Responses carry the request tag unchanged so the engine can classify them.
pub fn spawn_fetch_worker<S>(
    source: Arc<S>,
    mut request_rx: mpsc::UnboundedReceiver<FetchRequest>,
    response_tx: mpsc::UnboundedSender<PageResponse<S::Item>>,
) -> JoinHandle<()>
where
    S: PagedListSource + 'static,
{
    tokio::spawn(async move {
        let mut generation = 0u64;
        let mut in_flight: Vec<JoinHandle<()>> = Vec::new();
        while let Some(request) = request_rx.recv().await {
            in_flight.retain(|h| !h.is_finished());
            let request_generation = request.tag.context.generation;
            if request_generation > generation {
                if !in_flight.is_empty() {
                    tracing::debug!(
                        aborted = in_flight.len(),
                        generation = request_generation,
                        "cancelling fetches of previous filter context"
                    );
                }
                for handle in in_flight.drain(..) {
                    handle.abort();
                }
                generation = request_generation;
            }
            let src = Arc::clone(&source);
            let tx = response_tx.clone();
            in_flight.push(tokio::spawn(async move {
                let tag = request.tag;
                let result = src.fetch_page(request.query).await;
                if let Err(e) = &result {
                    tracing::warn!(error = %e, request_id = tag.request_id, "page fetch failed");
                }
                let _ = tx.send(PageResponse { tag, result });
            }));
        }
        tracing::debug!(pending = in_flight.len(), "fetch worker stopped");
    })
}

/// What: Run one request against `source` and apply the result in place.
///
/// Details:
/// - Convenience for callers that await fetches inline instead of running a worker.
///
/// # Errors
/// - `EngineError::Remote` when the source fails.
pub async fn fetch_and_apply<S>(
    engine: &mut ListEngine<S::Item>,
    source: &S,
    request: FetchRequest,
) -> Result<ApplyOutcome, EngineError>
where
    S: PagedListSource + ?Sized,
{
    let tag = request.tag;
    let result = source.fetch_page(request.query).await;
    engine.apply_response(PageResponse { tag, result })
}
