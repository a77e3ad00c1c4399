//! Search worker thread
//!
//! Runs searches off the main thread so the UI stays interactive while a
//! request is in flight. A single dedicated thread with a current-thread
//! tokio runtime receives requests over a channel, performs the async HTTP
//! round-trip, and sends outcomes back tagged with their request token.
//!
//! There is no explicit cancellation: a superseded request simply runs to
//! completion and its outcome is dropped at the session boundary.

use std::sync::mpsc::{Receiver, Sender};

use super::client::BackendClient;
use super::session_state::{SearchOutcome, SearchRequest};

/// Spawn the search worker thread
///
/// The thread exits when the request channel closes.
pub fn spawn_worker(
    client: BackendClient,
    request_rx: Receiver<SearchRequest>,
    response_tx: Sender<SearchOutcome>,
) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create search worker runtime: {}", e);
                return;
            }
        };
        rt.block_on(worker_loop(client, request_rx, response_tx));
    });
}

/// Process requests until the channel is closed
///
/// Blocking recv() is fine here since we're in a dedicated thread.
async fn worker_loop(
    client: BackendClient,
    request_rx: Receiver<SearchRequest>,
    response_tx: Sender<SearchOutcome>,
) {
    while let Ok(request) = request_rx.recv() {
        log::debug!(
            "Search request {} for {:?} against {}",
            request.request_id,
            request.query,
            client.endpoint()
        );

        let result = client.search(&request.query, &request.file).await;

        if response_tx
            .send(SearchOutcome {
                request_id: request.request_id,
                result,
            })
            .is_err()
        {
            // Main thread disconnected
            return;
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
