//! Progress events emitted while a bulk search runs.

use std::time::Duration;

use leadscan_core::LeadRecord;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::orchestrator::RunStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub found: usize,
    pub target: usize,
}

/// One streamed event. Serialized with a `type` discriminator, e.g.
/// `{"type":"lead","data":{...},"progress":{"found":1,"target":5}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    Status {
        run_id: Uuid,
        message: String,
        page: u32,
        scanned: usize,
        found: usize,
    },
    Lead {
        data: Box<LeadRecord>,
        progress: Progress,
    },
    Complete {
        run_id: Uuid,
        status: RunStatus,
        total_found: usize,
        total_scanned: usize,
        pages_fetched: u32,
    },
    Error {
        message: String,
    },
    Keepalive,
}

/// Receives the next event, yielding [`SearchEvent::Keepalive`] whenever
/// nothing arrives within `interval`. Returns `None` once every sender has
/// been dropped and the channel is drained.
pub async fn next_with_keepalive(
    rx: &mut mpsc::Receiver<SearchEvent>,
    interval: Duration,
) -> Option<SearchEvent> {
    match tokio::time::timeout(interval, rx.recv()).await {
        Ok(event) => event,
        Err(_) => Some(SearchEvent::Keepalive),
    }
}
