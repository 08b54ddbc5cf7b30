//! Server-Sent Events support
//!
//! Each client first receives the current store snapshot, then every newer
//! snapshot interleaved with session lifecycle events.

use crate::runtime::SseEvent;
use crate::store::StoreSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_stream::StreamExt;

/// Merge store snapshots and lifecycle broadcasts into one SSE stream
pub fn sse_stream(
    snapshots: watch::Receiver<Arc<StoreSnapshot>>,
    broadcast_rx: broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // WatchStream yields the current value first, then each change
    let snapshots = WatchStream::new(snapshots)
        .map(|snapshot| Ok::<_, Infallible>(snapshot_to_axum(&snapshot)));

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(sse_event_to_axum(&event))),
        Err(_) => None, // Skip lagged messages
    });

    Sse::new(snapshots.merge(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn snapshot_to_axum(snapshot: &StoreSnapshot) -> Event {
    let data = serde_json::to_value(snapshot).unwrap_or(Value::Null);
    Event::default().event("snapshot").data(data.to_string())
}

fn sse_event_to_axum(event: &SseEvent) -> Event {
    let data = serde_json::to_value(event).unwrap_or(Value::Null);
    Event::default()
        .event(event.event_type())
        .data(data.to_string())
}
