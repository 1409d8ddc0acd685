//! Fire-and-forget delivery of session records to the backend.
//!
//! Operations are queued in local storage and drained on a timer, so a dead
//! or unreachable backend never blocks the wheel. Failed deliveries retry
//! with exponential backoff and are dropped after too many attempts.

use gloo::events::EventListener;
use gloo_net::http::Request;
use gloo_timers::callback::Interval;
use serde::{Deserialize, Serialize};
use shared::constants::{SYNC_FLUSH_INTERVAL_MS, SYNC_MAX_ATTEMPTS};
use shared::session::sync_backoff_ms;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;

use crate::config::get_api_base_url;

const QUEUE_KEY: &str = "wheel_sync_queue";

#[derive(Serialize, Deserialize, Clone)]
struct PendingOp {
    id: Uuid,
    path: String,
    body: serde_json::Value,
    attempts: u32,
    not_before_ms: f64,
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn load_queue() -> Vec<PendingOp> {
    local_storage()
        .and_then(|s| s.get_item(QUEUE_KEY).ok().flatten())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn save_queue(queue: &[PendingOp]) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(queue) {
        Ok(json) => {
            if storage.set_item(QUEUE_KEY, &json).is_err() {
                log::warn!("Failed to persist sync queue");
            }
        }
        Err(e) => log::warn!("Failed to serialize sync queue: {}", e),
    }
}

/// Queues a POST to `/api{path}` for the next flush.
pub fn enqueue<T: Serialize>(path: &str, body: &T) {
    let body = match serde_json::to_value(body) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Dropping unserializable sync op for {}: {}", path, e);
            return;
        }
    };
    let mut queue = load_queue();
    queue.push(PendingOp {
        id: Uuid::new_v4(),
        path: path.to_string(),
        body,
        attempts: 0,
        not_before_ms: 0.0,
    });
    save_queue(&queue);
}

async fn deliver(op: &PendingOp) -> bool {
    let url = format!("{}/api{}", get_api_base_url(), op.path);
    let request = match Request::post(&url).json(&op.body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Failed to build sync request for {}: {}", op.path, e);
            return false;
        }
    };
    match request.send().await {
        Ok(response) if response.ok() => true,
        Ok(response) => {
            log::warn!("Sync to {} returned status {}", op.path, response.status());
            false
        }
        Err(e) => {
            log::warn!("Sync to {} failed: {}", op.path, e);
            false
        }
    }
}

/// Appends to `processed` any stored op that was not part of the flush
/// snapshot. Enqueues can interleave with the awaits inside a flush, and
/// those ops must survive the final save.
fn merge_unseen(
    mut processed: Vec<PendingOp>,
    stored: Vec<PendingOp>,
    snapshot_ids: &[Uuid],
) -> Vec<PendingOp> {
    for op in stored {
        if !snapshot_ids.contains(&op.id) {
            processed.push(op);
        }
    }
    processed
}

/// Attempts every due operation once, rescheduling or dropping failures.
pub async fn flush() {
    let snapshot = load_queue();
    if snapshot.is_empty() {
        return;
    }
    let snapshot_ids: Vec<Uuid> = snapshot.iter().map(|op| op.id).collect();

    let now = js_sys::Date::now();
    let mut remaining = Vec::new();
    for mut op in snapshot {
        if op.not_before_ms > now {
            remaining.push(op);
            continue;
        }
        if deliver(&op).await {
            continue;
        }
        op.attempts += 1;
        if op.attempts >= SYNC_MAX_ATTEMPTS {
            log::warn!(
                "Dropping sync op for {} after {} attempts",
                op.path,
                op.attempts
            );
            continue;
        }
        op.not_before_ms = now + sync_backoff_ms(op.attempts) as f64;
        remaining.push(op);
    }

    save_queue(&merge_unseen(remaining, load_queue(), &snapshot_ids));
}

/// Keeps the queue draining while it is alive. Dropping it stops the timer
/// and unhooks the reconnect listener.
pub struct SyncHandle {
    _interval: Interval,
    _on_online: Option<EventListener>,
}

/// Starts the background flush timer and flushes again whenever the browser
/// reports connectivity coming back.
pub fn start() -> SyncHandle {
    let interval = Interval::new(SYNC_FLUSH_INTERVAL_MS, || spawn_local(flush()));
    let on_online = web_sys::window()
        .map(|window| EventListener::new(&window, "online", |_| spawn_local(flush())));
    SyncHandle {
        _interval: interval,
        _on_online: on_online,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op(path: &str) -> PendingOp {
        PendingOp {
            id: Uuid::new_v4(),
            path: path.to_string(),
            body: json!({}),
            attempts: 0,
            not_before_ms: 0.0,
        }
    }

    #[test]
    fn ops_enqueued_mid_flush_survive_the_save() {
        let retried = op("/sessions");
        let snapshot_ids = vec![retried.id];
        let late = op("/spins");
        let stored = vec![retried.clone(), late.clone()];

        let merged = merge_unseen(vec![retried.clone()], stored, &snapshot_ids);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, retried.id);
        assert_eq!(merged[1].id, late.id);
    }

    #[test]
    fn delivered_ops_are_not_resurrected() {
        let delivered = op("/sessions");
        let merged = merge_unseen(Vec::new(), vec![delivered.clone()], &[delivered.id]);
        assert!(merged.is_empty());
    }
}
