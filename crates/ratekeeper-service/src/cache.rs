//! Snapshot read/write shared by both services. Cache failures never reach
//! the caller: a failed read is a miss, a failed write is logged.

use chrono::{DateTime, Utc};
use ratekeeper_store::{RatesSnapshot, SnapshotStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Decoded snapshot under `key`, or `None` on miss, empty payload, read
/// error or undecodable payload.
pub(crate) async fn read<T: DeserializeOwned>(
    store: Option<&dyn SnapshotStore>,
    key: &str,
) -> Option<T> {
    let store = store?;
    let snapshot = match store.get_snapshot(key).await {
        Ok(Some(snapshot)) if !snapshot.is_empty() => snapshot,
        Ok(_) => return None,
        Err(e) => {
            warn!(key, error = %e, "snapshot read failed, treating as miss");
            return None;
        }
    };
    match serde_json::from_slice(&snapshot.payload) {
        Ok(value) => {
            debug!(key, fetched_at = %snapshot.fetched_at, "cache hit");
            Some(value)
        }
        Err(e) => {
            warn!(key, error = %e, "snapshot payload undecodable, re-extracting");
            None
        }
    }
}

/// Best-effort write-back of `value` under `key`.
pub(crate) async fn write<T: Serialize>(
    store: Option<&dyn SnapshotStore>,
    key: &str,
    value: &T,
    fetched_at: DateTime<Utc>,
) {
    let Some(store) = store else {
        return;
    };
    let payload = match serde_json::to_vec(value) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(key, error = %e, "could not encode snapshot");
            return;
        }
    };
    let bytes = payload.len();
    match store
        .save_snapshot(RatesSnapshot::new(key, payload, fetched_at))
        .await
    {
        Ok(()) => debug!(key, bytes, "snapshot written"),
        Err(e) => warn!(key, error = %e, "snapshot write failed, serving uncached"),
    }
}
