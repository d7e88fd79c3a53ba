use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::StoreError;

/// Last successfully computed payload for one cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesSnapshot {
    /// Cache key: the bare provider key for electric, `water:<key>` for water.
    pub provider: String,
    /// Serialized response, byte-for-byte as the service wrote it.
    pub payload: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

impl RatesSnapshot {
    pub fn new(provider: impl Into<String>, payload: Vec<u8>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            provider: provider.into(),
            payload,
            fetched_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Key → snapshot persistence.
///
/// Implementations only need read-your-last-write per key; the last writer
/// wins when two saves race.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved under `provider`.
    async fn get_snapshot(&self, provider: &str) -> Result<Option<RatesSnapshot>, StoreError>;

    /// Insert or replace the snapshot under `snapshot.provider`.
    async fn save_snapshot(&self, snapshot: RatesSnapshot) -> Result<(), StoreError>;
}
