//! Process-local snapshot store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::trace;

use crate::{RatesSnapshot, SnapshotStore, StoreError};

/// Snapshots held in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: RwLock<HashMap<String, RatesSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn get_snapshot(&self, provider: &str) -> Result<Option<RatesSnapshot>, StoreError> {
        let hit = self
            .snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(provider)
            .cloned();
        trace!(provider, hit = hit.is_some(), "memory snapshot read");
        Ok(hit)
    }

    async fn save_snapshot(&self, snapshot: RatesSnapshot) -> Result<(), StoreError> {
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(snapshot.provider.clone(), snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_snapshot("cemc").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemoryStore::new();
        store
            .save_snapshot(RatesSnapshot::new("nes", b"first".to_vec(), Utc::now()))
            .await
            .unwrap();
        store
            .save_snapshot(RatesSnapshot::new("nes", b"second".to_vec(), Utc::now()))
            .await
            .unwrap();

        let snap = store.get_snapshot("nes").await.unwrap().unwrap();
        assert_eq!(snap.payload, b"second");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = MemoryStore::new();
        store
            .save_snapshot(RatesSnapshot::new("whud", b"electric?".to_vec(), Utc::now()))
            .await
            .unwrap();
        assert!(store.get_snapshot("water:whud").await.unwrap().is_none());
    }
}
