//! DuckDB-backed snapshot store.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::{Connection, OptionalExt, params};
use tracing::{debug, info};

use crate::{RatesSnapshot, SnapshotStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS rates_snapshots (
    provider   TEXT PRIMARY KEY,
    payload    BLOB NOT NULL,
    fetched_at TEXT NOT NULL
)";

/// One row per cache key in the `rates_snapshots` table.
///
/// Use [`open`](Self::open) for an in-memory database and
/// [`open_persistent`](Self::open_persistent) for a file that survives
/// restarts.
pub struct DuckStore {
    conn: Mutex<Connection>,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let store = Self::init(Connection::open(path)?)?;
        info!(path = %path.display(), snapshots = store.count()?, "opened snapshot store");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored snapshots.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let n: i64 = conn.query_row("SELECT count(*) FROM rates_snapshots", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[async_trait]
impl SnapshotStore for DuckStore {
    async fn get_snapshot(&self, provider: &str) -> Result<Option<RatesSnapshot>, StoreError> {
        let row: Option<(Vec<u8>, String)> = {
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.query_row(
                "SELECT payload, fetched_at FROM rates_snapshots WHERE provider = ?",
                [provider],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
        };

        let Some((payload, fetched_at)) = row else {
            return Ok(None);
        };
        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map_err(|_| StoreError::BadTimestamp {
                provider: provider.to_string(),
                value: fetched_at.clone(),
            })?
            .with_timezone(&Utc);
        Ok(Some(RatesSnapshot::new(provider, payload, fetched_at)))
    }

    async fn save_snapshot(&self, snapshot: RatesSnapshot) -> Result<(), StoreError> {
        let fetched_at = snapshot.fetched_at.to_rfc3339_opts(SecondsFormat::Nanos, true);
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            "INSERT OR REPLACE INTO rates_snapshots (provider, payload, fetched_at) VALUES (?, ?, ?)",
            params![snapshot.provider, snapshot.payload, fetched_at],
        )?;
        debug!(provider = %snapshot.provider, bytes = snapshot.payload.len(), "saved snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(provider: &str, payload: &[u8]) -> RatesSnapshot {
        RatesSnapshot::new(provider, payload.to_vec(), Utc::now())
    }

    #[tokio::test]
    async fn open_in_memory_is_empty() {
        let store = DuckStore::open().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.get_snapshot("cemc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_get_returns_same_bytes() {
        let store = DuckStore::open().unwrap();
        let snap = snapshot("cemc", br#"{"utility":"CEMC"}"#);
        store.save_snapshot(snap.clone()).await.unwrap();

        let got = store.get_snapshot("cemc").await.unwrap().unwrap();
        assert_eq!(got, snap);
    }

    #[tokio::test]
    async fn save_overwrites() {
        let store = DuckStore::open().unwrap();
        store.save_snapshot(snapshot("kub", b"old")).await.unwrap();
        store.save_snapshot(snapshot("kub", b"new")).await.unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let got = store.get_snapshot("kub").await.unwrap().unwrap();
        assert_eq!(got.payload, b"new");
    }

    // ── Persistent storage ──

    #[tokio::test]
    async fn open_persistent_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("rates.duckdb");
        assert!(!db_path.exists());

        let _store = DuckStore::open_persistent(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn snapshots_survive_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("rates.duckdb");

        let store = DuckStore::open_persistent(&db_path).unwrap();
        store
            .save_snapshot(snapshot("water:whud", b"payload"))
            .await
            .unwrap();
        drop(store);

        let store = DuckStore::open_persistent(&db_path).unwrap();
        let got = store.get_snapshot("water:whud").await.unwrap().unwrap();
        assert_eq!(got.payload, b"payload");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn unreadable_timestamp_is_an_error() {
        let store = DuckStore::open().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO rates_snapshots VALUES ('nes', 'x'::BLOB, 'yesterday')",
                [],
            )
            .unwrap();
        }
        let err = store.get_snapshot("nes").await.unwrap_err();
        assert!(matches!(err, StoreError::BadTimestamp { .. }));
    }
}
