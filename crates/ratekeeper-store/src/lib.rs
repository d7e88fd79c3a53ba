//! Snapshot storage: the last good payload per cache key.
//!
//! The store holds opaque bytes and knows nothing about the rate schema;
//! encoding and decoding belong to the resolution services.

mod error;
mod memory;
mod snapshot;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use snapshot::{RatesSnapshot, SnapshotStore};

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;
