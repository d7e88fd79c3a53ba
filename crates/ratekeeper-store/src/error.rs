use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("snapshot for {provider} has an unreadable timestamp: {value}")]
    BadTimestamp { provider: String, value: String },

    #[error("{0}")]
    Other(String),
}
