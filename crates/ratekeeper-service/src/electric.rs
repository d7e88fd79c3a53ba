//! Electric rate resolution.

use std::sync::Arc;

use chrono::Utc;
use ratekeeper_core::{ParserConfig, ParserRegistry, ProviderCatalog, RatesResponse};
use ratekeeper_store::SnapshotStore;
use tracing::{info, instrument};

use crate::flight::KeyedLocks;
use crate::{RatesError, ServiceConfig, cache};

/// Resolves residential electric rates for a provider key, serving the last
/// snapshot when one exists and extracting from the provider's PDF when not.
///
/// Snapshots are stored under the bare provider key.
pub struct RateService {
    registry: Arc<ParserRegistry>,
    catalog: Arc<ProviderCatalog>,
    config: ServiceConfig,
    store: Option<Arc<dyn SnapshotStore>>,
    flights: KeyedLocks,
}

impl RateService {
    /// A service without a snapshot store: every call extracts.
    pub fn new(
        registry: Arc<ParserRegistry>,
        catalog: Arc<ProviderCatalog>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            registry,
            catalog,
            config,
            store: None,
            flights: KeyedLocks::default(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    fn store(&self) -> Option<&dyn SnapshotStore> {
        self.store.as_deref()
    }

    fn parser(&self, key: &str) -> Result<ParserConfig, RatesError> {
        self.registry
            .lookup(key)
            .ok_or_else(|| RatesError::UnknownProvider(key.to_string()))
    }

    /// Cached rates for `key`, extracting and caching on a miss.
    #[instrument(skip(self), fields(provider = %key))]
    pub async fn get_residential(&self, key: &str) -> Result<RatesResponse, RatesError> {
        let parser = self.parser(key)?;
        if let Some(hit) = cache::read(self.store(), key).await {
            return Ok(hit);
        }

        let _flight = self.flights.lock(key).await;
        if let Some(hit) = cache::read(self.store(), key).await {
            return Ok(hit);
        }
        self.extract_and_store(key, parser).await
    }

    /// Extract from the document regardless of the cache and overwrite the
    /// snapshot.
    #[instrument(skip(self), fields(provider = %key))]
    pub async fn force_refresh(&self, key: &str) -> Result<RatesResponse, RatesError> {
        let parser = self.parser(key)?;
        let _flight = self.flights.lock(key).await;
        self.extract_and_store(key, parser).await
    }

    async fn extract_and_store(
        &self,
        key: &str,
        parser: ParserConfig,
    ) -> Result<RatesResponse, RatesError> {
        let path = self
            .config
            .resolve_pdf_path(key, self.catalog.get(key))
            .ok_or_else(|| RatesError::NoDocumentPath(key.to_string()))?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(RatesError::DocumentNotFound {
                provider: key.to_string(),
                path,
            });
        }
        let parse_pdf = parser
            .parse_pdf
            .ok_or_else(|| RatesError::UnknownProvider(key.to_string()))?;

        info!(path = %path.display(), "extracting rates");
        let mut resp = tokio::task::spawn_blocking(move || parse_pdf(path.as_path()))
            .await
            .map_err(|_| RatesError::ExtractorPanicked(key.to_string()))??;
        if resp.rates.is_empty() {
            return Err(RatesError::EmptyResult(key.to_string()));
        }
        if resp.is_unstamped() {
            resp.fetched_at = Utc::now();
        }

        cache::write(self.store(), key, &resp, resp.fetched_at).await;
        info!(fetched_at = %resp.fetched_at, "rates resolved");
        Ok(resp)
    }
}
