//! Water and sewer rate resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ratekeeper_core::{ProviderCatalog, WaterParserConfig, WaterParserRegistry, WaterRatesResponse};
use ratekeeper_fetch::DocumentFetcher;
use ratekeeper_store::SnapshotStore;
use tracing::{info, instrument};

use crate::flight::KeyedLocks;
use crate::{RatesError, cache};

/// Water snapshots live beside electric ones under `water:<key>`.
pub const WATER_KEY_PREFIX: &str = "water:";

/// Resolves water/sewer rates by fetching the provider's landing page and
/// parsing it, with the same cache discipline as [`RateService`](crate::RateService).
///
/// An unregistered provider key resolves to `Ok(None)`.
pub struct WaterRateService {
    registry: Arc<WaterParserRegistry>,
    catalog: Arc<ProviderCatalog>,
    fetcher: Arc<dyn DocumentFetcher>,
    store: Option<Arc<dyn SnapshotStore>>,
    flights: KeyedLocks,
}

impl WaterRateService {
    pub fn new(
        registry: Arc<WaterParserRegistry>,
        catalog: Arc<ProviderCatalog>,
        fetcher: Arc<dyn DocumentFetcher>,
    ) -> Self {
        Self {
            registry,
            catalog,
            fetcher,
            store: None,
            flights: KeyedLocks::default(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(&self) -> &WaterParserRegistry {
        &self.registry
    }

    fn store(&self) -> Option<&dyn SnapshotStore> {
        self.store.as_deref()
    }

    #[instrument(skip(self), fields(provider = %key))]
    pub async fn get_water_rates(&self, key: &str) -> Result<Option<WaterRatesResponse>, RatesError> {
        let Some(parser) = self.registry.lookup(key) else {
            return Ok(None);
        };
        let cache_key = cache_key(key);
        if let Some(hit) = cache::read(self.store(), &cache_key).await {
            return Ok(Some(hit));
        }

        let _flight = self.flights.lock(&cache_key).await;
        if let Some(hit) = cache::read(self.store(), &cache_key).await {
            return Ok(Some(hit));
        }
        self.fetch_and_store(key, &cache_key, parser).await.map(Some)
    }

    #[instrument(skip(self), fields(provider = %key))]
    pub async fn force_refresh(&self, key: &str) -> Result<Option<WaterRatesResponse>, RatesError> {
        let Some(parser) = self.registry.lookup(key) else {
            return Ok(None);
        };
        let cache_key = cache_key(key);
        let _flight = self.flights.lock(&cache_key).await;
        self.fetch_and_store(key, &cache_key, parser).await.map(Some)
    }

    async fn fetch_and_store(
        &self,
        key: &str,
        cache_key: &str,
        parser: WaterParserConfig,
    ) -> Result<WaterRatesResponse, RatesError> {
        let url = self
            .catalog
            .get(key)
            .map(|p| p.landing_url.as_str())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| RatesError::NoSourceUrl(key.to_string()))?;
        let parse_html = parser
            .parse_html
            .ok_or_else(|| RatesError::UnknownProvider(key.to_string()))?;

        let html = self.fetcher.fetch_html(url, parser.transport).await?;
        let mut resp = parse_html(html.as_str())?;
        if resp.fetched_at == DateTime::<Utc>::default() {
            resp.fetched_at = Utc::now();
        }

        cache::write(self.store(), cache_key, &resp, resp.fetched_at).await;
        info!(url = %url, fetched_at = %resp.fetched_at, "water rates resolved");
        Ok(resp)
    }
}

fn cache_key(key: &str) -> String {
    format!("{WATER_KEY_PREFIX}{key}")
}
