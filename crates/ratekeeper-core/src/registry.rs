//! Parser registries: provider key → extraction functions + display name.
//!
//! A registry is populated once during bootstrap and then shared by `Arc`
//! with the resolution services. Registration errors are developer mistakes
//! and abort bootstrap; lookups never fail at call time beyond "not found".

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{ExtractError, RegistryError};
use crate::model::RatesResponse;
use crate::water::WaterRatesResponse;

/// Extracts rates from a document on disk.
pub type PdfExtractor = Arc<dyn Fn(&Path) -> Result<RatesResponse, ExtractError> + Send + Sync>;

/// Extracts rates from already-decoded document text.
pub type TextExtractor = Arc<dyn Fn(&str) -> Result<RatesResponse, ExtractError> + Send + Sync>;

/// Extracts water/sewer rates from a fetched HTML page.
pub type HtmlExtractor =
    Arc<dyn Fn(&str) -> Result<WaterRatesResponse, ExtractError> + Send + Sync>;

/// How strictly the HTTP fetcher verifies the source server's TLS chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    #[default]
    Standard,
    /// Skips certificate verification. Only for known servers that omit
    /// intermediate certificates.
    Relaxed,
}

/// Something a [`Registry`] can hold.
pub trait RegistryEntry: Clone {
    fn key(&self) -> &str;
    fn has_extractor(&self) -> bool;
}

/// Electric provider parser.
#[derive(Clone)]
pub struct ParserConfig {
    pub key: String,
    pub name: String,
    pub parse_pdf: Option<PdfExtractor>,
    pub parse_text: Option<TextExtractor>,
}

impl ParserConfig {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            parse_pdf: None,
            parse_text: None,
        }
    }

    pub fn with_pdf<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path) -> Result<RatesResponse, ExtractError> + Send + Sync + 'static,
    {
        self.parse_pdf = Some(Arc::new(f));
        self
    }

    pub fn with_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<RatesResponse, ExtractError> + Send + Sync + 'static,
    {
        self.parse_text = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("parse_pdf", &self.parse_pdf.is_some())
            .field("parse_text", &self.parse_text.is_some())
            .finish()
    }
}

impl RegistryEntry for ParserConfig {
    fn key(&self) -> &str {
        &self.key
    }

    fn has_extractor(&self) -> bool {
        self.parse_pdf.is_some()
    }
}

/// Water provider parser. The service fetches the landing page with
/// `transport` and hands the body to `parse_html`.
#[derive(Clone)]
pub struct WaterParserConfig {
    pub key: String,
    pub name: String,
    pub transport: Transport,
    pub parse_html: Option<HtmlExtractor>,
}

impl WaterParserConfig {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            transport: Transport::Standard,
            parse_html: None,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_html<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<WaterRatesResponse, ExtractError> + Send + Sync + 'static,
    {
        self.parse_html = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for WaterParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaterParserConfig")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("transport", &self.transport)
            .field("parse_html", &self.parse_html.is_some())
            .finish()
    }
}

impl RegistryEntry for WaterParserConfig {
    fn key(&self) -> &str {
        &self.key
    }

    fn has_extractor(&self) -> bool {
        self.parse_html.is_some()
    }
}

/// Key → config map behind a read/write lock.
pub struct Registry<C> {
    entries: RwLock<HashMap<String, C>>,
}

pub type ParserRegistry = Registry<ParserConfig>;
pub type WaterParserRegistry = Registry<WaterParserConfig>;

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<C: RegistryEntry> Registry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a fixed list, stopping at the first violation.
    pub fn from_entries(entries: impl IntoIterator<Item = C>) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for entry in entries {
            registry.register(entry)?;
        }
        Ok(registry)
    }

    /// Insert `entry` under its key.
    pub fn register(&self, entry: C) -> Result<(), RegistryError> {
        let key = entry.key().to_string();
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if !entry.has_extractor() {
            return Err(RegistryError::MissingExtractor(key));
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&key) {
            return Err(RegistryError::Duplicate(key));
        }
        debug!(provider = %key, "registered parser");
        entries.insert(key, entry);
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Option<C> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// All registered keys, sorted.
    pub fn list_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
