//! Per-provider document overrides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ratekeeper_core::{ProviderCatalog, ProviderDescriptor};
use tracing::debug;

/// `CEMC_PDF_PATH` overrides the document path for provider `cemc`.
pub const PDF_PATH_ENV_SUFFIX: &str = "_PDF_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pdf_paths: HashMap<String, PathBuf>,
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `<KEY>_PDF_PATH` overrides for every provider in `catalog`.
    pub fn from_env(catalog: &ProviderCatalog) -> Self {
        Self::from_lookup(catalog, |name| std::env::var(name).ok())
    }

    fn from_lookup(catalog: &ProviderCatalog, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        for provider in catalog.iter() {
            let var = env_var_name(&provider.key);
            if let Some(path) = lookup(&var).filter(|p| !p.trim().is_empty()) {
                debug!(provider = %provider.key, env = %var, path = %path, "pdf path override");
                config.pdf_paths.insert(provider.key.clone(), PathBuf::from(path));
            }
        }
        config
    }

    pub fn with_pdf_path(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.pdf_paths.insert(key.into(), path.into());
        self
    }

    pub fn pdf_path_override(&self, key: &str) -> Option<&Path> {
        self.pdf_paths.get(key).map(PathBuf::as_path)
    }

    /// Override for `key`, else the descriptor's default path.
    pub fn resolve_pdf_path(
        &self,
        key: &str,
        descriptor: Option<&ProviderDescriptor>,
    ) -> Option<PathBuf> {
        self.pdf_path_override(key)
            .map(Path::to_path_buf)
            .or_else(|| {
                descriptor
                    .map(|d| d.default_pdf_path.as_str())
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
            })
    }
}

fn env_var_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    name.push_str(PDF_PATH_ENV_SUFFIX);
    name
}
