//! Provider catalog: the list of utilities Ratekeeper knows how to resolve.
//!
//! The active list comes from the `RATEKEEPER_PROVIDERS_JSON` environment
//! variable when it holds a valid, non-empty JSON array, otherwise from the
//! compiled-in defaults. A malformed override is logged and ignored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable holding a JSON array of [`ProviderDescriptor`]s.
pub const PROVIDERS_ENV: &str = "RATEKEEPER_PROVIDERS_JSON";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Overrides that omit `type` are treated as electric.
    #[default]
    Electric,
    Water,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electric => "electric",
            Self::Water => "water",
        }
    }
}

/// Identifies one utility provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub key: String,
    #[serde(rename = "type", default)]
    pub provider_type: ProviderType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub landing_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_pdf_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pdf_api_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub html_api_url: String,
}

impl ProviderDescriptor {
    fn electric(key: &str, name: &str, landing_url: &str, pdf_path: &str, notes: &str) -> Self {
        Self {
            key: key.into(),
            provider_type: ProviderType::Electric,
            name: name.into(),
            landing_url: landing_url.into(),
            default_pdf_path: pdf_path.into(),
            notes: notes.into(),
            pdf_api_url: format!("/rates/{key}/pdf"),
            html_api_url: String::new(),
        }
    }

    fn water(key: &str, name: &str, landing_url: &str, notes: &str) -> Self {
        Self {
            key: key.into(),
            provider_type: ProviderType::Water,
            name: name.into(),
            landing_url: landing_url.into(),
            default_pdf_path: String::new(),
            notes: notes.into(),
            pdf_api_url: String::new(),
            html_api_url: format!("/water/rates/{key}"),
        }
    }
}

/// Immutable list of active providers with unique keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCatalog {
    providers: Vec<ProviderDescriptor>,
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ProviderCatalog {
    /// The compiled-in provider list.
    pub fn defaults() -> Self {
        Self {
            providers: vec![
                ProviderDescriptor::electric(
                    "cemc",
                    "Cumberland Electric Membership Corporation",
                    "https://cemc.org/my-account/#residential-rates",
                    "/data/cemc_rates.pdf",
                    "CEMC residential rates",
                ),
                ProviderDescriptor::electric(
                    "nes",
                    "Nashville Electric Service",
                    "https://www.nespower.com/rates/",
                    "/data/nes_rates.pdf",
                    "NES residential rates",
                ),
                ProviderDescriptor::electric(
                    "kub",
                    "Knoxville Utilities Board",
                    "https://www.kub.org/bills-payments/understand-your-bill/residential-rates/",
                    "/data/kub_rates.pdf",
                    "KUB residential rates (TVA distributor)",
                ),
                ProviderDescriptor::water(
                    "whud",
                    "White House Utility District",
                    "https://www.whud.org/rates-and-fees/",
                    "WHUD water and sewer rates",
                ),
            ],
        }
    }

    /// Load from [`PROVIDERS_ENV`], falling back to [`defaults`](Self::defaults).
    pub fn from_env() -> Self {
        match std::env::var(PROVIDERS_ENV) {
            Ok(raw) => Self::from_json_or_defaults(&raw),
            Err(_) => Self::defaults(),
        }
    }

    /// Parse an override list. Empty input, invalid JSON, an empty array,
    /// blank keys or duplicate keys all fall back to the defaults.
    pub fn from_json_or_defaults(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::defaults();
        }
        match serde_json::from_str::<Vec<ProviderDescriptor>>(raw) {
            Ok(list) if is_valid_override(&list) => Self { providers: list },
            Ok(_) => {
                warn!(env = PROVIDERS_ENV, "provider override empty or has bad keys, using defaults");
                Self::defaults()
            }
            Err(e) => {
                warn!(env = PROVIDERS_ENV, error = %e, "provider override is not valid JSON, using defaults");
                Self::defaults()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter()
    }

    pub fn electric(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.of_type(ProviderType::Electric)
    }

    pub fn water(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.of_type(ProviderType::Water)
    }

    fn of_type(&self, t: ProviderType) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter().filter(move |p| p.provider_type == t)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn is_valid_override(list: &[ProviderDescriptor]) -> bool {
    let mut seen = HashSet::new();
    !list.is_empty() && list.iter().all(|p| !p.key.is_empty() && seen.insert(p.key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_electric_and_water() {
        let catalog = ProviderCatalog::defaults();
        assert!(catalog.get("cemc").is_some());
        assert!(catalog.get("nes").is_some());
        assert!(catalog.get("kub").is_some());
        assert_eq!(catalog.water().count(), 1);
        assert_eq!(catalog.electric().count(), 3);
    }

    #[test]
    fn defaults_carry_api_paths() {
        let catalog = ProviderCatalog::defaults();
        assert_eq!(catalog.get("cemc").unwrap().pdf_api_url, "/rates/cemc/pdf");
        assert_eq!(catalog.get("whud").unwrap().html_api_url, "/water/rates/whud");
        assert!(catalog.get("whud").unwrap().default_pdf_path.is_empty());
    }

    #[test]
    fn empty_override_uses_defaults() {
        assert_eq!(
            ProviderCatalog::from_json_or_defaults(""),
            ProviderCatalog::defaults()
        );
        assert_eq!(
            ProviderCatalog::from_json_or_defaults("[]"),
            ProviderCatalog::defaults()
        );
    }

    #[test]
    fn invalid_json_falls_back() {
        let catalog = ProviderCatalog::from_json_or_defaults("{not valid json");
        assert_eq!(catalog, ProviderCatalog::defaults());
    }

    #[test]
    fn override_replaces_defaults() {
        let raw = r#"[
            {
                "key": "myutility",
                "name": "My Utility Power",
                "landingUrl": "https://myutility.example.com/rates/",
                "defaultPdfPath": "/data/myutility_rates.pdf",
                "notes": "Override provider"
            }
        ]"#;
        let catalog = ProviderCatalog::from_json_or_defaults(raw);
        assert_eq!(catalog.len(), 1);
        let p = catalog.get("myutility").unwrap();
        assert_eq!(p.default_pdf_path, "/data/myutility_rates.pdf");
        assert_eq!(p.provider_type, ProviderType::Electric);
        assert!(catalog.get("cemc").is_none());
    }

    #[test]
    fn override_with_water_type() {
        let raw = r#"[{"key": "wd", "type": "water", "name": "WD", "landingUrl": "https://wd.example/"}]"#;
        let catalog = ProviderCatalog::from_json_or_defaults(raw);
        assert_eq!(catalog.water().count(), 1);
        assert_eq!(catalog.electric().count(), 0);
    }

    #[test]
    fn duplicate_keys_fall_back() {
        let raw = r#"[{"key": "x", "name": "X"}, {"key": "x", "name": "X again"}]"#;
        assert_eq!(
            ProviderCatalog::from_json_or_defaults(raw),
            ProviderCatalog::defaults()
        );
    }

    #[test]
    fn blank_key_falls_back() {
        let raw = r#"[{"key": "", "name": "Nameless"}]"#;
        assert_eq!(
            ProviderCatalog::from_json_or_defaults(raw),
            ProviderCatalog::defaults()
        );
    }

    #[test]
    fn override_entry_without_name_is_kept() {
        let raw = r#"[{"key": "coop", "landingUrl": "https://coop.example/rates/"}]"#;
        let catalog = ProviderCatalog::from_json_or_defaults(raw);
        assert_eq!(catalog.len(), 1);
        let coop = catalog.get("coop").unwrap();
        assert_eq!(coop.name, "");
        assert_eq!(coop.provider_type, ProviderType::Electric);
    }
}
