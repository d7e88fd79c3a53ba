//! Extraction heuristics: turn unstructured rate documents into typed rates.
//!
//! Every provider module exposes a pure `parse_text` / `parse_html` function
//! plus a registry config. [`electric_registry`] and [`water_registry`] build
//! the registries the binary bootstraps with.

pub mod cemc;
pub mod kub;
pub mod nes;
pub mod patterns;
pub mod pdf;
pub mod whud;

use ratekeeper_core::{
    ParserConfig, ParserRegistry, RegistryError, WaterParserConfig, WaterParserRegistry,
};

/// Parser configs for every supported electric provider.
pub fn electric_parsers() -> Vec<ParserConfig> {
    vec![cemc::parser(), nes::parser(), kub::parser()]
}

/// Parser configs for every supported water provider.
pub fn water_parsers() -> Vec<WaterParserConfig> {
    vec![whud::parser()]
}

pub fn electric_registry() -> Result<ParserRegistry, RegistryError> {
    ParserRegistry::from_entries(electric_parsers())
}

pub fn water_registry() -> Result<WaterParserRegistry, RegistryError> {
    WaterParserRegistry::from_entries(water_parsers())
}
