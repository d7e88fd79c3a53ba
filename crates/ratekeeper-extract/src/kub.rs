//! Knoxville Utilities Board.
//!
//! The published KUB PDF lists seasonal energy rates in dollars
//! (`Summer Period $0.11740 per kWh`) and the purchased power adjustment in
//! cents. Older TVA-distributor layouts (cents energy charge, fuel cost
//! adjustment) are accepted as fallbacks.

use std::sync::LazyLock;

use ratekeeper_core::{ExtractError, ParserConfig, RatesResponse, ResidentialStandard};
use regex::Regex;
use tracing::debug;

use crate::patterns::{cents_to_dollars, compile, first_positive, fixed_charge};
use crate::pdf;

pub const KEY: &str = "kub";
pub const NAME: &str = "Knoxville Utilities Board";

const UTILITY: &str = "KUB";
const SOURCE: &str = "KUB Residential Rates PDF";
const SOURCE_URL: &str = "https://www.kub.org/bills-payments/understand-your-bill/residential-rates/";

// ── Fixed charge ──

static BASIC_SERVICE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"Basic Service Charge[:\s]*\$([0-9]+(?:\.[0-9]+)?)\s*per month")
});
static CUSTOMER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:Customer|Service)\s+Charge[:\s]*\$?([0-9]+(?:\.[0-9]+)?)\s*(?:per month)?")
});
static GRID_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:TVA )?Grid Access Charge[:\s]*\$?([0-9]+(?:\.[0-9]+)?)\s*(?:per month)?")
});

// ── Energy ──

static SUMMER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Summer\s+Period\s+\$([0-9]+\.[0-9]+)\s*per kWh"));
static WINTER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Winter\s+Period\s+\$([0-9]+\.[0-9]+)\s*per kWh"));
static TRANSITION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Transition\s+Period\s+\$([0-9]+\.[0-9]+)\s*per kWh"));
static ENERGY_CENTS_WORD: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"Energy Charge[:\s]*([0-9]+(?:\.[0-9]+)?)\s*cents?\s*per kWh")
});
static ENERGY_CENTS_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"Energy Charge[:\s]*(?:Summer\s+)?([0-9]+(?:\.[0-9]+)?)\s*[¢c]\s*per kWh")
});
static ENERGY_USD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Energy Charge[:\s]*\$([0-9]+\.[0-9]+)\s*per kWh"));
static ANY_USD_PER_KWH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\$([0-9]+\.[0-9]{4,})\s*per kWh"));

// ── Fuel / purchased power ──

static PURCHASED_POWER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"Purchased Power Adjustment\s*\(([0-9]+(?:\.[0-9]+)?)\s*cents? per kWh\)")
});
static FUEL_CENTS_WORD: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?:TVA )?Fuel(?: Cost)?\s*(?:Adjustment|Charge)[:\s]*([0-9]+(?:\.[0-9]+)?)\s*cents?\s*per kWh",
    )
});
static FUEL_CENTS_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?:TVA )?Fuel(?: Cost)?\s*(?:Adjustment|Charge)[:\s]*([0-9]+(?:\.[0-9]+)?)\s*[¢c]\s*per kWh",
    )
});

pub fn parser() -> ParserConfig {
    pdf::parser_config(KEY, NAME, parse_text)
}

pub fn parse_text(text: &str) -> Result<RatesResponse, ExtractError> {
    let customer = fixed_charge(&[&BASIC_SERVICE, &CUSTOMER], &GRID_ACCESS, text);
    let energy = energy_rate(text);
    let fuel = first_positive(&[&PURCHASED_POWER, &FUEL_CENTS_WORD, &FUEL_CENTS_SYMBOL], text)
        .map_or(0.0, cents_to_dollars);
    debug!(provider = KEY, customer, energy, fuel, "parsed residential standard");

    Ok(RatesResponse::residential(
        UTILITY,
        SOURCE,
        SOURCE_URL,
        ResidentialStandard::from_dollars(customer, energy, fuel, text),
    ))
}

/// Seasonal dollar rates, then cents, then any dollar figure per kWh.
fn energy_rate(text: &str) -> f64 {
    first_positive(&[&SUMMER, &WINTER, &TRANSITION], text)
        .or_else(|| {
            first_positive(&[&ENERGY_CENTS_WORD, &ENERGY_CENTS_SYMBOL], text).map(cents_to_dollars)
        })
        .or_else(|| first_positive(&[&ENERGY_USD, &ANY_USD_PER_KWH], text))
        .unwrap_or(0.0)
}
