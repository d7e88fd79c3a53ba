//! Nashville Electric Service.
//!
//! NES bills a "Service Charge" plus a separate TVA grid access charge, and
//! prints energy in cents (`9.254¢ per kWh`). The fuel adjustment's unit is
//! not reliable in the source text, so its magnitude decides: values of one
//! or more are cents, smaller values are already dollars.

use std::sync::LazyLock;

use ratekeeper_core::{ExtractError, ParserConfig, RatesResponse, ResidentialStandard};
use regex::Regex;
use tracing::debug;

use crate::patterns::{cents_to_dollars, compile, first_float, fixed_charge};
use crate::pdf;

pub const KEY: &str = "nes";
pub const NAME: &str = "Nashville Electric Service";

const UTILITY: &str = "NES";
const SOURCE: &str = "NES Residential Rates PDF";
const SOURCE_URL: &str = "https://www.nespower.com/rates/";

static CUSTOMER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:Customer|Service)\s+Charge[:\s]*\$?([0-9]+(?:\.[0-9]+)?)\s*(?:per month)?")
});
static GRID_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:TVA )?Grid Access Charge[:\s]*\$?([0-9]+(?:\.[0-9]+)?)\s*per month")
});
static ENERGY_CENTS_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"Energy Charge[:\s]*(?:Summer Period\s+)?([0-9]+(?:\.[0-9]+)?)\s*[¢c]")
});
static ENERGY_USD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Energy Charge[:\s]*\$?([0-9]+(?:\.[0-9]+)?)\s*per kWh"));
static ENERGY_CENTS_WORD: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"Energy Charge[:\s]*([0-9]+(?:\.[0-9]+)?)\s*cents?\s*per kWh")
});
static FUEL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"Fuel(?: Cost)? Adjustment[:\s]*([0-9]+(?:\.[0-9]+)?)\s*[¢c]?(?:ents?)?\s*per kWh")
});

pub fn parser() -> ParserConfig {
    pdf::parser_config(KEY, NAME, parse_text)
}

pub fn parse_text(text: &str) -> Result<RatesResponse, ExtractError> {
    let customer = fixed_charge(&[&CUSTOMER], &GRID_ACCESS, text);
    let energy = energy_rate(text);
    let fuel = fuel_rate(first_float(&FUEL, text));
    debug!(provider = KEY, customer, energy, fuel, "parsed residential standard");

    Ok(RatesResponse::residential(
        UTILITY,
        SOURCE,
        SOURCE_URL,
        ResidentialStandard::from_dollars(customer, energy, fuel, text),
    ))
}

/// Cents with a `¢`/`c` suffix, then a dollar figure, then spelled-out cents.
fn energy_rate(text: &str) -> f64 {
    let cents = first_float(&ENERGY_CENTS_SYMBOL, text);
    if cents > 0.0 {
        return cents_to_dollars(cents);
    }
    let usd = first_float(&ENERGY_USD, text);
    if usd > 0.0 {
        return usd;
    }
    cents_to_dollars(first_float(&ENERGY_CENTS_WORD, text))
}

fn fuel_rate(raw: f64) -> f64 {
    if raw >= 1.0 { cents_to_dollars(raw) } else { raw }
}
