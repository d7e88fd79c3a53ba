//! Cumberland Electric Membership Corporation.
//!
//! The CEMC rate book lists every schedule in one PDF, so the residential
//! `SCHEDULE RS` block is cut out first and the charges read from it. Rates
//! are printed in dollars with a trailing `$`, e.g. `.08058$ per kWh`.

use std::sync::LazyLock;

use ratekeeper_core::{ExtractError, ParserConfig, RatesResponse, ResidentialStandard};
use regex::Regex;
use tracing::debug;

use crate::patterns::{compile, first_float, fixed_charge, section_or_all};
use crate::pdf;

pub const KEY: &str = "cemc";
pub const NAME: &str = "Cumberland Electric Membership Corporation";

const UTILITY: &str = "CEMC";
const SOURCE: &str = "CEMC Current Rates PDF";
const SOURCE_URL: &str = "https://cemc.org/my-account/#residential-rates";

static RS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"RESIDENTIAL RATE[^\n]*SCHEDULE RS(?s)(.+?)(?:SUPPLEMENTAL RESIDENTIAL RATE|$)")
});
static CUSTOMER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Customer Charge:\s*\$?([0-9]+(?:\.[0-9]+)?)"));
static GRID_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:TVA )?Grid Access Charge[:\s]*\$?([0-9]+(?:\.[0-9]+)?)"));
static ENERGY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Energy Charge:\s*(\d+\.\d+|\.\d+|\d+)\$?\s*per kWh"));
static FUEL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"TVA Fuel Charge:\s*(\d+\.\d+|\.\d+|\d+)\$?\s*per kWh"));

pub fn parser() -> ParserConfig {
    pdf::parser_config(KEY, NAME, parse_text)
}

pub fn parse_text(text: &str) -> Result<RatesResponse, ExtractError> {
    let section = section_or_all(&RS_SECTION, text);

    let customer = fixed_charge(&[&CUSTOMER], &GRID_ACCESS, section);
    let energy = first_float(&ENERGY, section);
    let fuel = first_float(&FUEL, section);
    debug!(provider = KEY, customer, energy, fuel, "parsed residential standard");

    Ok(RatesResponse::residential(
        UTILITY,
        SOURCE,
        SOURCE_URL,
        ResidentialStandard::from_dollars(customer, energy, fuel, section),
    ))
}
