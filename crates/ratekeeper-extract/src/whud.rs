//! White House Utility District water and sewer rates.
//!
//! Rates are scraped from the public "Rates and Fees" page. The server omits
//! intermediate certificates, so the page is fetched with the relaxed
//! transport.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::Utc;
use ratekeeper_core::{
    ExtractError, SewerRateDetails, Transport, WaterParserConfig, WaterRateDetails,
    WaterRatesResponse,
};
use regex::Regex;
use tracing::debug;

use crate::patterns::{compile, first_number};

pub const KEY: &str = "whud";
pub const NAME: &str = "White House Utility District";

const DEFAULT_METER: &str = "5/8 x 3/4 inch";
const USE_UNIT: &str = "gallon";

/// Inch mark as typed, HTML-escaped, or typographic.
const INCH: &str = r#"(?:"|&quot;|&#34;|&#8221;|&#8243;|”|″)"#;

static YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d{4})\s+Water\s+Rates"));
static WATER_USE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Water\s+Use\s+Charge[^$]*\$([0-9.]+)/gallon"));
static SEWER_BASE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)sewer[^$]*Basic\s+Service\s+Charge[:\s]*\$([0-9.]+)"));
static SEWER_SECTION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)WHUD\s+Sewer\s+Rates(.+?)(?:Other\s+Fees|$)"));
static SECTION_BASE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Basic\s+Service\s+Charge[:\s]*\$([0-9.]+)"));
static SEWER_USE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)Sewer\s+Use\s+Charge[:\s]*\$([0-9.]+)\s+per\s+gallon")
});

/// Meter label patterns, smallest meter first. Whole-inch sizes must not be
/// preceded by a digit, `/` or `.`, so `3/4"` is never read as a 4" meter.
static METERS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let whole = |size: &str| format!(r"(?:^|[^0-9/.]){size}{INCH}\s*Meter\s*\$([0-9.]+)");
    vec![
        (
            compile(&format!(r"5/8{INCH}?\s*x\s*3/4{INCH}?\s*Meter\s*\$([0-9.]+)")),
            DEFAULT_METER,
        ),
        (compile(&whole("1")), "1 inch"),
        (compile(&whole(r"1\.5")), "1.5 inch"),
        (compile(&whole("2")), "2 inch"),
        (compile(&whole("3")), "3 inch"),
        (compile(&whole("4")), "4 inch"),
        (compile(&whole("6")), "6 inch"),
        (compile(&whole("8")), "8 inch"),
        (compile(&whole("10")), "10 inch"),
    ]
});

pub fn parser() -> WaterParserConfig {
    WaterParserConfig::new(KEY, NAME)
        .with_transport(Transport::Relaxed)
        .with_html(parse_html)
}

pub fn parse_html(html: &str) -> Result<WaterRatesResponse, ExtractError> {
    let effective_date = YEAR
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let use_rate = first_number(&WATER_USE, html).unwrap_or(0.0);
    if use_rate == 0.0 {
        return Err(ExtractError::MissingField {
            provider: KEY,
            field: "water use rate",
        });
    }

    let (meter_sizes, base_charge) = meter_rates(html);
    let sewer = sewer_rates(html, effective_date.as_deref());
    debug!(
        provider = KEY,
        use_rate,
        base_charge,
        meters = meter_sizes.len(),
        sewer = sewer.is_some(),
        "parsed water rates"
    );

    Ok(WaterRatesResponse {
        provider_key: KEY.to_string(),
        provider_name: NAME.to_string(),
        fetched_at: Utc::now(),
        water: WaterRateDetails {
            meter_sizes,
            default_meter_size: DEFAULT_METER.to_string(),
            base_charge,
            use_rate,
            use_rate_unit: USE_UNIT.to_string(),
            effective_date,
        },
        sewer,
    })
}

/// Meter table plus the base charge: the default meter's, else the
/// smallest meter found.
fn meter_rates(html: &str) -> (BTreeMap<String, f64>, f64) {
    let mut sizes = BTreeMap::new();
    let mut smallest = None;
    for (re, label) in METERS.iter() {
        if let Some(rate) = first_number(re, html) {
            smallest.get_or_insert(rate);
            sizes.insert((*label).to_string(), rate);
        }
    }
    let base = sizes
        .get(DEFAULT_METER)
        .copied()
        .or(smallest)
        .unwrap_or(0.0);
    (sizes, base)
}

fn sewer_rates(html: &str, effective_date: Option<&str>) -> Option<SewerRateDetails> {
    let base = match SEWER_SECTION.captures(html).and_then(|c| c.get(1)) {
        Some(section) => first_number(&SECTION_BASE, section.as_str()),
        None => first_number(&SEWER_BASE, html),
    };
    let use_rate = first_number(&SEWER_USE, html);
    if base.is_none() && use_rate.is_none() {
        return None;
    }

    let mut sewer = SewerRateDetails::new(USE_UNIT);
    sewer.base_charge = base.unwrap_or(0.0);
    sewer.use_rate = use_rate.unwrap_or(0.0);
    sewer.effective_date = effective_date.map(str::to_string);
    Some(sewer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATES_PAGE: &str = r#"
<html>
<body>
<h2>2025 Water Rates</h2>
<h3>Meter Base Rates:</h3>
<p>5/8" x 3/4" Meter $9.85 1" Meter $13.37 1.5" Meter $32.99 2" Meter $48.58 3" Meter $82.28 4" Meter $88.82 6" Meter $142.64 8" Meter $219.10 10" Meter $275.85</p>
<p>The Water Use Charge for all customers in 2025 is $0.00866/gallon.</p>

<h2>2025 WHUD Sewer Rates</h2>
<p>Basic Service Charge: $10.49 per month</p>
<p>Sewer Use Charge: $0.01100 per gallon</p>

<h3>Examples</h3>
<h5>Meter using 2,000 gallons per month (5/8 inch x 3/4 inch meter):</h5>
<p>Basic Service Charge: $9.85 Water Use Charge (2,000 x .00866) $17.32 $27.17/month</p>
</body>
</html>
"#;

    #[test]
    fn published_page() {
        let rates = parse_html(RATES_PAGE).unwrap();
        assert_eq!(rates.provider_key, "whud");
        assert_eq!(rates.provider_name, "White House Utility District");
        assert_eq!(rates.water.use_rate, 0.00866);
        assert_eq!(rates.water.use_rate_unit, "gallon");
        assert_eq!(rates.water.effective_date.as_deref(), Some("2025"));
        assert_eq!(rates.water.base_charge, 9.85);

        let sewer = rates.sewer.as_ref().expect("sewer parsed");
        assert_eq!(sewer.base_charge, 10.49);
        assert_eq!(sewer.use_rate, 0.011);
        assert_eq!(sewer.effective_date.as_deref(), Some("2025"));

        assert!((rates.water_only_cost(2000.0) - 27.17).abs() < 0.01);
        assert!((rates.water_bill(2000.0) - 59.66).abs() < 0.02);
    }

    #[test]
    fn meter_table() {
        let meters = parse_html(RATES_PAGE).unwrap().water.meter_sizes;
        assert_eq!(meters.len(), 9);
        assert_eq!(meters["5/8 x 3/4 inch"], 9.85);
        assert_eq!(meters["1 inch"], 13.37);
        assert_eq!(meters["1.5 inch"], 32.99);
        assert_eq!(meters["4 inch"], 88.82);
        assert_eq!(meters["8 inch"], 219.10);
        assert_eq!(meters["10 inch"], 275.85);
    }

    #[test]
    fn escaped_inch_marks() {
        let html = "<p>5/8&quot; x 3/4&quot; Meter $9.85 1&quot; Meter $13.37</p>\
                    <p>Water Use Charge is $0.00866/gallon</p>";
        let water = parse_html(html).unwrap().water;
        assert_eq!(water.meter_sizes["5/8 x 3/4 inch"], 9.85);
        assert_eq!(water.meter_sizes["1 inch"], 13.37);
        assert!(!water.meter_sizes.contains_key("4 inch"));
    }

    #[test]
    fn base_falls_back_to_smallest_meter() {
        let html = r#"<p>2" Meter $48.58 1" Meter $13.37</p><p>Water Use Charge $0.009/gallon</p>"#;
        let water = parse_html(html).unwrap().water;
        assert_eq!(water.base_charge, 13.37);
        assert_eq!(water.default_meter_size, "5/8 x 3/4 inch");
    }

    #[test]
    fn missing_use_rate_is_an_error() {
        let err = parse_html("<h2>2025 Water Rates</h2><p>1\" Meter $13.37</p>").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingField { provider: "whud", .. }
        ));
    }

    #[test]
    fn sewer_base_from_section() {
        let html = "<p>Water Use Charge $0.00866/gallon</p>\
                    <h2>WHUD Sewer Rates</h2><p>Tap fee $500</p>\
                    <p>Basic Service Charge: $10.49</p>\
                    <h2>Other Fees</h2><p>Basic Service Charge: $99.00</p>";
        let sewer = parse_html(html).unwrap().sewer.unwrap();
        assert_eq!(sewer.base_charge, 10.49);
        assert_eq!(sewer.use_rate, 0.0);
        assert_eq!(sewer.use_rate_unit, "gallon");
    }

    #[test]
    fn sewer_section_beats_earlier_sewer_mention() {
        let html = "<p>Water and sewer bills are mailed monthly. Basic Service Charge: $9.85</p>\
                    <p>Water Use Charge $0.00866/gallon</p>\
                    <h2>WHUD Sewer Rates</h2><p>Basic Service Charge: $10.49</p>";
        let sewer = parse_html(html).unwrap().sewer.unwrap();
        assert_eq!(sewer.base_charge, 10.49);
    }

    #[test]
    fn sewer_base_from_whole_page_without_section() {
        let html = "<p>Water Use Charge $0.00866/gallon</p>\
                    <p>Sewer Basic Service Charge: $10.49</p>\
                    <p>Sewer Use Charge: $0.01100 per gallon</p>";
        let sewer = parse_html(html).unwrap().sewer.unwrap();
        assert_eq!(sewer.base_charge, 10.49);
        assert_eq!(sewer.use_rate, 0.011);
    }

    #[test]
    fn no_sewer_markers_means_no_sewer() {
        let rates = parse_html("<p>Water Use Charge $0.00866/gallon</p>").unwrap();
        assert!(rates.sewer.is_none());
        assert_eq!(rates.water.base_charge, 0.0);
        assert!(rates.water.effective_date.is_none());
    }

    #[test]
    fn parser_uses_relaxed_transport() {
        let cfg = parser();
        assert_eq!(cfg.transport, Transport::Relaxed);
        assert!(cfg.parse_html.is_some());
    }
}
