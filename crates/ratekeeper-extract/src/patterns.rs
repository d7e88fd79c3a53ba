//! Shared helpers for regex-driven field extraction.

use regex::Regex;

/// Compile a pattern that is fixed at build time.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Parse a captured number, tolerating a trailing sentence period
/// (`"9.85."`) and a missing leading zero (`".08058"`).
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// First capture group of the first match, as a number.
pub fn first_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

/// Like [`first_number`] but an unmatched pattern reads as zero.
pub fn first_float(re: &Regex, text: &str) -> f64 {
    first_number(re, text).unwrap_or(0.0)
}

/// Try each pattern in priority order; the first positive value wins.
pub fn first_positive(patterns: &[&Regex], text: &str) -> Option<f64> {
    patterns
        .iter()
        .map(|re| first_float(re, text))
        .find(|v| *v > 0.0)
}

/// Primary fixed charge (first positive pattern wins) plus an optional
/// grid-access charge billed as a separate line item.
pub fn fixed_charge(primary: &[&Regex], grid_access: &Regex, text: &str) -> f64 {
    let base = first_positive(primary, text).unwrap_or(0.0);
    match first_number(grid_access, text) {
        Some(access) if access > 0.0 => base + access,
        _ => base,
    }
}

/// Cents per kWh → dollars per kWh.
pub fn cents_to_dollars(cents: f64) -> f64 {
    cents / 100.0
}

/// Whole match of `re`, or the full `text` when the section is not found.
pub fn section_or_all<'a>(re: &Regex, text: &'a str) -> &'a str {
    re.find(text).map_or(text, |m| m.as_str())
}
