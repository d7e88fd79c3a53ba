//! Normalized electric rate snapshot.
//!
//! Field names follow the JSON contract consumed by downstream dashboards and
//! home-automation integrations, so renaming a field is a breaking change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized electric rates for one provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatesResponse {
    pub utility: String,
    pub source: String,
    pub source_url: String,
    /// Unix epoch means "not stamped yet"; the resolution service fills it in.
    pub fetched_at: DateTime<Utc>,
    pub rates: Rates,
}

impl RatesResponse {
    /// Build a response carrying only the residential standard structure,
    /// stamped with the current time.
    pub fn residential(
        utility: &str,
        source: &str,
        source_url: &str,
        standard: ResidentialStandard,
    ) -> Self {
        Self {
            utility: utility.to_string(),
            source: source.to_string(),
            source_url: source_url.to_string(),
            fetched_at: Utc::now(),
            rates: Rates {
                residential_standard: standard,
                ..Rates::default()
            },
        }
    }

    /// Whether `fetched_at` still holds the zero value.
    pub fn is_unstamped(&self) -> bool {
        self.fetched_at == DateTime::<Utc>::default()
    }
}

/// The four residential tariff slots. Only `residential_standard` is
/// populated today; the others stay `is_present = false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub residential_standard: ResidentialStandard,
    pub residential_supplemental: ResidentialSupplemental,
    pub residential_seasonal: ResidentialSeasonal,
    pub residential_tou: ResidentialTou,
}

impl Rates {
    /// No tariff slot is present.
    pub fn is_empty(&self) -> bool {
        !(self.residential_standard.is_present
            || self.residential_supplemental.is_present
            || self.residential_seasonal.is_present
            || self.residential_tou.is_present)
    }
}

/// Fixed monthly charge + per-kWh energy charge + fuel/adjustment charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidentialStandard {
    pub is_present: bool,
    pub customer_charge_monthly_usd: f64,
    pub energy_rate_usd_per_kwh: f64,
    pub energy_rate_cents_per_kwh: f64,
    pub tva_fuel_rate_usd_per_kwh: f64,
    pub tva_fuel_rate_cents_per_kwh: f64,
    /// Document text the patterns ran against, kept for operator audits.
    pub raw_section: Option<String>,
}

impl ResidentialStandard {
    /// Build a present structure from dollar-denominated values, deriving the
    /// cents mirrors.
    pub fn from_dollars(
        customer_charge: f64,
        energy_rate: f64,
        fuel_rate: f64,
        raw_section: impl Into<String>,
    ) -> Self {
        Self {
            is_present: true,
            customer_charge_monthly_usd: customer_charge,
            energy_rate_usd_per_kwh: energy_rate,
            energy_rate_cents_per_kwh: energy_rate * 100.0,
            tva_fuel_rate_usd_per_kwh: fuel_rate,
            tva_fuel_rate_cents_per_kwh: fuel_rate * 100.0,
            raw_section: Some(raw_section.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidentialSupplemental {
    pub is_present: bool,
    pub customer_charge_part_a_monthly_usd: f64,
    pub customer_charge_part_b_monthly_usd: f64,
    pub energy_rate_usd_per_kwh: f64,
    pub energy_rate_cents_per_kwh: f64,
    pub tva_fuel_rate_usd_per_kwh: f64,
    pub tva_fuel_rate_cents_per_kwh: f64,
    pub raw_section: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidentialSeasonal {
    pub is_present: bool,
    pub raw_section: Option<String>,
    pub summer_rate_usd_per_kwh: Option<f64>,
    pub winter_rate_usd_per_kwh: Option<f64>,
    pub summer_months: Vec<String>,
    pub winter_months: Vec<String>,
}

/// Time-of-use tariff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidentialTou {
    pub is_present: bool,
    pub raw_section: Option<String>,
    pub on_peak_rate_usd_per_kwh: Option<f64>,
    pub off_peak_rate_usd_per_kwh: Option<f64>,
    pub shoulder_rate_usd_per_kwh: Option<f64>,
    pub on_peak_hours: Vec<String>,
    pub off_peak_hours: Vec<String>,
    pub shoulder_hours: Vec<String>,
}
