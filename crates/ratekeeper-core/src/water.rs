//! Normalized water and sewer rate snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parsed water utility rates, with sewer when the provider bills it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterRatesResponse {
    pub provider_key: String,
    pub provider_name: String,
    pub fetched_at: DateTime<Utc>,
    pub water: WaterRateDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sewer: Option<SewerRateDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterRateDetails {
    /// Meter size label → monthly base charge, e.g. `"5/8 x 3/4 inch" → 9.85`.
    pub meter_sizes: BTreeMap<String, f64>,
    pub default_meter_size: String,
    /// Monthly base charge for `default_meter_size`.
    pub base_charge: f64,
    pub use_rate: f64,
    /// Unit `use_rate` is charged per, e.g. `"gallon"` or `"1000 gallons"`.
    pub use_rate_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SewerRateDetails {
    pub base_charge: f64,
    pub use_rate: f64,
    pub use_rate_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
}

impl SewerRateDetails {
    pub fn new(use_rate_unit: &str) -> Self {
        Self {
            use_rate_unit: use_rate_unit.to_string(),
            ..Self::default()
        }
    }
}

impl WaterRatesResponse {
    /// Monthly water charge for `usage` units, without sewer.
    pub fn water_only_cost(&self, usage: f64) -> f64 {
        self.water.base_charge + usage * self.water.use_rate
    }

    /// Monthly sewer charge for `usage` units; zero when sewer is not billed.
    pub fn sewer_only_cost(&self, usage: f64) -> f64 {
        self.sewer
            .as_ref()
            .map_or(0.0, |s| s.base_charge + usage * s.use_rate)
    }

    /// Combined water + sewer monthly charge for `usage` units.
    pub fn water_bill(&self, usage: f64) -> f64 {
        self.water_only_cost(usage) + self.sewer_only_cost(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whud_rates() -> WaterRatesResponse {
        WaterRatesResponse {
            water: WaterRateDetails {
                base_charge: 9.85,
                use_rate: 0.00866,
                use_rate_unit: "gallon".into(),
                ..WaterRateDetails::default()
            },
            sewer: Some(SewerRateDetails {
                base_charge: 10.49,
                use_rate: 0.011,
                use_rate_unit: "gallon".into(),
                effective_date: None,
            }),
            ..WaterRatesResponse::default()
        }
    }

    #[test]
    fn published_two_thousand_gallon_example() {
        // 9.85 + 2000 * 0.00866 = 27.17; 10.49 + 2000 * 0.011 = 32.49
        let rates = whud_rates();
        assert!((rates.water_only_cost(2000.0) - 27.17).abs() < 0.01);
        assert!((rates.sewer_only_cost(2000.0) - 32.49).abs() < 0.01);
        assert!((rates.water_bill(2000.0) - 59.66).abs() < 0.02);
    }

    #[test]
    fn bill_without_sewer_is_water_only() {
        let mut rates = whud_rates();
        rates.sewer = None;
        assert_eq!(rates.sewer_only_cost(1500.0), 0.0);
        assert_eq!(rates.water_bill(1500.0), rates.water_only_cost(1500.0));
    }

    #[test]
    fn zero_usage_is_base_charges() {
        let rates = whud_rates();
        assert!((rates.water_bill(0.0) - (9.85 + 10.49)).abs() < 1e-9);
    }

    #[test]
    fn missing_sewer_is_omitted_from_json() {
        let mut rates = whud_rates();
        rates.sewer = None;
        let value = serde_json::to_value(&rates).unwrap();
        assert!(value.get("sewer").is_none());
        assert!(value["water"].get("effective_date").is_none());

        let parsed: WaterRatesResponse = serde_json::from_value(value).unwrap();
        assert!(parsed.sewer.is_none());
    }
}
