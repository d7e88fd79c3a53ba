//! Vertical card display for rate snapshots.
//!
//! Cards are rendered into a `String` so `main` decides where they go.

use ratekeeper_core::{
    ProviderCatalog, ProviderDescriptor, RatesResponse, ResidentialStandard, WaterRatesResponse,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

// ── Public API ──

/// Electric rates card: header, residential standard section, audit section.
pub fn rates_card(resp: &RatesResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", resp.utility));
    out.push_str(&format!("{}\n", resp.source));
    out.push('\n');

    standard_section(&mut out, &resp.rates.residential_standard);

    let absent: Vec<&str> = [
        ("supplemental", resp.rates.residential_supplemental.is_present),
        ("seasonal", resp.rates.residential_seasonal.is_present),
        ("time-of-use", resp.rates.residential_tou.is_present),
    ]
    .into_iter()
    .filter(|(_, present)| !present)
    .map(|(name, _)| name)
    .collect();

    out.push_str("Source\n");
    row(&mut out, "source_url", &resp.source_url);
    row(&mut out, "fetched_at", &resp.fetched_at.format(TIMESTAMP_FORMAT));
    if !absent.is_empty() {
        row(&mut out, "not published", &absent.join(", "));
    }
    out
}

/// Water card. With `gallons`, appends an estimated monthly bill.
pub fn water_card(resp: &WaterRatesResponse, gallons: Option<f64>) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", resp.provider_name));
    if let Some(date) = &resp.water.effective_date {
        out.push_str(&format!("Effective {date}\n"));
    }
    out.push('\n');

    let water = &resp.water;
    out.push_str("Water\n");
    row(&mut out, "use_rate", &format!("${} / {}", water.use_rate, water.use_rate_unit));
    row(
        &mut out,
        "base_charge",
        &format!("{} ({})", usd(water.base_charge), water.default_meter_size),
    );
    if !water.meter_sizes.is_empty() {
        out.push_str("Meter base charges\n");
        let mut meters: Vec<(&String, &f64)> = water.meter_sizes.iter().collect();
        meters.sort_by(|a, b| a.1.total_cmp(b.1));
        for (size, charge) in meters {
            row(&mut out, size, &usd(*charge));
        }
    }

    if let Some(sewer) = &resp.sewer {
        out.push_str("Sewer\n");
        row(&mut out, "base_charge", &usd(sewer.base_charge));
        row(&mut out, "use_rate", &format!("${} / {}", sewer.use_rate, sewer.use_rate_unit));
    }

    if let Some(gallons) = gallons {
        out.push_str(&format!("Estimate for {gallons} gallons\n"));
        row(&mut out, "water", &usd(resp.water_only_cost(gallons)));
        if resp.sewer.is_some() {
            row(&mut out, "sewer", &usd(resp.sewer_only_cost(gallons)));
        }
        row(&mut out, "total", &usd(resp.water_bill(gallons)));
    }

    out.push_str("Source\n");
    row(&mut out, "fetched_at", &resp.fetched_at.format(TIMESTAMP_FORMAT));
    out
}

/// One line per provider, marking whether a parser is registered for it.
pub fn provider_table(catalog: &ProviderCatalog, has_parser: impl Fn(&ProviderDescriptor) -> bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} {:<9} {:<7} {}\n", "KEY", "TYPE", "PARSER", "NAME"));
    for p in catalog.iter() {
        let parser = if has_parser(p) { "yes" } else { "no" };
        out.push_str(&format!(
            "{:<8} {:<9} {:<7} {}\n",
            p.key,
            p.provider_type.as_str(),
            parser,
            p.name
        ));
    }
    out
}

// ── Section rendering ──

fn standard_section(out: &mut String, rs: &ResidentialStandard) {
    out.push_str("Residential Standard\n");
    if !rs.is_present {
        row(out, "status", &"not published");
        return;
    }
    row(out, "customer_charge", &format!("{} / month", usd(rs.customer_charge_monthly_usd)));
    row(
        out,
        "energy_rate",
        &format!(
            "${:.5} / kWh ({:.3}¢)",
            rs.energy_rate_usd_per_kwh, rs.energy_rate_cents_per_kwh
        ),
    );
    row(
        out,
        "fuel_rate",
        &format!(
            "${:.5} / kWh ({:.3}¢)",
            rs.tva_fuel_rate_usd_per_kwh, rs.tva_fuel_rate_cents_per_kwh
        ),
    );
}

fn row(out: &mut String, label: &str, value: &dyn std::fmt::Display) {
    out.push_str(&format!("  {:<26} {}\n", label, value));
}

fn usd(v: f64) -> String {
    format!("${v:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratekeeper_core::{SewerRateDetails, WaterRateDetails};

    fn nes() -> RatesResponse {
        RatesResponse::residential(
            "NES",
            "NES Residential Rates PDF",
            "https://www.nespower.com/rates/",
            ResidentialStandard::from_dollars(18.56, 0.09254, 0.015, ""),
        )
    }

    fn whud() -> WaterRatesResponse {
        WaterRatesResponse {
            provider_key: "whud".into(),
            provider_name: "White House Utility District".into(),
            water: WaterRateDetails {
                meter_sizes: [("5/8 x 3/4 inch".to_string(), 9.85), ("1 inch".to_string(), 13.37)]
                    .into_iter()
                    .collect(),
                default_meter_size: "5/8 x 3/4 inch".into(),
                base_charge: 9.85,
                use_rate: 0.00866,
                use_rate_unit: "gallon".into(),
                effective_date: Some("2025".into()),
            },
            sewer: Some(SewerRateDetails {
                base_charge: 10.49,
                use_rate: 0.011,
                use_rate_unit: "gallon".into(),
                effective_date: Some("2025".into()),
            }),
            ..WaterRatesResponse::default()
        }
    }

    #[test]
    fn rates_card_shows_standard_charges() {
        let card = rates_card(&nes());
        assert!(card.starts_with("=== NES ===\n"));
        assert!(card.contains("$18.56 / month"));
        assert!(card.contains("$0.09254 / kWh (9.254¢)"));
        assert!(card.contains("supplemental, seasonal, time-of-use"));
    }

    #[test]
    fn rows_are_label_aligned_lines() {
        let card = rates_card(&nes());
        let expected = format!("  {:<26} {}", "customer_charge", "$18.56 / month");
        assert!(card.lines().any(|l| l == expected));
        assert!(card.ends_with('\n'));
        assert_eq!(card.lines().nth(1), Some("NES Residential Rates PDF"));
        assert_eq!(card.lines().nth(2), Some(""));
    }

    #[test]
    fn absent_standard_is_marked() {
        let card = rates_card(&RatesResponse::default());
        assert!(card.contains("not published"));
        assert!(!card.contains("customer_charge"));
    }

    #[test]
    fn water_card_with_estimate() {
        let card = water_card(&whud(), Some(2000.0));
        assert!(card.contains("Effective 2025"));
        assert!(card.contains("$9.85 (5/8 x 3/4 inch)"));
        assert!(card.contains("Estimate for 2000 gallons"));
        assert!(card.contains("$27.17"));
        assert!(card.contains("$32.49"));
        assert!(card.contains("$59.66"));
    }

    #[test]
    fn water_card_meters_sorted_by_charge() {
        let card = water_card(&whud(), None);
        let small = card.find("5/8 x 3/4 inch  ").unwrap();
        let one = card.find("1 inch").unwrap();
        assert!(small < one);
        assert!(!card.contains("Estimate"));
    }

    #[test]
    fn provider_table_lists_every_provider() {
        let catalog = ProviderCatalog::defaults();
        let table = provider_table(&catalog, |p| p.key != "kub");
        assert_eq!(table.lines().count(), catalog.len() + 1);
        assert!(table.lines().any(|l| l.starts_with("kub") && l.contains(" no ")));
        assert!(table.lines().any(|l| l.starts_with("whud") && l.contains("water")));
    }
}
