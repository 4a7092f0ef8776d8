use medmax_core::pricing::{estimate, monthly_price, PricingConfig, PricingInput};

fn no_discount() -> PricingConfig {
    PricingConfig {
        launch_discount: None,
        ..PricingConfig::default()
    }
}

#[test]
fn price_is_flat_up_to_the_threshold() {
    for config in [PricingConfig::default(), no_discount()] {
        let at_zero = monthly_price(0, &config).total_price;
        for contacts in [1, 100, 249, 250] {
            assert_eq!(monthly_price(contacts, &config).total_price, at_zero);
        }
        assert!(monthly_price(251, &config).total_price > at_zero);
    }
}

#[test]
fn price_never_decreases_with_more_contacts() {
    let config = PricingConfig::default();
    let mut previous = monthly_price(0, &config).total_price;
    for contacts in (0..=5_000).step_by(37) {
        let total = monthly_price(contacts, &config).total_price;
        assert!(total >= previous, "{contacts} contacts: {total} < {previous}");
        previous = total;
    }
}

#[test]
fn savings_match_the_discount() {
    let config = PricingConfig::default();
    for contacts in [0, 250, 1_000, 12_345] {
        let price = monthly_price(contacts, &config);
        assert!((price.original_total_price - price.total_price - price.savings).abs() < 1e-9);
        assert!((price.total_price - price.original_total_price * 0.5).abs() < 1e-9);
    }

    let price = monthly_price(1_000, &no_discount());
    assert_eq!(price.savings, 0.0);
    assert_eq!(price.total_price, price.original_total_price);
    assert_eq!(price.total_price, 99.0 + 750.0 * 0.25);
}

#[test]
fn zero_contacts_produce_no_nan() {
    let input = PricingInput {
        contact_count: 0,
        ..PricingInput::default()
    };
    let estimate = estimate(&input, &PricingConfig::default());
    let r = estimate.revenue;
    for value in [
        r.monthly_converted,
        r.annual_converted,
        r.annual_ltv,
        r.annual_price,
        r.roi,
    ] {
        assert_eq!(value, 0.0);
    }
    for point in &estimate.chart {
        assert_eq!(point.base_case, 0.0);
        assert_eq!(point.rollover_case, 0.0);
    }
}
