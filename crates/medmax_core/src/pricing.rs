//! Subscription pricing and revenue projection for the pricing calculator.
//!
//! Everything here is a pure function of [`PricingInput`] and [`PricingConfig`].
//! Zero contacts yields zeroed revenue figures, never NaN.

use serde::{Deserialize, Serialize};

use crate::route::PlanId;

/// Lifetime value of a converted contact, in years of commission.
pub const LTV_YEARS: f64 = 3.0;
/// Last year shown on the projection chart (inclusive, starting at 0).
pub const CHART_YEARS: u32 = 6;
/// Age at which contacts become Medicare eligible.
pub const MEDICARE_AGE: f64 = 65.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Flat monthly fee covering the first `base_threshold` contacts.
    pub base_price: f64,
    pub base_threshold: u32,
    /// Monthly fee per contact above the threshold.
    pub per_contact_rate: f64,
    /// Launch discount as a fraction in `0.0..=1.0`; `None` disables it.
    pub launch_discount: Option<f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_price: 99.0,
            base_threshold: 250,
            per_contact_rate: 0.25,
            launch_discount: Some(0.5),
        }
    }
}

impl PricingConfig {
    fn discount_fraction(&self) -> f64 {
        self.launch_discount.unwrap_or(0.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingInput {
    pub contact_count: u32,
    pub average_contact_age_years: f64,
    pub annual_rollover_percent: f64,
    pub commission_rate_per_contact: f64,
}

impl Default for PricingInput {
    fn default() -> Self {
        Self {
            contact_count: 1000,
            average_contact_age_years: 70.0,
            annual_rollover_percent: 8.0,
            commission_rate_per_contact: 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    /// Base fee after any launch discount.
    pub base_price: f64,
    /// Per-contact rate after any launch discount.
    pub per_contact_rate: f64,
    pub extra_contacts: u32,
    pub total_price: f64,
    pub original_total_price: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevenueProjection {
    pub monthly_converted: f64,
    pub annual_converted: f64,
    pub ltv_per_contact: f64,
    pub annual_ltv: f64,
    pub annual_price: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub year: u32,
    pub base_case: f64,
    pub rollover_case: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub price: PriceBreakdown,
    pub revenue: RevenueProjection,
    pub chart: Vec<ChartPoint>,
    pub years_until_medicare: f64,
}

/// Graduated monthly price for `contacts`.
pub fn monthly_price(contacts: u32, config: &PricingConfig) -> PriceBreakdown {
    let extra_contacts = contacts.saturating_sub(config.base_threshold);
    let original_total_price =
        config.base_price + f64::from(extra_contacts) * config.per_contact_rate;

    let keep = 1.0 - config.discount_fraction();
    let base_price = config.base_price * keep;
    let per_contact_rate = config.per_contact_rate * keep;
    let total_price = base_price + f64::from(extra_contacts) * per_contact_rate;

    PriceBreakdown {
        base_price,
        per_contact_rate,
        extra_contacts,
        total_price,
        original_total_price,
        savings: original_total_price - total_price,
    }
}

pub fn project_revenue(input: &PricingInput, price: &PriceBreakdown) -> RevenueProjection {
    if input.contact_count == 0 {
        return RevenueProjection::default();
    }
    let contacts = f64::from(input.contact_count);
    let annual_rate = non_negative(input.annual_rollover_percent) / 100.0;
    let annual_converted = contacts * annual_rate;
    let ltv_per_contact = non_negative(input.commission_rate_per_contact) * LTV_YEARS;
    let annual_ltv = annual_converted * ltv_per_contact;
    let annual_price = price.total_price * 12.0;
    let roi = if annual_price > 0.0 {
        (annual_ltv - annual_price) / annual_price
    } else {
        0.0
    };

    RevenueProjection {
        monthly_converted: annual_converted / 12.0,
        annual_converted,
        ltv_per_contact,
        annual_ltv,
        annual_price,
        roi,
    }
}

/// Book value over years `0..=CHART_YEARS`: linear run-off versus monthly
/// compounding retention from rollovers. Values are clamped at zero.
pub fn chart_series(input: &PricingInput) -> Vec<ChartPoint> {
    let initial = f64::from(input.contact_count)
        * non_negative(input.commission_rate_per_contact)
        * LTV_YEARS;
    let monthly_growth = 1.0 + non_negative(input.annual_rollover_percent) / (100.0 * 12.0);

    (0..=CHART_YEARS)
        .map(|year| {
            let years = f64::from(year);
            let base_case = initial * (1.0 - years / LTV_YEARS);
            let rollover_case = initial * monthly_growth.powf(12.0 * years);
            ChartPoint {
                year,
                base_case: non_negative(base_case),
                rollover_case: non_negative(rollover_case),
            }
        })
        .collect()
}

pub fn estimate(input: &PricingInput, config: &PricingConfig) -> Estimate {
    let price = monthly_price(input.contact_count, config);
    let revenue = project_revenue(input, &price);
    Estimate {
        price,
        revenue,
        chart: chart_series(input),
        years_until_medicare: non_negative(MEDICARE_AGE - input.average_contact_age_years),
    }
}

/// A selectable plan on the onboarding plan picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanTier {
    pub id: PlanId,
    pub name: &'static str,
    pub contact_limit: Option<u32>,
    pub price: PriceBreakdown,
}

/// Plan tiers offered during onboarding, priced with the graduated model.
pub fn plan_tiers(config: &PricingConfig) -> Vec<PlanTier> {
    let tiers: [(&str, &str, Option<u32>); 3] = [
        ("basic", "Basic", Some(config.base_threshold)),
        ("pro", "Pro", Some(config.base_threshold.saturating_mul(4))),
        ("enterprise", "Enterprise", None),
    ];
    tiers
        .into_iter()
        .map(|(id, name, contact_limit)| PlanTier {
            id: PlanId::new(id),
            name,
            contact_limit,
            price: monthly_price(contact_limit.unwrap_or(config.base_threshold), config),
        })
        .collect()
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn discount_scales_base_and_rate() {
        let config = PricingConfig {
            base_price: 100.0,
            base_threshold: 10,
            per_contact_rate: 1.0,
            launch_discount: Some(0.25),
        };
        let price = monthly_price(20, &config);
        assert!(approx(price.original_total_price, 110.0));
        assert!(approx(price.total_price, 82.5));
        assert!(approx(price.savings, 27.5));
        assert_eq!(price.extra_contacts, 10);
    }

    #[test]
    fn zero_contacts_zeroes_revenue_and_chart() {
        let input = PricingInput {
            contact_count: 0,
            ..PricingInput::default()
        };
        let estimate = estimate(&input, &PricingConfig::default());
        assert_eq!(estimate.revenue, RevenueProjection::default());
        assert!(estimate
            .chart
            .iter()
            .all(|p| p.base_case == 0.0 && p.rollover_case == 0.0));
        assert!(!estimate.revenue.roi.is_nan());
    }

    #[test]
    fn revenue_uses_three_year_ltv() {
        let input = PricingInput {
            contact_count: 1200,
            average_contact_age_years: 70.0,
            annual_rollover_percent: 10.0,
            commission_rate_per_contact: 200.0,
        };
        let config = PricingConfig {
            launch_discount: None,
            ..PricingConfig::default()
        };
        let price = monthly_price(1200, &config);
        let revenue = project_revenue(&input, &price);
        assert!(approx(revenue.annual_converted, 120.0));
        assert!(approx(revenue.monthly_converted, 10.0));
        assert!(approx(revenue.ltv_per_contact, 600.0));
        assert!(approx(revenue.annual_ltv, 72_000.0));
        let annual_price = price.total_price * 12.0;
        assert!(approx(revenue.roi, (72_000.0 - annual_price) / annual_price));
    }

    #[test]
    fn chart_has_seven_points_and_base_case_runs_off() {
        let chart = chart_series(&PricingInput::default());
        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].year, 0);
        assert!(approx(chart[0].base_case, chart[0].rollover_case));
        assert_eq!(chart[3].base_case, 0.0);
        assert_eq!(chart[6].base_case, 0.0);
        assert!(chart[6].rollover_case > chart[1].rollover_case);
    }

    #[test]
    fn plan_tiers_are_ordered_by_price() {
        let tiers = plan_tiers(&PricingConfig::default());
        assert_eq!(tiers.len(), 3);
        assert!(tiers[0].price.total_price <= tiers[1].price.total_price);
        assert_eq!(tiers[2].id, PlanId::new("enterprise"));
    }
}
