//! Public pricing calculator page.

use crate::pricing::{estimate, PricingConfig, PricingInput};
use crate::view_model::PageView;

use super::{Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    ContactsChanged(String),
    RolloverChanged(String),
    CommissionChanged(String),
    AgeChanged(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorPage {
    input: PricingInput,
    config: PricingConfig,
    invalid_field: Option<&'static str>,
}

impl CalculatorPage {
    pub fn init(ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        (
            Self {
                input: PricingInput::default(),
                config: ctx.pricing.clone(),
                invalid_field: None,
            },
            Vec::new(),
        )
    }

    pub fn input(&self) -> &PricingInput {
        &self.input
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_start_matches('$')
        .trim_end_matches('%')
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

impl Page for CalculatorPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        let (field, parsed) = match &msg {
            Msg::ContactsChanged(raw) => ("contacts", parse_amount(raw)),
            Msg::RolloverChanged(raw) => ("rollover", parse_amount(raw)),
            Msg::CommissionChanged(raw) => ("commission", parse_amount(raw)),
            Msg::AgeChanged(raw) => ("age", parse_amount(raw)),
        };
        let Some(value) = parsed else {
            // Keep the last good value so the estimate stays meaningful.
            self.invalid_field = Some(field);
            return (self, Vec::new());
        };
        self.invalid_field = None;
        match msg {
            Msg::ContactsChanged(_) => self.input.contact_count = value.round() as u32,
            Msg::RolloverChanged(_) => self.input.annual_rollover_percent = value.min(100.0),
            Msg::CommissionChanged(_) => self.input.commission_rate_per_contact = value,
            Msg::AgeChanged(_) => self.input.average_contact_age_years = value,
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let estimate = estimate(&self.input, &self.config);
        let price = &estimate.price;
        let revenue = &estimate.revenue;
        let mut view = PageView::new("Pricing").lines([
            format!(
                "{} contacts, {:.1}% annual rollover, ${:.2} commission",
                self.input.contact_count,
                self.input.annual_rollover_percent,
                self.input.commission_rate_per_contact
            ),
            format!("Monthly price: ${:.2}", price.total_price),
            format!(
                "Annual conversions: {:.1} ({:.1}/month)",
                revenue.annual_converted, revenue.monthly_converted
            ),
            format!("Annual lifetime value: ${:.2}", revenue.annual_ltv),
            format!("ROI: {:.0}%", revenue.roi * 100.0),
        ]);
        if price.savings > 0.0 {
            view = view.notice(format!(
                "Launch pricing: ${:.2} instead of ${:.2} (save ${:.2}/month)",
                price.total_price, price.original_total_price, price.savings
            ));
        }
        for point in &estimate.chart {
            view = view.line(format!(
                "Year {}: base ${:.0}, with rollovers ${:.0}",
                point.year, point.base_case, point.rollover_case
            ));
        }
        if estimate.years_until_medicare > 0.0 {
            view = view.line(format!(
                "Average contact reaches Medicare age in {:.1} years",
                estimate.years_until_medicare
            ));
        }
        view.error(
            self.invalid_field
                .map(|field| format!("Enter a non-negative number for {field}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_input_keeps_previous_value() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let (page, _) = CalculatorPage::init(&ctx);
        let (page, _) = page.update(Msg::ContactsChanged("1,500".into()), &ctx);
        assert_eq!(page.input().contact_count, 1500);
        let (page, _) = page.update(Msg::ContactsChanged("lots".into()), &ctx);
        assert_eq!(page.input().contact_count, 1500);
        assert!(page.view().error.is_some());
    }
}
