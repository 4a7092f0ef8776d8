use crate::pricing::{plan_tiers, PlanTier};
use crate::route::{PlanId, Route, SetupProgress, SetupRoute};
use crate::view_model::PageView;

use super::{Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Select(PlanId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoosePlanPage {
    tiers: Vec<PlanTier>,
    selected: Option<PlanId>,
    error: Option<String>,
}

impl ChoosePlanPage {
    pub fn init(progress: SetupProgress, ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        (
            Self {
                tiers: plan_tiers(ctx.pricing),
                selected: progress.plan,
                error: None,
            },
            Vec::new(),
        )
    }
}

impl Page for ChoosePlanPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::Select(plan) => {
                if !self.tiers.iter().any(|tier| tier.id == plan) {
                    self.error = Some(format!("Unknown plan {plan}"));
                    return (self, Vec::new());
                }
                self.selected = Some(plan.clone());
                self.error = None;
                let next = Route::Setup(SetupRoute::SetupSettings(Some(SetupProgress {
                    plan: Some(plan),
                    org_settings_complete: false,
                })));
                (self, vec![Command::Navigate(next.to_url())])
            }
        }
    }

    fn view(&self) -> PageView {
        let lines = self.tiers.iter().map(|tier| {
            let marker = if self.selected.as_ref() == Some(&tier.id) {
                "*"
            } else {
                " "
            };
            let limit = tier
                .contact_limit
                .map(|n| format!("up to {n} contacts"))
                .unwrap_or_else(|| "unlimited contacts".into());
            format!(
                "{marker} {} ({}): ${:.2}/month, {limit}",
                tier.name, tier.id, tier.price.total_price
            )
        });
        PageView::new("Choose a plan")
            .lines(lines)
            .error(self.error.clone())
    }
}
