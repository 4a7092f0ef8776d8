use crate::route::{CompareParams, PublicRoute, Route};
use crate::view_model::PageView;

use super::{Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Move on to the health questions for the quoted contact.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparePage {
    params: CompareParams,
}

impl ComparePage {
    pub fn init(params: CompareParams) -> (Self, Vec<Command>) {
        (Self { params }, Vec::new())
    }
}

impl Page for ComparePage {
    type Msg = Msg;

    fn update(self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::Continue => {
                let next = Route::Public(PublicRoute::Eligibility {
                    quote_id: self.params.quote_id.clone(),
                    tracking_id: self.params.tracking_id.clone(),
                });
                (self, vec![Command::Navigate(next.to_url())])
            }
        }
    }

    fn view(&self) -> PageView {
        let p = &self.params;
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        let view = PageView::new("Compare plans").lines([
            format!("Location: {} {} ({})", show(&p.zip), show(&p.state), show(&p.county)),
            format!(
                "Applicant: gender {}, age {}, tobacco {}",
                show(&p.gender),
                p.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
                p.tobacco.map(|t| if t { "yes" } else { "no" }).unwrap_or("-")
            ),
            format!(
                "Current coverage: plan {} with {}",
                show(&p.plan_type),
                show(&p.current_carrier)
            ),
        ]);
        if p.zip.is_none() || (p.date_of_birth.is_none() && p.age.is_none()) {
            view.error(Some("A ZIP code and age are needed to compare plans".into()))
        } else {
            view
        }
    }
}
