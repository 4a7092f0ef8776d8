use crate::view_model::PageView;

use super::{Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    GetStarted,
    SeePricing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomePage;

impl HomePage {
    pub fn init() -> (Self, Vec<Command>) {
        (HomePage, Vec::new())
    }
}

impl Page for HomePage {
    type Msg = Msg;

    fn update(self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        let target = match msg {
            Msg::GetStarted => "/signup",
            Msg::SeePricing => "/pricing",
        };
        (self, vec![Command::Navigate(target.into())])
    }

    fn view(&self) -> PageView {
        PageView::new("Medicare Max").lines([
            "Keep your book of business when plans change.",
            "Automated quotes, eligibility checks and scheduling for your clients.",
        ])
    }
}
