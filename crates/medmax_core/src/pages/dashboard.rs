use crate::view_model::PageView;

use super::{Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    OpenContacts,
    OpenSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPage {
    greeting: String,
}

impl DashboardPage {
    pub fn init(ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        let greeting = match ctx.user {
            Some(user) => format!("Welcome back, {}", user.display_name()),
            None => "Welcome back".to_string(),
        };
        (Self { greeting }, Vec::new())
    }
}

impl Page for DashboardPage {
    type Msg = Msg;

    fn update(self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        let target = match msg {
            Msg::OpenContacts => "/contacts",
            Msg::OpenSettings => "/settings",
        };
        (self, vec![Command::Navigate(target.to_string())])
    }

    fn view(&self) -> PageView {
        PageView::new("Dashboard")
            .line(self.greeting.clone())
            .line("Review your contacts or adjust carrier settings from the menu.")
    }
}
