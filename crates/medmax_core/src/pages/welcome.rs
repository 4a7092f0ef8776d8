use crate::view_model::PageView;

use super::{Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Continue,
}

/// Temporary landing page shown after an account is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomePage {
    organization: Option<String>,
}

impl WelcomePage {
    pub fn init(ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        let organization = ctx
            .user
            .and_then(|u| u.organization_name.clone())
            .or_else(|| ctx.user.map(|u| u.organization_slug.clone()))
            .filter(|name| !name.is_empty());
        (Self { organization }, Vec::new())
    }
}

impl Page for WelcomePage {
    type Msg = Msg;

    fn update(self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::Continue => (self, vec![Command::Navigate("/dashboard".into())]),
        }
    }

    fn view(&self) -> PageView {
        let line = match &self.organization {
            Some(org) => format!("{org} is ready to go."),
            None => "Your account is ready to go.".to_string(),
        };
        PageView::new("Welcome to Medicare Max").line(line)
    }
}
