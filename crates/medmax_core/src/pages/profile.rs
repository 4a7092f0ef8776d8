use crate::api::{ApiRequest, ApiResult, ProfileUpdate};
use crate::view_model::PageView;

use super::{describe_error, required, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    FirstNameChanged(String),
    LastNameChanged(String),
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePage {
    email: String,
    first_name: String,
    last_name: String,
    saving: bool,
    notice: Option<String>,
    error: Option<String>,
}

impl ProfilePage {
    pub fn init(ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        let user = ctx.user.cloned().unwrap_or_default();
        (
            Self {
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                saving: false,
                notice: None,
                error: None,
            },
            Vec::new(),
        )
    }
}

impl Page for ProfilePage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        self.notice = None;
        match msg {
            Msg::FirstNameChanged(v) => self.first_name = v,
            Msg::LastNameChanged(v) => self.last_name = v,
            Msg::Save => {
                if self.saving {
                    return (self, Vec::new());
                }
                let (Some(first_name), Some(last_name)) =
                    (required(&self.first_name), required(&self.last_name))
                else {
                    self.error = Some("First and last name are required".into());
                    return (self, Vec::new());
                };
                self.saving = true;
                self.error = None;
                let request = ApiRequest::UpdateProfile(ProfileUpdate {
                    first_name,
                    last_name,
                });
                return (self, vec![Command::Fetch(request)]);
            }
        }
        (self, Vec::new())
    }

    fn completed(
        mut self,
        request: ApiRequest,
        result: ApiResult,
        _ctx: &PageContext<'_>,
    ) -> (Self, Vec<Command>) {
        if matches!(request, ApiRequest::UpdateProfile(_)) {
            self.saving = false;
            match result {
                Ok(_) => self.notice = Some("Profile updated".into()),
                Err(err) => self.error = Some(describe_error("Saving your profile", &err)),
            }
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let mut view = PageView::new("Profile")
            .lines([
                format!("Email: {}", self.email),
                format!("First name: {}", self.first_name),
                format!("Last name: {}", self.last_name),
            ])
            .error(self.error.clone());
        if let Some(notice) = &self.notice {
            view = view.notice(notice.clone());
        }
        view
    }
}
