use crate::api::{ApiRequest, ApiResult, CallbackRequest, TrackingEvent};
use crate::view_model::PageView;

use super::{describe_error, looks_like_email, required, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    NameChanged(String),
    EmailChanged(String),
    PhoneChanged(String),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Editing,
    Submitting,
    Requested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePage {
    quote_id: Option<String>,
    status_param: Option<String>,
    tracking_id: Option<String>,
    name: String,
    email: String,
    phone: String,
    status: Status,
    error: Option<String>,
}

impl SchedulePage {
    pub fn init(
        quote_id: Option<String>,
        status_param: Option<String>,
        tracking_id: Option<String>,
    ) -> (Self, Vec<Command>) {
        let commands = tracking_id
            .iter()
            .map(|tid| Command::Track(TrackingEvent::new(tid.clone(), "schedule_opened")))
            .collect();
        (
            Self {
                quote_id,
                status_param,
                tracking_id,
                name: String::new(),
                email: String::new(),
                phone: String::new(),
                status: Status::Editing,
                error: None,
            },
            commands,
        )
    }

    fn headline(&self) -> &'static str {
        match self.status_param.as_deref() {
            Some("accept") => "Good news: you are likely to qualify for a new plan.",
            Some("decline") => "Let's talk through your options together.",
            _ => "Schedule a call with your agent.",
        }
    }
}

impl Page for SchedulePage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::NameChanged(v) => self.name = v,
            Msg::EmailChanged(v) => self.email = v,
            Msg::PhoneChanged(v) => self.phone = v,
            Msg::Submit => {
                if self.status != Status::Editing {
                    return (self, Vec::new());
                }
                let Some(name) = required(&self.name) else {
                    self.error = Some("Please enter your name".into());
                    return (self, Vec::new());
                };
                let Some(phone) = required(&self.phone) else {
                    self.error = Some("Please enter a phone number".into());
                    return (self, Vec::new());
                };
                if !looks_like_email(&self.email) {
                    self.error = Some("Enter a valid email address".into());
                    return (self, Vec::new());
                }
                self.status = Status::Submitting;
                self.error = None;
                let request = CallbackRequest {
                    quote_id: self.quote_id.clone(),
                    tracking_id: self.tracking_id.clone(),
                    name,
                    email: self.email.trim().to_string(),
                    phone,
                };
                return (self, vec![Command::Fetch(ApiRequest::RequestCallback(request))]);
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
        if matches!(request, ApiRequest::RequestCallback(_)) {
            match result {
                Ok(_) => self.status = Status::Requested,
                Err(err) => {
                    self.status = Status::Editing;
                    self.error = Some(describe_error("Requesting a call", &err));
                }
            }
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let view = PageView::new("Schedule a call").line(self.headline());
        match self.status {
            Status::Requested => view.notice("Thanks! Your agent will reach out shortly."),
            Status::Submitting => view.line("Sending your request..."),
            Status::Editing => view
                .lines([
                    format!("Name: {}", self.name),
                    format!("Email: {}", self.email),
                    format!("Phone: {}", self.phone),
                ])
                .error(self.error.clone()),
        }
    }
}
