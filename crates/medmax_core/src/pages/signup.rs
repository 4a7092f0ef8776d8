use crate::api::{ApiRequest, ApiResult, RequestError, SignupRequest};
use crate::view_model::PageView;

use super::{describe_error, looks_like_email, required, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    OrganizationNameChanged(String),
    FirstNameChanged(String),
    LastNameChanged(String),
    EmailChanged(String),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupPage {
    organization_name: String,
    first_name: String,
    last_name: String,
    email: String,
    status: Status,
    error: Option<String>,
}

impl SignupPage {
    pub fn init() -> (Self, Vec<Command>) {
        (
            Self {
                organization_name: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                status: Status::Editing,
                error: None,
            },
            Vec::new(),
        )
    }

    pub fn is_submitted(&self) -> bool {
        self.status == Status::Submitted
    }

    fn request(&self) -> Result<SignupRequest, String> {
        let organization_name =
            required(&self.organization_name).ok_or("Organization name is required")?;
        let first_name = required(&self.first_name).ok_or("First name is required")?;
        let last_name = required(&self.last_name).ok_or("Last name is required")?;
        if !looks_like_email(&self.email) {
            return Err("Enter a valid email address".into());
        }
        Ok(SignupRequest {
            organization_name,
            first_name,
            last_name,
            email: self.email.trim().to_string(),
        })
    }
}

impl Page for SignupPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::OrganizationNameChanged(v) => self.organization_name = v,
            Msg::FirstNameChanged(v) => self.first_name = v,
            Msg::LastNameChanged(v) => self.last_name = v,
            Msg::EmailChanged(v) => self.email = v,
            Msg::Submit => {
                if self.status != Status::Editing {
                    return (self, Vec::new());
                }
                return match self.request() {
                    Ok(request) => {
                        self.status = Status::Submitting;
                        self.error = None;
                        (self, vec![Command::Fetch(ApiRequest::Signup(request))])
                    }
                    Err(message) => {
                        self.error = Some(message);
                        (self, Vec::new())
                    }
                };
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
        if !matches!(request, ApiRequest::Signup(_)) {
            return (self, Vec::new());
        }
        match result {
            Ok(_) => self.status = Status::Submitted,
            Err(RequestError::HttpStatus(409)) => {
                self.status = Status::Editing;
                self.error = Some("An organization with that email already exists".into());
            }
            Err(err) => {
                self.status = Status::Editing;
                self.error = Some(describe_error("Signup", &err));
            }
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let view = PageView::new("Create your organization");
        if self.status == Status::Submitted {
            return view.notice(format!(
                "We sent a verification link to {}. Open it to continue setup.",
                self.email.trim()
            ));
        }
        view.lines([
            format!("Organization: {}", self.organization_name),
            format!("Name: {} {}", self.first_name, self.last_name),
            format!("Email: {}", self.email),
        ])
        .error(self.error.clone())
    }
}
