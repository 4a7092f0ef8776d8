use crate::api::{ApiRequest, ApiResult};
use crate::view_model::PageView;

use super::{describe_error, looks_like_email, Command, Page, PageContext, Subscription};

/// Seconds before another login link may be requested.
pub const RESEND_COOLDOWN_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignedOut,
    SignedIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStatus {
    Idle,
    Submitting,
    LinkSent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    EmailChanged(String),
    Submit,
    CooldownTick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPage {
    mode: LoginMode,
    email: String,
    status: LoginStatus,
    resend_in: u32,
}

impl LoginPage {
    pub fn init(mode: LoginMode) -> (Self, Vec<Command>) {
        (
            Self {
                mode,
                email: String::new(),
                status: LoginStatus::Idle,
                resend_in: 0,
            },
            Vec::new(),
        )
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn status(&self) -> &LoginStatus {
        &self.status
    }

    pub fn resend_in(&self) -> u32 {
        self.resend_in
    }
}

impl Page for LoginPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::EmailChanged(email) => {
                self.email = email;
                if matches!(self.status, LoginStatus::Failed(_)) {
                    self.status = LoginStatus::Idle;
                }
                (self, Vec::new())
            }
            Msg::Submit => {
                if self.status == LoginStatus::Submitting || self.resend_in > 0 {
                    return (self, Vec::new());
                }
                if !looks_like_email(&self.email) {
                    self.status = LoginStatus::Failed("Enter a valid email address".into());
                    return (self, Vec::new());
                }
                self.status = LoginStatus::Submitting;
                let email = self.email.trim().to_string();
                (
                    self,
                    vec![Command::Fetch(ApiRequest::RequestLoginLink { email })],
                )
            }
            Msg::CooldownTick => {
                self.resend_in = self.resend_in.saturating_sub(1);
                (self, Vec::new())
            }
        }
    }

    fn completed(
        mut self,
        request: ApiRequest,
        result: ApiResult,
        _ctx: &PageContext<'_>,
    ) -> (Self, Vec<Command>) {
        if let ApiRequest::RequestLoginLink { .. } = request {
            match result {
                Ok(_) => {
                    self.status = LoginStatus::LinkSent;
                    self.resend_in = RESEND_COOLDOWN_SECS;
                }
                Err(err) => {
                    let message = describe_error("Sending the login link", &err);
                    self.status = LoginStatus::Failed(message);
                }
            }
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let mut view = PageView::new("Log in");
        if self.mode == LoginMode::SignedIn {
            view = view.notice("You are already signed in.");
        }
        view = view.line(format!("Email: {}", self.email));
        match &self.status {
            LoginStatus::Idle => view.line("We'll email you a one-time login link."),
            LoginStatus::Submitting => view.line("Sending login link..."),
            LoginStatus::LinkSent if self.resend_in > 0 => view
                .notice("Check your email for a login link.")
                .line(format!("You can request another link in {}s.", self.resend_in)),
            LoginStatus::LinkSent => view.notice("Check your email for a login link."),
            LoginStatus::Failed(message) => view.error(Some(message.clone())),
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        if self.resend_in > 0 {
            vec![Subscription::EverySecond(Msg::CooldownTick)]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, RequestError};
    use crate::pricing::PricingConfig;

    fn ctx(pricing: &PricingConfig) -> PageContext<'_> {
        PageContext {
            user: None,
            pricing,
        }
    }

    #[test]
    fn invalid_email_is_rejected_locally() {
        let pricing = PricingConfig::default();
        let (page, _) = LoginPage::init(LoginMode::SignedOut);
        let (page, _) = page.update(Msg::EmailChanged("nope".into()), &ctx(&pricing));
        let (page, cmds) = page.update(Msg::Submit, &ctx(&pricing));
        assert!(cmds.is_empty());
        assert!(matches!(page.status(), LoginStatus::Failed(_)));
    }

    #[test]
    fn sent_link_starts_cooldown_that_blocks_resend() {
        let pricing = PricingConfig::default();
        let (page, _) = LoginPage::init(LoginMode::SignedOut);
        let (page, _) = page.update(Msg::EmailChanged(" a@b.com ".into()), &ctx(&pricing));
        let (page, cmds) = page.update(Msg::Submit, &ctx(&pricing));
        assert_eq!(
            cmds,
            vec![Command::Fetch(ApiRequest::RequestLoginLink {
                email: "a@b.com".into()
            })]
        );
        let request = ApiRequest::RequestLoginLink {
            email: "a@b.com".into(),
        };
        let (page, _) = page.completed(request, Ok(ApiResponse::Ack), &ctx(&pricing));
        assert_eq!(page.resend_in(), RESEND_COOLDOWN_SECS);
        assert_eq!(page.subscriptions().len(), 1);

        let (page, cmds) = page.update(Msg::Submit, &ctx(&pricing));
        assert!(cmds.is_empty());
        let (page, _) = page.update(Msg::CooldownTick, &ctx(&pricing));
        assert_eq!(page.resend_in(), RESEND_COOLDOWN_SECS - 1);
    }

    #[test]
    fn failure_is_inline() {
        let pricing = PricingConfig::default();
        let (page, _) = LoginPage::init(LoginMode::SignedOut);
        let request = ApiRequest::RequestLoginLink {
            email: "a@b.com".into(),
        };
        let (page, _) = page.completed(request, Err(RequestError::Timeout), &ctx(&pricing));
        assert!(page.view().error.is_some());
    }
}
