//! Page modules. Each page owns its state and talks to the router only
//! through [`Command`]s; none of them knows about another page.

use crate::api::{ApiRequest, ApiResult, RequestError, TrackingEvent};
use crate::pricing::PricingConfig;
use crate::session::CurrentUser;
use crate::view_model::PageView;

pub mod agents;
pub mod calculator;
pub mod choose_plan;
pub mod compare;
pub mod contact;
pub mod contact_form;
pub mod contacts;
pub mod dashboard;
pub mod eligibility;
pub mod home;
pub mod login;
pub mod profile;
pub mod quote;
pub mod schedule;
pub mod settings;
pub mod signup;
pub mod welcome;

/// Read-only router state a page may consult.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub user: Option<&'a CurrentUser>,
    pub pricing: &'a PricingConfig,
}

/// Requests a page makes of the router.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Perform a request and deliver the result back to this page instance.
    Fetch(ApiRequest),
    /// Post a tracking event; the result is ignored.
    Track(TrackingEvent),
    Navigate(String),
    /// Onboarding finished; the router stops gating protected routes.
    SetupFinished,
}

/// Passive event sources a page listens to while it is active.
#[derive(Debug, Clone, PartialEq)]
pub enum Subscription<M> {
    EverySecond(M),
}

impl<M> Subscription<M> {
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> Subscription<N> {
        match self {
            Subscription::EverySecond(msg) => Subscription::EverySecond(f(msg)),
        }
    }
}

/// The page side of the init/update/view/subscriptions quad.
/// `init` is an inherent constructor because each page takes different parameters.
pub trait Page: Sized {
    type Msg;

    fn update(self, msg: Self::Msg, ctx: &PageContext<'_>) -> (Self, Vec<Command>);

    /// A request issued by this page instance has completed.
    fn completed(
        self,
        _request: ApiRequest,
        _result: ApiResult,
        _ctx: &PageContext<'_>,
    ) -> (Self, Vec<Command>) {
        (self, Vec::new())
    }

    fn view(&self) -> PageView;

    fn subscriptions(&self) -> Vec<Subscription<Self::Msg>> {
        Vec::new()
    }
}

/// Inline text for a failed page request.
pub(crate) fn describe_error(action: &str, err: &RequestError) -> String {
    match err {
        RequestError::HttpStatus(401) | RequestError::HttpStatus(403) => {
            format!("{action} failed: you are not allowed to do that")
        }
        RequestError::Timeout | RequestError::Network(_) => {
            format!("{action} failed: the server could not be reached")
        }
        other => format!("{action} failed: {other}"),
    }
}

/// Trims form input and rejects empty values.
pub(crate) fn required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}
