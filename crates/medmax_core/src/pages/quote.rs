use crate::api::{ApiRequest, ApiResponse, ApiResult, QuoteData, RequestError};
use crate::route::{PublicRoute, Route};
use crate::view_model::PageView;

use super::{describe_error, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    ContinueToEligibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteState {
    Missing,
    Loading,
    Loaded(QuoteData),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePage {
    quote_id: Option<String>,
    tracking_id: Option<String>,
    state: QuoteState,
}

impl QuotePage {
    /// Fetches the stored quote when an id is present.
    pub fn init(quote_id: Option<String>, tracking_id: Option<String>) -> (Self, Vec<Command>) {
        let (state, commands) = match &quote_id {
            Some(id) => (
                QuoteState::Loading,
                vec![Command::Fetch(ApiRequest::FetchQuote {
                    quote_id: id.clone(),
                })],
            ),
            None => (QuoteState::Missing, Vec::new()),
        };
        (
            Self {
                quote_id,
                tracking_id,
                state,
            },
            commands,
        )
    }

    pub fn state(&self) -> &QuoteState {
        &self.state
    }
}

impl Page for QuotePage {
    type Msg = Msg;

    fn update(self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::ContinueToEligibility => {
                if !matches!(self.state, QuoteState::Loaded(_)) {
                    return (self, Vec::new());
                }
                let url = Route::Public(PublicRoute::Eligibility {
                    quote_id: self.quote_id.clone(),
                    tracking_id: self.tracking_id.clone(),
                })
                .to_url();
                (self, vec![Command::Navigate(url)])
            }
        }
    }

    fn completed(
        mut self,
        request: ApiRequest,
        result: ApiResult,
        _ctx: &PageContext<'_>,
    ) -> (Self, Vec<Command>) {
        if !matches!(request, ApiRequest::FetchQuote { .. }) {
            return (self, Vec::new());
        }
        self.state = match result {
            Ok(ApiResponse::Quote(data)) => QuoteState::Loaded(data),
            Ok(other) => QuoteState::Failed(format!("Unexpected quote response: {other:?}")),
            Err(RequestError::HttpStatus(404)) => QuoteState::Failed("Quote not found".into()),
            Err(err) => QuoteState::Failed(describe_error("Loading your quote", &err)),
        };
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let view = PageView::new("Your quote");
        match &self.state {
            QuoteState::Missing => view.error(Some("This link is missing a quote id".into())),
            QuoteState::Loading => view.line("Loading your quote..."),
            QuoteState::Loaded(data) => {
                let c = &data.contact;
                view.lines([
                    format!("Prepared for {} {}", c.first_name, c.last_name),
                    format!("ZIP {} ({}), born {}", c.zip_code, c.state, c.birth_date),
                    format!(
                        "Current plan {} with {}",
                        c.plan_type, c.current_carrier
                    ),
                ])
            }
            QuoteState::Failed(message) => view.error(Some(message.clone())),
        }
    }
}
