use crate::api::ApiRequest;

/// Generation id of a page instance. Bumped on every page replacement.
pub type PageId = u64;

/// Where the completion of an [`Effect::Api`] should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTo {
    Router,
    Page(PageId),
    /// Fire-and-forget; the completion is only logged.
    Discard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Push a history entry; the host answers with `Msg::UrlChanged`.
    PushUrl(String),
    /// Leave the application for an external address.
    LoadExternal(String),
    Api { request: ApiRequest, reply: ReplyTo },
    /// Persist (or forget) the session token and attach it to later requests.
    SetSessionToken(Option<String>),
}
