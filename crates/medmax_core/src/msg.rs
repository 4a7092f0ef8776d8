use crate::api::{ApiRequest, ApiResult};
use crate::effect::{PageId, ReplyTo};
use crate::page::PageMsg;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The host location changed (initial load, `PushUrl`, or history back).
    UrlChanged(String),
    /// User followed a link; internal links become a history push.
    LinkClicked(String),
    /// A request finished. `request` is echoed so handlers can attribute the result.
    ApiCompleted {
        reply: ReplyTo,
        request: ApiRequest,
        result: ApiResult,
    },
    /// Input for the page with the given generation id.
    Page { page: PageId, msg: PageMsg },
    LogoutClicked,
    /// One-second clock, delivered only while the active page subscribes to it.
    Tick,
    NoOp,
}
