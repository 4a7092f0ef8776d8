//! Medicare Max client core: routing, session and onboarding state machine,
//! the pricing engine and the page modules. Everything here is pure; the
//! host runtime executes the returned [`Effect`]s.
pub mod api;
mod effect;
mod msg;
mod page;
pub mod pages;
pub mod pricing;
pub mod route;
pub mod session;
mod state;
mod update;
mod view_model;

pub use api::{ApiRequest, ApiResponse, ApiResult, HttpMethod, RequestError};
pub use effect::{Effect, PageId, ReplyTo};
pub use msg::Msg;
pub use page::{ActivePage, PageMsg};
pub use route::{Access, PathParam, PlanId, Route, SetupProgress};
pub use session::{CurrentUser, OrganizationProgress, SessionState, SetupStep};
pub use state::{ActiveEntry, AppState};
pub use update::{update, ResolveMode};
pub use view_model::{AppViewModel, NavLink, PageView};
