//! The active page as one exclusive enum, and the single match that routes
//! messages into it.

use crate::api::{ApiRequest, ApiResult};
use crate::pages::agents::{self, AgentsMode, AgentsPage};
use crate::pages::calculator::{self, CalculatorPage};
use crate::pages::choose_plan::{self, ChoosePlanPage};
use crate::pages::compare::{self, ComparePage};
use crate::pages::contact::{self, ContactPage};
use crate::pages::contacts::{self, ContactsPage};
use crate::pages::dashboard::{self, DashboardPage};
use crate::pages::eligibility::{self, EligibilityPage};
use crate::pages::home::{self, HomePage};
use crate::pages::login::{self, LoginMode, LoginPage};
use crate::pages::profile::{self, ProfilePage};
use crate::pages::quote::{self, QuotePage};
use crate::pages::schedule::{self, SchedulePage};
use crate::pages::settings::{self, SettingsMode, SettingsPage};
use crate::pages::signup::{self, SignupPage};
use crate::pages::welcome::{self, WelcomePage};
use crate::pages::{Command, Page, PageContext, Subscription};
use crate::route::{ProtectedRoute, PublicRoute, Route, SetupRoute};
use crate::view_model::PageView;

#[derive(Debug, Clone, PartialEq)]
pub enum ActivePage {
    /// Waiting for the session check before a non-public route can be decided.
    Loading,
    NotFound { url: String },
    Verifying { org_slug: String },
    Home(HomePage),
    Login(LoginPage),
    Signup(SignupPage),
    Pricing(CalculatorPage),
    Compare(ComparePage),
    Quote(QuotePage),
    Eligibility(EligibilityPage),
    Schedule(SchedulePage),
    Dashboard(DashboardPage),
    Contacts(ContactsPage),
    Contact(ContactPage),
    Settings(SettingsPage),
    Profile(ProfilePage),
    Welcome(WelcomePage),
    Agents(AgentsPage),
    ChoosePlan(ChoosePlanPage),
}

/// A message addressed to one kind of page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMsg {
    Home(home::Msg),
    Login(login::Msg),
    Signup(signup::Msg),
    Pricing(calculator::Msg),
    Compare(compare::Msg),
    Quote(quote::Msg),
    Eligibility(eligibility::Msg),
    Schedule(schedule::Msg),
    Dashboard(dashboard::Msg),
    Contacts(contacts::Msg),
    Contact(contact::Msg),
    Settings(settings::Msg),
    Profile(profile::Msg),
    Welcome(welcome::Msg),
    Agents(agents::Msg),
    ChoosePlan(choose_plan::Msg),
}

impl ActivePage {
    /// Builds the page for a route that already passed the access guards.
    pub(crate) fn init(
        route: &Route,
        url: &str,
        signed_in: bool,
        ctx: &PageContext<'_>,
    ) -> (ActivePage, Vec<Command>) {
        match route {
            Route::NotFound => (
                ActivePage::NotFound {
                    url: url.to_string(),
                },
                Vec::new(),
            ),
            Route::Public(public) => match public {
                PublicRoute::Home => wrap(HomePage::init(), ActivePage::Home),
                PublicRoute::Login => {
                    let mode = if signed_in {
                        LoginMode::SignedIn
                    } else {
                        LoginMode::SignedOut
                    };
                    wrap(LoginPage::init(mode), ActivePage::Login)
                }
                PublicRoute::Signup => wrap(SignupPage::init(), ActivePage::Signup),
                PublicRoute::Pricing => wrap(CalculatorPage::init(ctx), ActivePage::Pricing),
                PublicRoute::VerifyMagicLink { org_slug, .. } => (
                    ActivePage::Verifying {
                        org_slug: org_slug.to_string(),
                    },
                    Vec::new(),
                ),
                PublicRoute::Compare(params) => {
                    wrap(ComparePage::init(params.clone()), ActivePage::Compare)
                }
                PublicRoute::Quote {
                    quote_id,
                    tracking_id,
                } => wrap(
                    QuotePage::init(present(quote_id), present(tracking_id)),
                    ActivePage::Quote,
                ),
                PublicRoute::Eligibility {
                    quote_id,
                    tracking_id,
                } => wrap(
                    EligibilityPage::init(present(quote_id), present(tracking_id)),
                    ActivePage::Eligibility,
                ),
                PublicRoute::Schedule {
                    quote_id,
                    status,
                    tracking_id,
                } => wrap(
                    SchedulePage::init(present(quote_id), present(status), present(tracking_id)),
                    ActivePage::Schedule,
                ),
            },
            Route::Protected(protected) => match protected {
                ProtectedRoute::Dashboard => {
                    wrap(DashboardPage::init(ctx), ActivePage::Dashboard)
                }
                ProtectedRoute::Contacts => wrap(ContactsPage::init(), ActivePage::Contacts),
                ProtectedRoute::Contact { id } => {
                    wrap(ContactPage::init(id.to_string()), ActivePage::Contact)
                }
                ProtectedRoute::Settings => wrap(
                    SettingsPage::init(SettingsMode::Standalone),
                    ActivePage::Settings,
                ),
                ProtectedRoute::Profile => wrap(ProfilePage::init(ctx), ActivePage::Profile),
                ProtectedRoute::TempLanding => wrap(WelcomePage::init(ctx), ActivePage::Welcome),
                ProtectedRoute::Agents => wrap(
                    AgentsPage::init(AgentsMode::Standalone),
                    ActivePage::Agents,
                ),
            },
            Route::Setup(setup) => {
                let progress = setup.progress();
                match setup {
                    SetupRoute::ChoosePlan(_) => wrap(
                        ChoosePlanPage::init(progress, ctx),
                        ActivePage::ChoosePlan,
                    ),
                    SetupRoute::SetupSettings(_) => wrap(
                        SettingsPage::init(SettingsMode::Setup(progress)),
                        ActivePage::Settings,
                    ),
                    SetupRoute::SetupAddAgents(_) => wrap(
                        AgentsPage::init(AgentsMode::Setup(progress)),
                        ActivePage::Agents,
                    ),
                }
            }
        }
    }

    /// Whether this is a real page rather than a router placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ActivePage::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivePage::Loading => "loading",
            ActivePage::NotFound { .. } => "not_found",
            ActivePage::Verifying { .. } => "verifying",
            ActivePage::Home(_) => "home",
            ActivePage::Login(_) => "login",
            ActivePage::Signup(_) => "signup",
            ActivePage::Pricing(_) => "pricing",
            ActivePage::Compare(_) => "compare",
            ActivePage::Quote(_) => "quote",
            ActivePage::Eligibility(_) => "eligibility",
            ActivePage::Schedule(_) => "schedule",
            ActivePage::Dashboard(_) => "dashboard",
            ActivePage::Contacts(_) => "contacts",
            ActivePage::Contact(_) => "contact",
            ActivePage::Settings(_) => "settings",
            ActivePage::Profile(_) => "profile",
            ActivePage::Welcome(_) => "welcome",
            ActivePage::Agents(_) => "agents",
            ActivePage::ChoosePlan(_) => "choose_plan",
        }
    }

    /// Routes a message into the page. A message for a different kind of page
    /// comes back in `Err` untouched.
    pub(crate) fn update(
        self,
        msg: PageMsg,
        ctx: &PageContext<'_>,
    ) -> Result<(ActivePage, Vec<Command>), (ActivePage, PageMsg)> {
        let stepped = match (self, msg) {
            (ActivePage::Home(p), PageMsg::Home(m)) => step(p, m, ctx, ActivePage::Home),
            (ActivePage::Login(p), PageMsg::Login(m)) => step(p, m, ctx, ActivePage::Login),
            (ActivePage::Signup(p), PageMsg::Signup(m)) => step(p, m, ctx, ActivePage::Signup),
            (ActivePage::Pricing(p), PageMsg::Pricing(m)) => step(p, m, ctx, ActivePage::Pricing),
            (ActivePage::Compare(p), PageMsg::Compare(m)) => step(p, m, ctx, ActivePage::Compare),
            (ActivePage::Quote(p), PageMsg::Quote(m)) => step(p, m, ctx, ActivePage::Quote),
            (ActivePage::Eligibility(p), PageMsg::Eligibility(m)) => {
                step(p, m, ctx, ActivePage::Eligibility)
            }
            (ActivePage::Schedule(p), PageMsg::Schedule(m)) => {
                step(p, m, ctx, ActivePage::Schedule)
            }
            (ActivePage::Dashboard(p), PageMsg::Dashboard(m)) => {
                step(p, m, ctx, ActivePage::Dashboard)
            }
            (ActivePage::Contacts(p), PageMsg::Contacts(m)) => {
                step(p, m, ctx, ActivePage::Contacts)
            }
            (ActivePage::Contact(p), PageMsg::Contact(m)) => step(p, m, ctx, ActivePage::Contact),
            (ActivePage::Settings(p), PageMsg::Settings(m)) => {
                step(p, m, ctx, ActivePage::Settings)
            }
            (ActivePage::Profile(p), PageMsg::Profile(m)) => step(p, m, ctx, ActivePage::Profile),
            (ActivePage::Welcome(p), PageMsg::Welcome(m)) => step(p, m, ctx, ActivePage::Welcome),
            (ActivePage::Agents(p), PageMsg::Agents(m)) => step(p, m, ctx, ActivePage::Agents),
            (ActivePage::ChoosePlan(p), PageMsg::ChoosePlan(m)) => {
                step(p, m, ctx, ActivePage::ChoosePlan)
            }
            (page, msg) => return Err((page, msg)),
        };
        Ok(stepped)
    }

    pub(crate) fn completed(
        self,
        request: ApiRequest,
        result: ApiResult,
        ctx: &PageContext<'_>,
    ) -> (ActivePage, Vec<Command>) {
        match self {
            ActivePage::Home(p) => finish(p, request, result, ctx, ActivePage::Home),
            ActivePage::Login(p) => finish(p, request, result, ctx, ActivePage::Login),
            ActivePage::Signup(p) => finish(p, request, result, ctx, ActivePage::Signup),
            ActivePage::Pricing(p) => finish(p, request, result, ctx, ActivePage::Pricing),
            ActivePage::Compare(p) => finish(p, request, result, ctx, ActivePage::Compare),
            ActivePage::Quote(p) => finish(p, request, result, ctx, ActivePage::Quote),
            ActivePage::Eligibility(p) => finish(p, request, result, ctx, ActivePage::Eligibility),
            ActivePage::Schedule(p) => finish(p, request, result, ctx, ActivePage::Schedule),
            ActivePage::Dashboard(p) => finish(p, request, result, ctx, ActivePage::Dashboard),
            ActivePage::Contacts(p) => finish(p, request, result, ctx, ActivePage::Contacts),
            ActivePage::Contact(p) => finish(p, request, result, ctx, ActivePage::Contact),
            ActivePage::Settings(p) => finish(p, request, result, ctx, ActivePage::Settings),
            ActivePage::Profile(p) => finish(p, request, result, ctx, ActivePage::Profile),
            ActivePage::Welcome(p) => finish(p, request, result, ctx, ActivePage::Welcome),
            ActivePage::Agents(p) => finish(p, request, result, ctx, ActivePage::Agents),
            ActivePage::ChoosePlan(p) => finish(p, request, result, ctx, ActivePage::ChoosePlan),
            placeholder @ (ActivePage::Loading
            | ActivePage::NotFound { .. }
            | ActivePage::Verifying { .. }) => (placeholder, Vec::new()),
        }
    }

    pub fn view(&self) -> PageView {
        match self {
            ActivePage::Loading => PageView::new("Loading").line("Checking your session..."),
            ActivePage::NotFound { url } => {
                PageView::new("Page not found").line(format!("Nothing lives at {url}."))
            }
            ActivePage::Verifying { org_slug } => PageView::new("Verifying your link")
                .line(format!("Signing you in to {org_slug}...")),
            ActivePage::Home(p) => p.view(),
            ActivePage::Login(p) => p.view(),
            ActivePage::Signup(p) => p.view(),
            ActivePage::Pricing(p) => p.view(),
            ActivePage::Compare(p) => p.view(),
            ActivePage::Quote(p) => p.view(),
            ActivePage::Eligibility(p) => p.view(),
            ActivePage::Schedule(p) => p.view(),
            ActivePage::Dashboard(p) => p.view(),
            ActivePage::Contacts(p) => p.view(),
            ActivePage::Contact(p) => p.view(),
            ActivePage::Settings(p) => p.view(),
            ActivePage::Profile(p) => p.view(),
            ActivePage::Welcome(p) => p.view(),
            ActivePage::Agents(p) => p.view(),
            ActivePage::ChoosePlan(p) => p.view(),
        }
    }

    pub fn subscriptions(&self) -> Vec<Subscription<PageMsg>> {
        match self {
            ActivePage::Home(p) => lift(p.subscriptions(), PageMsg::Home),
            ActivePage::Login(p) => lift(p.subscriptions(), PageMsg::Login),
            ActivePage::Signup(p) => lift(p.subscriptions(), PageMsg::Signup),
            ActivePage::Pricing(p) => lift(p.subscriptions(), PageMsg::Pricing),
            ActivePage::Compare(p) => lift(p.subscriptions(), PageMsg::Compare),
            ActivePage::Quote(p) => lift(p.subscriptions(), PageMsg::Quote),
            ActivePage::Eligibility(p) => lift(p.subscriptions(), PageMsg::Eligibility),
            ActivePage::Schedule(p) => lift(p.subscriptions(), PageMsg::Schedule),
            ActivePage::Dashboard(p) => lift(p.subscriptions(), PageMsg::Dashboard),
            ActivePage::Contacts(p) => lift(p.subscriptions(), PageMsg::Contacts),
            ActivePage::Contact(p) => lift(p.subscriptions(), PageMsg::Contact),
            ActivePage::Settings(p) => lift(p.subscriptions(), PageMsg::Settings),
            ActivePage::Profile(p) => lift(p.subscriptions(), PageMsg::Profile),
            ActivePage::Welcome(p) => lift(p.subscriptions(), PageMsg::Welcome),
            ActivePage::Agents(p) => lift(p.subscriptions(), PageMsg::Agents),
            ActivePage::ChoosePlan(p) => lift(p.subscriptions(), PageMsg::ChoosePlan),
            ActivePage::Loading | ActivePage::NotFound { .. } | ActivePage::Verifying { .. } => {
                Vec::new()
            }
        }
    }
}

/// An empty query value (`?id=`) counts as absent.
fn present(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn wrap<P>(
    (page, commands): (P, Vec<Command>),
    variant: fn(P) -> ActivePage,
) -> (ActivePage, Vec<Command>) {
    (variant(page), commands)
}

fn step<P: Page>(
    page: P,
    msg: P::Msg,
    ctx: &PageContext<'_>,
    variant: fn(P) -> ActivePage,
) -> (ActivePage, Vec<Command>) {
    wrap(page.update(msg, ctx), variant)
}

fn finish<P: Page>(
    page: P,
    request: ApiRequest,
    result: ApiResult,
    ctx: &PageContext<'_>,
    variant: fn(P) -> ActivePage,
) -> (ActivePage, Vec<Command>) {
    wrap(page.completed(request, result, ctx), variant)
}

fn lift<M>(subs: Vec<Subscription<M>>, variant: fn(M) -> PageMsg) -> Vec<Subscription<PageMsg>> {
    subs.into_iter().map(|sub| sub.map(variant)).collect()
}
