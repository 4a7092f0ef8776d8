use medmax_logging::{medmax_debug, medmax_info, medmax_warn};

use crate::api::{ApiRequest, ApiResponse, ApiResult, MeResponse};
use crate::effect::{Effect, PageId, ReplyTo};
use crate::msg::Msg;
use crate::page::{ActivePage, PageMsg};
use crate::pages::{Command, Subscription};
use crate::route::{Access, PublicRoute, Route};
use crate::session::{setup_step_route, CurrentUser, OrganizationProgress, SessionState, SetupStep};
use crate::state::AppState;

/// Why a URL is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// The location changed.
    Navigation,
    /// Same location, re-checked after the session picture changed.
    Refresh,
}

const LOGIN_URL: &str = "/login";
const DEFAULT_LANDING: &str = "/dashboard";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => resolve(&mut state, &url, ResolveMode::Navigation),
        Msg::LinkClicked(href) => vec![link_target(href)],
        Msg::ApiCompleted {
            reply,
            request,
            result,
        } => match reply {
            ReplyTo::Router => router_completed(&mut state, request, result),
            ReplyTo::Page(page) => page_completed(&mut state, page, request, result),
            ReplyTo::Discard => {
                if let Err(err) = result {
                    medmax_debug!("{} failed (ignored): {err}", request.label());
                }
                Vec::new()
            }
        },
        Msg::Page { page, msg } => page_msg(&mut state, page, msg),
        Msg::LogoutClicked => vec![Effect::Api {
            request: ApiRequest::Logout,
            reply: ReplyTo::Router,
        }],
        Msg::Tick => tick(&mut state),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Decides what the router shows for `url`, replacing the active page when needed.
pub(crate) fn resolve(state: &mut AppState, url: &str, mode: ResolveMode) -> Vec<Effect> {
    let route = Route::parse(url);
    if state.current_url != url {
        state.current_url = url.to_string();
        state.mark_dirty();
    }
    let access = route.access();

    if state.session == SessionState::Unknown && access != Access::Public {
        if !(state.active.route == route && state.active.page.is_placeholder()) {
            medmax_debug!("holding {url} until the session check answers");
            state.replace_page(route, ActivePage::Loading);
        }
        return Vec::new();
    }

    if access != Access::Public && !state.session.is_verified() {
        medmax_info!("{url} needs a session; redirecting to {LOGIN_URL}");
        state.intended_destination = Some(url.to_string());
        let (page, _) = ActivePage::init(
            &Route::Public(PublicRoute::Login),
            LOGIN_URL,
            false,
            &state.page_context(),
        );
        state.replace_page(Route::Public(PublicRoute::Login), page);
        return vec![Effect::PushUrl(LOGIN_URL.to_string())];
    }

    if state.is_setup && access == Access::Protected {
        let step = state.setup_step();
        if step != SetupStep::Complete {
            let target = setup_step_route(step, &state.progress).to_url();
            medmax_info!("organization setup at {step:?}; redirecting {url} to {target}");
            return vec![Effect::PushUrl(target)];
        }
    }

    if let Route::Setup(setup) = &route {
        state.progress.merge_route(&setup.progress());
    }

    if mode == ResolveMode::Refresh
        && state.active.route == route
        && !state.active.page.is_placeholder()
    {
        return Vec::new();
    }

    if !matches!(
        route,
        Route::Public(PublicRoute::Login | PublicRoute::VerifyMagicLink { .. })
    ) {
        state.intended_destination = None;
    }

    let signed_in = state.session.is_verified();
    let (page, commands) = ActivePage::init(&route, url, signed_in, &state.page_context());
    medmax_debug!("showing {} for {url}", page.name());
    let verify = match &route {
        Route::Public(PublicRoute::VerifyMagicLink { org_slug, token }) => {
            Some(ApiRequest::VerifyMagicLink {
                org_slug: org_slug.to_string(),
                token: token.to_string(),
            })
        }
        _ => None,
    };
    let id = state.replace_page(route, page);

    let mut effects = run_commands(state, id, commands);
    if let Some(request) = verify {
        effects.push(Effect::Api {
            request,
            reply: ReplyTo::Router,
        });
    }
    effects
}

/// Turns page commands into effects addressed back to page `id`.
fn run_commands(state: &mut AppState, id: PageId, commands: Vec<Command>) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(commands.len());
    for command in commands {
        match command {
            Command::Fetch(request) => effects.push(Effect::Api {
                request,
                reply: ReplyTo::Page(id),
            }),
            Command::Track(event) => effects.push(Effect::Api {
                request: ApiRequest::TrackEvent(event),
                reply: ReplyTo::Discard,
            }),
            Command::Navigate(url) => effects.push(Effect::PushUrl(url)),
            Command::SetupFinished => {
                medmax_info!("organization setup finished");
                state.progress.mark_complete();
                state.is_setup = false;
                state.mark_dirty();
            }
        }
    }
    effects
}

fn link_target(href: String) -> Effect {
    if href.starts_with('/') && !href.starts_with("//") {
        Effect::PushUrl(href)
    } else {
        Effect::LoadExternal(href)
    }
}

fn page_msg(state: &mut AppState, id: PageId, msg: PageMsg) -> Vec<Effect> {
    if id != state.active.id {
        medmax_debug!("dropping message for stale page {id} (active {})", state.active.id);
        return Vec::new();
    }
    let page = state.take_page();
    let outcome = page.update(msg, &state.page_context());
    match outcome {
        Ok((page, commands)) => {
            state.active.page = page;
            state.mark_dirty();
            run_commands(state, id, commands)
        }
        Err((page, msg)) => {
            medmax_debug!("dropping {msg:?}: active page is {}", page.name());
            state.active.page = page;
            Vec::new()
        }
    }
}

fn page_completed(
    state: &mut AppState,
    id: PageId,
    request: ApiRequest,
    result: ApiResult,
) -> Vec<Effect> {
    if id != state.active.id {
        medmax_debug!(
            "dropping stale {} response for page {id} (active {})",
            request.label(),
            state.active.id
        );
        return Vec::new();
    }
    let page = state.take_page();
    let (page, commands) = page.completed(request, result, &state.page_context());
    state.active.page = page;
    state.mark_dirty();
    run_commands(state, id, commands)
}

fn tick(state: &mut AppState) -> Vec<Effect> {
    let id = state.active.id;
    state
        .active
        .page
        .subscriptions()
        .into_iter()
        .flat_map(|sub| match sub {
            Subscription::EverySecond(msg) => page_msg(state, id, msg),
        })
        .collect()
}

fn router_completed(state: &mut AppState, request: ApiRequest, result: ApiResult) -> Vec<Effect> {
    match request {
        ApiRequest::CheckSession => session_checked(state, result),
        ApiRequest::FetchCurrentUser => current_user_loaded(state, result),
        ApiRequest::VerifyMagicLink { .. } => magic_link_verified(state, result),
        ApiRequest::Logout => logged_out(state, result),
        other => {
            medmax_debug!("router ignores {} response", other.label());
            Vec::new()
        }
    }
}

fn session_checked(state: &mut AppState, result: ApiResult) -> Vec<Effect> {
    let response = match result {
        Ok(ApiResponse::Session(response)) if response.valid => response,
        Ok(_) => {
            medmax_info!("no valid session");
            return drop_session(state);
        }
        Err(err) => {
            medmax_warn!("session check failed: {err}");
            return drop_session(state);
        }
    };

    let token = Some(response.session.clone())
        .filter(|t| !t.is_empty())
        .or_else(|| state.session.token().map(str::to_string))
        .unwrap_or_default();
    medmax_info!("session verified for {}", response.email);
    state.session = SessionState::Verified(token.clone());
    state.current_user = Some(CurrentUser::from_session(&response));
    state.mark_dirty();

    let mut effects = vec![
        Effect::SetSessionToken(Some(token)),
        Effect::Api {
            request: ApiRequest::FetchCurrentUser,
            reply: ReplyTo::Router,
        },
    ];
    let on_login = state.active.route == Route::Public(PublicRoute::Login);
    match state.intended_destination.clone() {
        Some(intended) if on_login => effects.push(Effect::PushUrl(intended)),
        _ => {
            let url = state.current_url.clone();
            effects.extend(resolve(state, &url, ResolveMode::Refresh));
        }
    }
    effects
}

/// Fail closed: any doubt about the session ends it.
fn drop_session(state: &mut AppState) -> Vec<Effect> {
    state.session = SessionState::NoSession;
    state.current_user = None;
    state.mark_dirty();
    let url = state.current_url.clone();
    let mut effects = vec![Effect::SetSessionToken(None)];
    effects.extend(resolve(state, &url, ResolveMode::Refresh));
    effects
}

fn current_user_loaded(state: &mut AppState, result: ApiResult) -> Vec<Effect> {
    if !state.session.is_verified() {
        medmax_debug!("ignoring /api/me answer without a session");
        return Vec::new();
    }
    let was_setup = state.is_setup;
    match result {
        Ok(ApiResponse::CurrentUser(MeResponse { user: Some(me), .. })) => {
            if let Some(user) = state.current_user.as_mut() {
                user.merge_me(&me);
            }
            if let Some(complete) = me.organization_setup_complete {
                state.is_setup = !complete;
            }
            state.progress.merge_me(&me);
            medmax_info!(
                "roles confirmed (admin: {}, agent: {}, setup pending: {})",
                me.is_admin,
                me.is_agent,
                state.is_setup
            );
            state.mark_dirty();
        }
        Ok(_) => medmax_warn!("/api/me returned no user; keeping provisional roles"),
        Err(err) => medmax_warn!("/api/me failed: {err}; keeping provisional roles"),
    }
    if was_setup && !state.is_setup && state.active.route.access() == Access::Setup {
        let target = state
            .intended_destination
            .take()
            .unwrap_or_else(|| DEFAULT_LANDING.to_string());
        medmax_info!("organization already set up; leaving the setup flow for {target}");
        return vec![Effect::PushUrl(target)];
    }
    let url = state.current_url.clone();
    resolve(state, &url, ResolveMode::Refresh)
}

fn magic_link_verified(state: &mut AppState, result: ApiResult) -> Vec<Effect> {
    let response = match result {
        Ok(ApiResponse::Verification(response)) if response.success => response,
        other => {
            match other {
                Err(err) => medmax_warn!("magic link verification failed: {err}"),
                Ok(_) => medmax_info!("magic link rejected"),
            }
            let mut effects = Vec::new();
            if state.session == SessionState::Unknown {
                state.session = SessionState::NoSession;
                state.mark_dirty();
                effects.push(Effect::SetSessionToken(None));
            }
            effects.push(Effect::PushUrl(LOGIN_URL.to_string()));
            return effects;
        }
    };

    medmax_info!("magic link verified for {}", response.org_slug);
    let target = Some(response.redirect_url.clone())
        .filter(|u| !u.trim().is_empty())
        .or_else(|| state.intended_destination.take())
        .unwrap_or_else(|| DEFAULT_LANDING.to_string());

    state.session = SessionState::Verified(response.session.clone());
    state.current_user = Some(CurrentUser::from_verification(&response));
    // Provisional until /api/me reports organization completeness.
    state.is_setup = Route::parse(&target).access() == Access::Setup;
    state.mark_dirty();
    vec![
        Effect::SetSessionToken(Some(response.session)),
        Effect::Api {
            request: ApiRequest::FetchCurrentUser,
            reply: ReplyTo::Router,
        },
        Effect::PushUrl(target),
    ]
}

fn logged_out(state: &mut AppState, result: ApiResult) -> Vec<Effect> {
    if let Err(err) = result {
        medmax_warn!("logout request failed: {err}; clearing the session anyway");
    }
    medmax_info!("logged out");
    state.session = SessionState::NoSession;
    state.current_user = None;
    state.is_setup = false;
    state.progress = OrganizationProgress::default();
    state.intended_destination = None;
    state.mark_dirty();
    vec![
        Effect::SetSessionToken(None),
        Effect::PushUrl(LOGIN_URL.to_string()),
    ]
}
