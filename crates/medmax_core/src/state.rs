use crate::api::ApiRequest;
use crate::effect::{Effect, PageId, ReplyTo};
use crate::page::ActivePage;
use crate::pages::PageContext;
use crate::pricing::PricingConfig;
use crate::route::{PublicRoute, Route};
use crate::session::{setup_step, CurrentUser, OrganizationProgress, SessionState, SetupStep};
use crate::update::{resolve, ResolveMode};
use crate::view_model::{AppViewModel, NavLink};

/// The page currently on screen, tagged with its generation id.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEntry {
    pub id: PageId,
    pub route: Route,
    pub page: ActivePage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) current_url: String,
    pub(crate) active: ActiveEntry,
    next_page_id: PageId,
    pub(crate) session: SessionState,
    pub(crate) current_user: Option<CurrentUser>,
    pub(crate) is_setup: bool,
    pub(crate) progress: OrganizationProgress,
    pub(crate) intended_destination: Option<String>,
    pricing: PricingConfig,
    dirty: bool,
}

/// Nothing resolved yet: the placeholder page at `/` with the session unknown.
impl Default for AppState {
    fn default() -> Self {
        AppState {
            current_url: "/".to_string(),
            active: ActiveEntry {
                id: 0,
                route: Route::NotFound,
                page: ActivePage::Loading,
            },
            next_page_id: 1,
            session: SessionState::Unknown,
            current_user: None,
            is_setup: false,
            progress: OrganizationProgress::default(),
            intended_destination: None,
            pricing: PricingConfig::default(),
            dirty: true,
        }
    }
}

impl AppState {
    /// Boots the router at `url`.
    ///
    /// With a stored token the session starts out `Verified` and is confirmed
    /// by the session check like any other. Booting straight into a magic link
    /// skips the check; the verification answers the same question.
    pub fn init(
        url: &str,
        boot_token: Option<String>,
        pricing: PricingConfig,
    ) -> (AppState, Vec<Effect>) {
        let (session, current_user) = match boot_token {
            Some(token) => (
                SessionState::Verified(token),
                Some(CurrentUser::default()),
            ),
            None => (SessionState::Unknown, None),
        };
        let mut state = AppState {
            current_url: url.to_string(),
            session,
            current_user,
            pricing,
            ..AppState::default()
        };

        let mut effects = Vec::new();
        let verifying = matches!(
            Route::parse(url),
            Route::Public(PublicRoute::VerifyMagicLink { .. })
        );
        if !verifying {
            effects.push(Effect::Api {
                request: ApiRequest::CheckSession,
                reply: ReplyTo::Router,
            });
        }
        effects.extend(resolve(&mut state, url, ResolveMode::Navigation));
        (state, effects)
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn active_page_id(&self) -> PageId {
        self.active.id
    }

    pub fn active_route(&self) -> &Route {
        &self.active.route
    }

    pub fn active_page(&self) -> &ActivePage {
        &self.active.page
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    pub fn progress(&self) -> &OrganizationProgress {
        &self.progress
    }

    pub fn intended_destination(&self) -> Option<&str> {
        self.intended_destination.as_deref()
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn setup_step(&self) -> SetupStep {
        setup_step(self.current_user.as_ref(), self.is_setup, &self.progress)
    }

    /// True while the active page listens to the one-second clock.
    pub fn wants_ticks(&self) -> bool {
        !self.active.page.subscriptions().is_empty()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url: self.current_url.clone(),
            session: self.session.clone(),
            user_label: self.current_user.as_ref().map(CurrentUser::display_name),
            nav: self.nav_links(),
            page: self.active.page.view(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn page_context(&self) -> PageContext<'_> {
        PageContext {
            user: self.current_user.as_ref(),
            pricing: &self.pricing,
        }
    }

    /// Installs a new page under a fresh generation id and returns that id.
    pub(crate) fn replace_page(&mut self, route: Route, page: ActivePage) -> PageId {
        let id = self.next_page_id;
        self.next_page_id += 1;
        self.active = ActiveEntry { id, route, page };
        self.mark_dirty();
        id
    }

    /// Moves the active page out so it can be updated by value.
    pub(crate) fn take_page(&mut self) -> ActivePage {
        std::mem::replace(&mut self.active.page, ActivePage::Loading)
    }

    fn nav_links(&self) -> Vec<NavLink> {
        if !self.session.is_verified() {
            return vec![
                NavLink {
                    label: "Home",
                    href: "/",
                },
                NavLink {
                    label: "Pricing",
                    href: "/pricing",
                },
                NavLink {
                    label: "Log in",
                    href: "/login",
                },
                NavLink {
                    label: "Sign up",
                    href: "/signup",
                },
            ];
        }
        let mut links = vec![
            NavLink {
                label: "Dashboard",
                href: "/dashboard",
            },
            NavLink {
                label: "Contacts",
                href: "/contacts",
            },
            NavLink {
                label: "Settings",
                href: "/settings",
            },
            NavLink {
                label: "Profile",
                href: "/profile",
            },
        ];
        // Provisional roles are all false, so this stays hidden until /api/me answers.
        if self
            .current_user
            .as_ref()
            .is_some_and(|u| u.roles_confirmed && u.is_admin)
        {
            links.push(NavLink {
                label: "Manage Agents",
                href: "/add-agents",
            });
        }
        links
    }
}
