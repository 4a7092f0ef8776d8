use crate::api::{MeUser, SessionResponse, VerifyResponse};
use crate::route::{PlanId, ProtectedRoute, Route, SetupProgress, SetupRoute};

/// Authentication status as last reported by the backend.
///
/// Starts at `Unknown` unless the host supplied a token, and never returns to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Verified(String),
    NoSession,
}

impl SessionState {
    pub fn is_verified(&self) -> bool {
        matches!(self, SessionState::Verified(_))
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Verified(token) => Some(token),
            SessionState::Unknown | SessionState::NoSession => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    pub is_agent: bool,
    pub organization_slug: String,
    pub organization_id: Option<String>,
    pub organization_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// False until `/api/me` has answered; roles before that are provisional.
    pub roles_confirmed: bool,
}

impl CurrentUser {
    pub(crate) fn from_session(response: &SessionResponse) -> Self {
        Self {
            id: response.id.clone(),
            email: response.email.clone(),
            organization_slug: response.organization_slug.clone(),
            first_name: response.first_name.clone(),
            last_name: response.last_name.clone(),
            ..Self::default()
        }
    }

    pub(crate) fn from_verification(response: &VerifyResponse) -> Self {
        Self {
            email: response.email.clone(),
            organization_slug: response.org_slug.clone(),
            ..Self::default()
        }
    }

    /// Merges the second-stage `/api/me` answer. Empty fields never erase known ones.
    pub(crate) fn merge_me(&mut self, user: &MeUser) {
        self.is_admin = user.is_admin;
        self.is_agent = user.is_agent;
        self.roles_confirmed = true;
        if self.id.is_empty() {
            self.id = user.id.clone();
        }
        if self.email.is_empty() {
            self.email = user.email.clone();
        }
        if user.organization_id.is_some() {
            self.organization_id = user.organization_id.clone();
        }
        if user.organization_name.is_some() {
            self.organization_name = user.organization_name.clone();
        }
        if !user.first_name.is_empty() {
            self.first_name = user.first_name.clone();
        }
        if !user.last_name.is_empty() {
            self.last_name = user.last_name.clone();
        }
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// What the client knows about the organization's onboarding.
///
/// Merges only ever add information, which keeps [`setup_step`] monotonic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrganizationProgress {
    pub plan: Option<PlanId>,
    pub settings_complete: bool,
    pub agents_complete: bool,
}

impl OrganizationProgress {
    pub fn merge_route(&mut self, progress: &SetupProgress) {
        if self.plan.is_none() {
            self.plan = progress.plan.clone().filter(|plan| !plan.as_str().is_empty());
        }
        self.settings_complete |= progress.org_settings_complete;
    }

    pub fn merge_me(&mut self, user: &MeUser) {
        if self.plan.is_none() {
            self.plan = user.organization_plan.clone().map(PlanId);
        }
        self.settings_complete |= user.organization_settings_complete.unwrap_or(false);
        if user.organization_setup_complete == Some(true) {
            self.mark_complete();
        }
    }

    pub fn mark_complete(&mut self) {
        self.settings_complete = true;
        self.agents_complete = true;
    }

    fn as_setup_progress(&self) -> SetupProgress {
        SetupProgress {
            plan: self.plan.clone(),
            org_settings_complete: self.settings_complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStep {
    NotStarted,
    PlanSelection,
    OrganizationSetup,
    AgentSetup,
    Complete,
}

/// Onboarding position; derived on demand, never stored.
pub fn setup_step(
    user: Option<&CurrentUser>,
    is_setup: bool,
    progress: &OrganizationProgress,
) -> SetupStep {
    if user.is_none() {
        return SetupStep::NotStarted;
    }
    if !is_setup || progress.agents_complete {
        return SetupStep::Complete;
    }
    if progress.plan.is_none() {
        SetupStep::PlanSelection
    } else if !progress.settings_complete {
        SetupStep::OrganizationSetup
    } else {
        SetupStep::AgentSetup
    }
}

/// Where the onboarding wizard should resume for a given step.
/// `Complete` has no wizard page and resumes at the dashboard.
pub fn setup_step_route(step: SetupStep, progress: &OrganizationProgress) -> Route {
    let carried = progress.as_setup_progress();
    match step {
        SetupStep::NotStarted => Route::Public(crate::route::PublicRoute::Login),
        SetupStep::PlanSelection => Route::Setup(SetupRoute::ChoosePlan(None)),
        SetupStep::OrganizationSetup => Route::Setup(SetupRoute::SetupSettings(Some(SetupProgress {
            org_settings_complete: false,
            ..carried
        }))),
        SetupStep::AgentSetup => Route::Setup(SetupRoute::SetupAddAgents(Some(SetupProgress {
            org_settings_complete: true,
            ..carried
        }))),
        SetupStep::Complete => Route::Protected(ProtectedRoute::Dashboard),
    }
}
