//! Agent management. In setup mode this is the last onboarding step and
//! finishing it finalizes the organization.

use crate::api::{Agent, ApiRequest, ApiResponse, ApiResult, NewAgent};
use crate::route::SetupProgress;
use crate::view_model::PageView;

use super::{describe_error, looks_like_email, required, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentsMode {
    Standalone,
    Setup(SetupProgress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    FirstNameChanged(String),
    LastNameChanged(String),
    EmailChanged(String),
    PhoneChanged(String),
    AddAgent,
    FinishSetup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentsStatus {
    Loading,
    Ready,
    Adding,
    Finalizing,
    PreparingDatabase,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct AgentForm {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

impl AgentForm {
    fn validate(&self) -> Result<NewAgent, String> {
        let first_name = required(&self.first_name).ok_or("First name is required")?;
        let last_name = required(&self.last_name).ok_or("Last name is required")?;
        if !looks_like_email(&self.email) {
            return Err("Enter a valid email address".into());
        }
        let phone = required(&self.phone).ok_or("Phone is required")?;
        Ok(NewAgent {
            first_name,
            last_name,
            email: self.email.trim().to_string(),
            phone,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentsPage {
    mode: AgentsMode,
    agents: Vec<Agent>,
    form: AgentForm,
    status: AgentsStatus,
    error: Option<String>,
}

impl AgentsPage {
    pub fn init(mode: AgentsMode) -> (Self, Vec<Command>) {
        (
            Self {
                mode,
                agents: Vec::new(),
                form: AgentForm::default(),
                status: AgentsStatus::Loading,
                error: None,
            },
            vec![Command::Fetch(ApiRequest::FetchAgents)],
        )
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn status(&self) -> &AgentsStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.status,
            AgentsStatus::Adding | AgentsStatus::Finalizing | AgentsStatus::PreparingDatabase
        )
    }
}

impl Page for AgentsPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::FirstNameChanged(v) => self.form.first_name = v,
            Msg::LastNameChanged(v) => self.form.last_name = v,
            Msg::EmailChanged(v) => self.form.email = v,
            Msg::PhoneChanged(v) => self.form.phone = v,
            Msg::AddAgent => {
                if self.is_busy() {
                    return (self, Vec::new());
                }
                return match self.form.validate() {
                    Ok(agent) => {
                        self.status = AgentsStatus::Adding;
                        self.error = None;
                        (self, vec![Command::Fetch(ApiRequest::CreateAgent(agent))])
                    }
                    Err(message) => {
                        self.error = Some(message);
                        (self, Vec::new())
                    }
                };
            }
            Msg::FinishSetup => {
                if self.is_busy() || !matches!(self.mode, AgentsMode::Setup(_)) {
                    return (self, Vec::new());
                }
                let Some(org_id) = ctx.user.and_then(|u| u.organization_id.clone()) else {
                    self.error =
                        Some("Your organization is still loading. Try again in a moment.".into());
                    return (self, Vec::new());
                };
                self.status = AgentsStatus::Finalizing;
                self.error = None;
                return (
                    self,
                    vec![Command::Fetch(ApiRequest::FinalizeOrganization { org_id })],
                );
            }
        }
        (self, Vec::new())
    }

    fn completed(
        mut self,
        request: ApiRequest,
        result: ApiResult,
        _ctx: &PageContext<'_>,
    ) -> (Self, Vec<Command>) {
        match (request, result) {
            (ApiRequest::FetchAgents, Ok(ApiResponse::Agents(agents))) => {
                self.agents = agents;
                self.status = AgentsStatus::Ready;
            }
            (ApiRequest::FetchAgents, Ok(_)) => {
                self.status = AgentsStatus::Ready;
            }
            (ApiRequest::FetchAgents, Err(err)) => {
                self.status = AgentsStatus::Ready;
                self.error = Some(describe_error("Loading agents", &err));
            }
            (ApiRequest::CreateAgent(_), Ok(ApiResponse::Agent(agent))) => {
                self.agents.push(agent);
                self.form = AgentForm::default();
                self.status = AgentsStatus::Ready;
            }
            (ApiRequest::CreateAgent(_), Ok(_)) => {
                // Backend acknowledged without echoing the record.
                self.form = AgentForm::default();
                self.status = AgentsStatus::Ready;
                return (self, vec![Command::Fetch(ApiRequest::FetchAgents)]);
            }
            (ApiRequest::CreateAgent(_), Err(err)) => {
                self.status = AgentsStatus::Ready;
                self.error = Some(describe_error("Adding the agent", &err));
            }
            (ApiRequest::FinalizeOrganization { org_id }, Ok(_)) => {
                self.status = AgentsStatus::PreparingDatabase;
                return (
                    self,
                    vec![Command::Fetch(ApiRequest::SetupOrganizationDatabase {
                        org_id,
                    })],
                );
            }
            (ApiRequest::SetupOrganizationDatabase { .. }, Ok(_)) => {
                self.status = AgentsStatus::Ready;
                return (
                    self,
                    vec![
                        Command::SetupFinished,
                        Command::Navigate("/contacts".into()),
                    ],
                );
            }
            (
                ApiRequest::FinalizeOrganization { .. }
                | ApiRequest::SetupOrganizationDatabase { .. },
                Err(err),
            ) => {
                self.status = AgentsStatus::Ready;
                self.error = Some(describe_error("Finishing setup", &err));
            }
            _ => {}
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let title = match self.mode {
            AgentsMode::Standalone => "Manage agents",
            AgentsMode::Setup(_) => "Add your agents",
        };
        let mut view = PageView::new(title);
        if self.status == AgentsStatus::Loading {
            return view.line("Loading agents...");
        }
        view = view.lines(
            self.agents
                .iter()
                .map(|a| format!("{} {} <{}> {}", a.first_name, a.last_name, a.email, a.phone)),
        );
        view = match self.status {
            AgentsStatus::Adding => view.notice("Adding agent..."),
            AgentsStatus::Finalizing | AgentsStatus::PreparingDatabase => {
                view.notice("Finishing your organization setup...")
            }
            AgentsStatus::Loading | AgentsStatus::Ready => view,
        };
        view.error(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestError;
    use crate::pricing::PricingConfig;
    use crate::session::CurrentUser;

    #[test]
    fn finish_requires_known_organization() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let (page, _) = AgentsPage::init(AgentsMode::Setup(SetupProgress::default()));
        let (page, _) = page.completed(
            ApiRequest::FetchAgents,
            Ok(ApiResponse::Agents(Vec::new())),
            &ctx,
        );
        let (page, cmds) = page.update(Msg::FinishSetup, &ctx);
        assert!(cmds.is_empty());
        assert!(page.error().is_some());
    }

    #[test]
    fn finish_runs_finalize_then_database_then_leaves_setup() {
        let pricing = PricingConfig::default();
        let user = CurrentUser {
            organization_id: Some("42".into()),
            ..CurrentUser::default()
        };
        let ctx = PageContext {
            user: Some(&user),
            pricing: &pricing,
        };
        let (page, _) = AgentsPage::init(AgentsMode::Setup(SetupProgress::default()));
        let (page, _) = page.completed(
            ApiRequest::FetchAgents,
            Ok(ApiResponse::Agents(Vec::new())),
            &ctx,
        );
        let (page, cmds) = page.update(Msg::FinishSetup, &ctx);
        let finalize = ApiRequest::FinalizeOrganization { org_id: "42".into() };
        assert_eq!(cmds, vec![Command::Fetch(finalize.clone())]);

        let (page, cmds) = page.completed(finalize, Ok(ApiResponse::Ack), &ctx);
        let database = ApiRequest::SetupOrganizationDatabase { org_id: "42".into() };
        assert_eq!(cmds, vec![Command::Fetch(database.clone())]);

        let (_, cmds) = page.completed(database, Ok(ApiResponse::Ack), &ctx);
        assert_eq!(
            cmds,
            vec![Command::SetupFinished, Command::Navigate("/contacts".into())]
        );
    }

    #[test]
    fn finalize_error_stays_on_page() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let (page, _) = AgentsPage::init(AgentsMode::Setup(SetupProgress::default()));
        let (page, cmds) = page.completed(
            ApiRequest::FinalizeOrganization { org_id: "1".into() },
            Err(RequestError::HttpStatus(500)),
            &ctx,
        );
        assert!(cmds.is_empty());
        assert_eq!(page.status(), &AgentsStatus::Ready);
        assert!(page.error().is_some());
    }
}
