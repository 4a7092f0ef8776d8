//! Organization settings: state licenses, carrier contracts and the
//! per-state carrier matrix. Also serves the onboarding settings step.

use crate::api::{ApiRequest, ApiResponse, ApiResult, OrgSettings, StateCarrierSetting};
use crate::route::{Route, SetupProgress, SetupRoute};
use crate::view_model::PageView;

use super::{describe_error, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsMode {
    Standalone,
    Setup(SetupProgress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    ToggleAllCarriers(bool),
    ToggleCarrier { carrier: String, on: bool },
    ToggleStateLicense { state: String, on: bool },
    ToggleTargetGi { state: String, carrier: String },
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsStatus {
    Loading,
    Ready,
    Saving,
    Saved,
    LoadFailed(String),
    SaveFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPage {
    mode: SettingsMode,
    loaded_carriers: Vec<String>,
    settings: OrgSettings,
    status: SettingsStatus,
}

impl SettingsPage {
    pub fn init(mode: SettingsMode) -> (Self, Vec<Command>) {
        (
            Self {
                mode,
                loaded_carriers: Vec::new(),
                settings: OrgSettings::default(),
                status: SettingsStatus::Loading,
            },
            vec![Command::Fetch(ApiRequest::FetchSettings)],
        )
    }

    pub fn status(&self) -> &SettingsStatus {
        &self.status
    }

    pub fn loaded_carriers(&self) -> &[String] {
        &self.loaded_carriers
    }

    pub fn carrier_contracts(&self) -> &[String] {
        &self.settings.carrier_contracts
    }

    pub fn state_carrier_settings(&self) -> &[StateCarrierSetting] {
        &self.settings.state_carrier_settings
    }

    fn is_editable(&self) -> bool {
        !matches!(
            self.status,
            SettingsStatus::Loading | SettingsStatus::Saving | SettingsStatus::LoadFailed(_)
        )
    }

    /// Makes the matrix match licenses x contracts, keeping existing flags.
    fn sync_state_carrier_settings(&mut self) {
        let existing = std::mem::take(&mut self.settings.state_carrier_settings);
        let mut synced = Vec::new();
        for state in &self.settings.state_licenses {
            for carrier in &self.settings.carrier_contracts {
                let setting = existing
                    .iter()
                    .find(|s| &s.state == state && &s.carrier == carrier)
                    .cloned()
                    .unwrap_or_else(|| default_setting(state, carrier));
                synced.push(setting);
            }
        }
        self.settings.state_carrier_settings = synced;
    }
}

fn default_setting(state: &str, carrier: &str) -> StateCarrierSetting {
    StateCarrierSetting {
        state: state.to_string(),
        carrier: carrier.to_string(),
        active: true,
        target_gi: false,
    }
}

impl Page for SettingsPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        if !self.is_editable() {
            return (self, Vec::new());
        }
        match msg {
            Msg::ToggleAllCarriers(true) => {
                self.settings.carrier_contracts = self.loaded_carriers.clone();
                self.settings.state_carrier_settings = self
                    .settings
                    .state_licenses
                    .iter()
                    .flat_map(|state| {
                        self.loaded_carriers
                            .iter()
                            .map(move |carrier| default_setting(state, carrier))
                    })
                    .collect();
            }
            Msg::ToggleAllCarriers(false) => {
                self.settings.carrier_contracts.clear();
                self.settings.state_carrier_settings.clear();
            }
            Msg::ToggleCarrier { carrier, on } => {
                let contracts = &mut self.settings.carrier_contracts;
                if on && !contracts.contains(&carrier) {
                    contracts.push(carrier);
                    // Keep the same order as the carrier list.
                    let order = &self.loaded_carriers;
                    contracts
                        .sort_by_key(|c| order.iter().position(|l| l == c).unwrap_or(usize::MAX));
                } else if !on {
                    contracts.retain(|c| c != &carrier);
                }
                self.sync_state_carrier_settings();
            }
            Msg::ToggleStateLicense { state, on } => {
                let licenses = &mut self.settings.state_licenses;
                if on && !licenses.contains(&state) {
                    licenses.push(state);
                    licenses.sort();
                } else if !on {
                    licenses.retain(|s| s != &state);
                }
                self.sync_state_carrier_settings();
            }
            Msg::ToggleTargetGi { state, carrier } => {
                if let Some(setting) = self
                    .settings
                    .state_carrier_settings
                    .iter_mut()
                    .find(|s| s.state == state && s.carrier == carrier)
                {
                    setting.target_gi = !setting.target_gi;
                }
            }
            Msg::Save => {
                self.status = SettingsStatus::Saving;
                let request = ApiRequest::SaveSettings(self.settings.clone());
                return (self, vec![Command::Fetch(request)]);
            }
        }
        if self.status == SettingsStatus::Saved {
            self.status = SettingsStatus::Ready;
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
            (ApiRequest::FetchSettings, Ok(ApiResponse::Settings(response))) => {
                self.loaded_carriers = response.carriers;
                self.settings = response.settings;
                self.status = SettingsStatus::Ready;
            }
            (ApiRequest::FetchSettings, Ok(other)) => {
                self.status = SettingsStatus::LoadFailed(format!("Unexpected response: {other:?}"));
            }
            (ApiRequest::FetchSettings, Err(err)) => {
                self.status = SettingsStatus::LoadFailed(describe_error("Loading settings", &err));
            }
            (ApiRequest::SaveSettings(_), Ok(_)) => {
                self.status = SettingsStatus::Saved;
                if let SettingsMode::Setup(progress) = &self.mode {
                    let next = Route::Setup(SetupRoute::SetupAddAgents(Some(SetupProgress {
                        plan: progress.plan.clone(),
                        org_settings_complete: true,
                    })));
                    return (self, vec![Command::Navigate(next.to_url())]);
                }
            }
            (ApiRequest::SaveSettings(_), Err(err)) => {
                self.status = SettingsStatus::SaveFailed(describe_error("Saving settings", &err));
            }
            _ => {}
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let title = match self.mode {
            SettingsMode::Standalone => "Settings",
            SettingsMode::Setup(_) => "Set up your organization",
        };
        let view = PageView::new(title);
        let view = match &self.status {
            SettingsStatus::Loading => return view.line("Loading settings..."),
            SettingsStatus::LoadFailed(message) => return view.error(Some(message.clone())),
            SettingsStatus::Saved => view.notice("Settings saved"),
            SettingsStatus::Saving => view.notice("Saving..."),
            SettingsStatus::SaveFailed(message) => view.error(Some(message.clone())),
            SettingsStatus::Ready => view,
        };
        let carriers = self
            .loaded_carriers
            .iter()
            .map(|c| {
                let mark = if self.settings.carrier_contracts.contains(c) {
                    "x"
                } else {
                    " "
                };
                format!("[{mark}] {c}")
            })
            .collect::<Vec<_>>();
        view.line(format!(
            "Licensed states: {}",
            self.settings.state_licenses.join(", ")
        ))
        .lines(carriers)
        .lines(self.settings.state_carrier_settings.iter().map(|s| {
            format!(
                "{} / {}: {}{}",
                s.state,
                s.carrier,
                if s.active { "active" } else { "inactive" },
                if s.target_gi { ", GI target" } else { "" }
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SettingsResponse;
    use crate::pricing::PricingConfig;
    use crate::route::PlanId;

    fn loaded(mode: SettingsMode, states: &[&str], carriers: &[&str]) -> SettingsPage {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let (page, _) = SettingsPage::init(mode);
        let response = SettingsResponse {
            settings: OrgSettings {
                state_licenses: states.iter().map(|s| s.to_string()).collect(),
                ..OrgSettings::default()
            },
            carriers: carriers.iter().map(|s| s.to_string()).collect(),
        };
        page.completed(
            ApiRequest::FetchSettings,
            Ok(ApiResponse::Settings(response)),
            &ctx,
        )
        .0
    }

    #[test]
    fn carrier_toggle_preserves_existing_flags() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let page = loaded(SettingsMode::Standalone, &["TX"], &["Aetna", "Humana"]);
        let (page, _) = page.update(
            Msg::ToggleCarrier {
                carrier: "Humana".into(),
                on: true,
            },
            &ctx,
        );
        let (page, _) = page.update(
            Msg::ToggleTargetGi {
                state: "TX".into(),
                carrier: "Humana".into(),
            },
            &ctx,
        );
        let (page, _) = page.update(
            Msg::ToggleCarrier {
                carrier: "Aetna".into(),
                on: true,
            },
            &ctx,
        );
        assert_eq!(page.carrier_contracts(), ["Aetna", "Humana"]);
        let humana = page
            .state_carrier_settings()
            .iter()
            .find(|s| s.carrier == "Humana")
            .unwrap();
        assert!(humana.target_gi);
    }

    #[test]
    fn setup_save_moves_to_agents_step() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let progress = SetupProgress {
            plan: Some(PlanId::new("pro")),
            org_settings_complete: false,
        };
        let page = loaded(SettingsMode::Setup(progress), &[], &["Aetna"]);
        let (page, cmds) = page.update(Msg::Save, &ctx);
        assert!(matches!(cmds[0], Command::Fetch(ApiRequest::SaveSettings(_))));
        let request = ApiRequest::SaveSettings(OrgSettings::default());
        let (_, cmds) = page.completed(request, Ok(ApiResponse::Ack), &ctx);
        assert_eq!(
            cmds,
            vec![Command::Navigate(
                "/setup/add-agents?plan=pro&org=complete".into()
            )]
        );
    }

    #[test]
    fn edits_are_ignored_until_loaded() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let (page, _) = SettingsPage::init(SettingsMode::Standalone);
        let (page, cmds) = page.update(Msg::Save, &ctx);
        assert!(cmds.is_empty());
        assert_eq!(page.status(), &SettingsStatus::Loading);
    }
}
