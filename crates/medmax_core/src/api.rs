//! Backend request/response contracts consumed by the router and pages.
//!
//! The core only describes requests; `medmax_client` turns them into HTTP
//! calls and decodes the bodies into the types below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every request the client knows how to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    CheckSession,
    VerifyMagicLink { org_slug: String, token: String },
    FetchCurrentUser,
    RequestLoginLink { email: String },
    Logout,
    Signup(SignupRequest),
    FinalizeOrganization { org_id: String },
    SetupOrganizationDatabase { org_id: String },
    TrackEvent(TrackingEvent),
    FetchQuote { quote_id: String },
    RequestCallback(CallbackRequest),
    FetchContacts,
    FetchContact { id: String },
    CreateContact(ContactDraft),
    UpdateContact { id: String, contact: ContactDraft },
    LookupZip { zip: String },
    FetchSettings,
    SaveSettings(OrgSettings),
    UpdateProfile(ProfileUpdate),
    FetchAgents,
    CreateAgent(NewAgent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl ApiRequest {
    pub fn method(&self) -> HttpMethod {
        match self {
            ApiRequest::CheckSession
            | ApiRequest::VerifyMagicLink { .. }
            | ApiRequest::FetchCurrentUser
            | ApiRequest::FetchQuote { .. }
            | ApiRequest::FetchContacts
            | ApiRequest::FetchContact { .. }
            | ApiRequest::LookupZip { .. }
            | ApiRequest::FetchSettings
            | ApiRequest::FetchAgents => HttpMethod::Get,
            ApiRequest::SaveSettings(_)
            | ApiRequest::UpdateProfile(_)
            | ApiRequest::UpdateContact { .. } => HttpMethod::Put,
            ApiRequest::RequestLoginLink { .. }
            | ApiRequest::Logout
            | ApiRequest::Signup(_)
            | ApiRequest::FinalizeOrganization { .. }
            | ApiRequest::SetupOrganizationDatabase { .. }
            | ApiRequest::TrackEvent(_)
            | ApiRequest::RequestCallback(_)
            | ApiRequest::CreateContact(_)
            | ApiRequest::CreateAgent(_) => HttpMethod::Post,
        }
    }

    /// Path relative to the API origin. Dynamic segments are percent-encoded.
    pub fn path(&self) -> String {
        let enc = |s: &str| urlencoding::encode(s).into_owned();
        match self {
            ApiRequest::CheckSession => "/api/auth/session".to_string(),
            ApiRequest::VerifyMagicLink { org_slug, token } => {
                format!("/api/auth/verify/{}/{}", enc(org_slug), enc(token))
            }
            ApiRequest::FetchCurrentUser => "/api/me".to_string(),
            ApiRequest::RequestLoginLink { .. } => "/api/auth/login".to_string(),
            ApiRequest::Logout => "/api/auth/logout".to_string(),
            ApiRequest::Signup(_) => "/api/organizations/signup".to_string(),
            ApiRequest::FinalizeOrganization { org_id } => {
                format!("/api/organizations/{}/finalize", enc(org_id))
            }
            ApiRequest::SetupOrganizationDatabase { org_id } => {
                format!("/api/organizations/{}/setup-database", enc(org_id))
            }
            ApiRequest::TrackEvent(_) => "/api/contact-events".to_string(),
            ApiRequest::FetchQuote { quote_id } => format!("/api/quotes/decode/{}", enc(quote_id)),
            ApiRequest::RequestCallback(_) => "/api/schedule/request".to_string(),
            ApiRequest::FetchContacts | ApiRequest::CreateContact(_) => {
                "/api/contacts".to_string()
            }
            ApiRequest::FetchContact { id } | ApiRequest::UpdateContact { id, .. } => {
                format!("/api/contacts/{}", enc(id))
            }
            ApiRequest::LookupZip { zip } => format!("/api/zip-lookup/{}", enc(zip)),
            ApiRequest::FetchSettings | ApiRequest::SaveSettings(_) => "/api/settings".to_string(),
            ApiRequest::UpdateProfile(_) => "/api/profile".to_string(),
            ApiRequest::FetchAgents | ApiRequest::CreateAgent(_) => "/api/agents".to_string(),
        }
    }

    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ApiRequest::CheckSession => "session-check",
            ApiRequest::VerifyMagicLink { .. } => "verify",
            ApiRequest::FetchCurrentUser => "me",
            ApiRequest::RequestLoginLink { .. } => "login-link",
            ApiRequest::Logout => "logout",
            ApiRequest::Signup(_) => "signup",
            ApiRequest::FinalizeOrganization { .. } => "org-finalize",
            ApiRequest::SetupOrganizationDatabase { .. } => "org-setup-database",
            ApiRequest::TrackEvent(_) => "tracking",
            ApiRequest::FetchQuote { .. } => "quote",
            ApiRequest::RequestCallback(_) => "callback",
            ApiRequest::FetchContacts => "contacts",
            ApiRequest::FetchContact { .. } => "contact",
            ApiRequest::CreateContact(_) => "contact-create",
            ApiRequest::UpdateContact { .. } => "contact-update",
            ApiRequest::LookupZip { .. } => "zip-lookup",
            ApiRequest::FetchSettings => "settings",
            ApiRequest::SaveSettings(_) => "settings-save",
            ApiRequest::UpdateProfile(_) => "profile-save",
            ApiRequest::FetchAgents => "agents",
            ApiRequest::CreateAgent(_) => "agent-create",
        }
    }
}

/// Decoded success bodies, one variant per response shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Session(SessionResponse),
    Verification(VerifyResponse),
    CurrentUser(MeResponse),
    Quote(QuoteData),
    Contacts(Vec<Contact>),
    Contact(Contact),
    Zip(ZipInfo),
    Settings(SettingsResponse),
    Agents(Vec<Agent>),
    Agent(Agent),
    /// Any 2xx whose body the caller does not inspect.
    Ack,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("response too large (max {max_bytes})")]
    TooLarge { max_bytes: u64 },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("network error: {0}")]
    Network(String),
}

pub type ApiResult = Result<ApiResponse, RequestError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionResponse {
    #[serde(deserialize_with = "flexible::boolean")]
    pub valid: bool,
    #[serde(default, deserialize_with = "flexible::text")]
    pub session: String,
    #[serde(default, deserialize_with = "flexible::text")]
    pub email: String,
    #[serde(default, rename = "organizationSlug", deserialize_with = "flexible::text")]
    pub organization_slug: String,
    #[serde(default, deserialize_with = "flexible::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "flexible::text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "flexible::nullable_id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyResponse {
    #[serde(deserialize_with = "flexible::boolean")]
    pub success: bool,
    #[serde(default, rename = "redirectUrl", deserialize_with = "flexible::text")]
    pub redirect_url: String,
    #[serde(default, deserialize_with = "flexible::text")]
    pub session: String,
    #[serde(default, deserialize_with = "flexible::text")]
    pub email: String,
    #[serde(default, rename = "orgSlug", deserialize_with = "flexible::text")]
    pub org_slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MeResponse {
    #[serde(default, deserialize_with = "flexible::boolean")]
    pub success: bool,
    #[serde(default)]
    pub user: Option<MeUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MeUser {
    #[serde(deserialize_with = "flexible::id")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible::text")]
    pub email: String,
    #[serde(default, deserialize_with = "flexible::boolean")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "flexible::boolean")]
    pub is_agent: bool,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default, deserialize_with = "flexible::optional_id")]
    pub organization_id: Option<String>,
    #[serde(default, rename = "firstName", deserialize_with = "flexible::text")]
    pub first_name: String,
    #[serde(default, rename = "lastName", deserialize_with = "flexible::text")]
    pub last_name: String,
    #[serde(default)]
    pub organization_plan: Option<String>,
    #[serde(default, deserialize_with = "flexible::optional_boolean")]
    pub organization_settings_complete: Option<bool>,
    #[serde(default, deserialize_with = "flexible::optional_boolean")]
    pub organization_setup_complete: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingEvent {
    pub tracking_id: String,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl TrackingEvent {
    pub fn new(tracking_id: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            tracking_id: tracking_id.into(),
            event_type: event_type.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    #[serde(rename = "adminFirstName")]
    pub first_name: String,
    #[serde(rename = "adminLastName")]
    pub last_name: String,
    #[serde(rename = "adminEmail")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoteData {
    #[serde(default, rename = "orgId", deserialize_with = "flexible::optional_id")]
    pub org_id: Option<String>,
    pub contact: QuoteContact,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoteContact {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "flexible::boolean")]
    pub tobacco_user: bool,
    #[serde(default)]
    pub plan_type: String,
    #[serde(default)]
    pub current_carrier: String,
}

/// A lead record. `tobacco_user` arrives as a bool or as a SQLite 0/1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contact {
    #[serde(deserialize_with = "flexible::id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub current_carrier: String,
    #[serde(default)]
    pub plan_type: String,
    #[serde(default)]
    pub effective_date: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default, deserialize_with = "flexible::boolean")]
    pub tobacco_user: bool,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default, deserialize_with = "flexible::optional_id")]
    pub agent_id: Option<String>,
    #[serde(default, alias = "last_emailed_date")]
    pub last_emailed: Option<String>,
}

/// Body of a contact create or update. `gender` is "M" or "F".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_carrier: String,
    pub plan_type: String,
    pub effective_date: String,
    pub birth_date: String,
    pub tobacco_user: bool,
    pub gender: String,
    pub state: String,
    pub zip_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl From<&Contact> for ContactDraft {
    fn from(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            current_carrier: contact.current_carrier.clone(),
            plan_type: contact.plan_type.clone(),
            effective_date: contact.effective_date.clone(),
            birth_date: contact.birth_date.clone(),
            tobacco_user: contact.tobacco_user,
            gender: contact.gender.clone(),
            state: contact.state.clone(),
            zip_code: contact.zip_code.clone(),
            agent_id: contact.agent_id.clone(),
        }
    }
}

/// What `/api/zip-lookup/{zip}` knows about a ZIP code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ZipInfo {
    #[serde(default, deserialize_with = "flexible::text")]
    pub state: String,
    #[serde(default)]
    pub counties: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Agent {
    #[serde(deserialize_with = "flexible::id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAgent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgSettings {
    #[serde(default)]
    pub state_licenses: Vec<String>,
    #[serde(default)]
    pub carrier_contracts: Vec<String>,
    #[serde(default)]
    pub state_carrier_settings: Vec<StateCarrierSetting>,
    #[serde(default, deserialize_with = "flexible::boolean")]
    pub allow_agent_settings: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCarrierSetting {
    pub state: String,
    pub carrier: String,
    #[serde(deserialize_with = "flexible::boolean")]
    pub active: bool,
    #[serde(rename = "targetGI", deserialize_with = "flexible::boolean")]
    pub target_gi: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SettingsResponse {
    pub settings: OrgSettings,
    #[serde(default)]
    pub carriers: Vec<String>,
}

/// Lenient field decoders for backends that mix SQLite integers with JSON types.
pub(crate) mod flexible {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolRepr {
        Bool(bool),
        Int(i64),
    }

    impl From<BoolRepr> for bool {
        fn from(repr: BoolRepr) -> bool {
            match repr {
                BoolRepr::Bool(b) => b,
                BoolRepr::Int(n) => n == 1,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Int(i64),
    }

    impl From<IdRepr> for String {
        fn from(repr: IdRepr) -> String {
            match repr {
                IdRepr::Text(s) => s,
                IdRepr::Int(n) => n.to_string(),
            }
        }
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        BoolRepr::deserialize(d).map(bool::from)
    }

    pub fn optional_boolean<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(Option::<BoolRepr>::deserialize(d)?.map(bool::from))
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        IdRepr::deserialize(d).map(String::from)
    }

    pub fn optional_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<IdRepr>::deserialize(d)?.map(String::from))
    }

    /// Explicit `null` reads as the empty string.
    pub fn nullable_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        optional_id(d).map(Option::unwrap_or_default)
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_accept_integers() {
        let session: SessionResponse = serde_json::from_value(serde_json::json!({
            "valid": 1,
            "session": "s",
            "email": "a@b.com",
            "organizationSlug": "acme",
            "first_name": "A",
            "last_name": "B",
            "id": 7
        }))
        .unwrap();
        assert!(session.valid);
        assert_eq!(session.id, "7");

        let me: MeResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "user": {
                "id": "u1",
                "email": "a@b.com",
                "is_admin": 0,
                "is_agent": 1,
                "organization_id": 3,
                "firstName": "A",
                "lastName": "B"
            }
        }))
        .unwrap();
        let user = me.user.unwrap();
        assert!(!user.is_admin);
        assert!(user.is_agent);
        assert_eq!(user.organization_id.as_deref(), Some("3"));
        assert_eq!(user.organization_setup_complete, None);
    }

    #[test]
    fn invalid_session_needs_only_the_flag() {
        let session: SessionResponse = serde_json::from_str(r#"{"valid":false}"#).unwrap();
        assert!(!session.valid);
        assert!(session.session.is_empty());
    }

    #[test]
    fn null_strings_in_a_valid_session_read_as_empty() {
        let session: SessionResponse = serde_json::from_value(serde_json::json!({
            "valid": true,
            "session": "s1",
            "email": "a@b.com",
            "organizationSlug": null,
            "first_name": null,
            "last_name": null,
            "id": null
        }))
        .unwrap();
        assert!(session.valid);
        assert_eq!(session.session, "s1");
        assert!(session.first_name.is_empty());
        assert!(session.organization_slug.is_empty());
        assert!(session.id.is_empty());

        let verify: VerifyResponse = serde_json::from_str(
            r#"{"success":true,"redirectUrl":null,"session":"s","email":null,"orgSlug":"a"}"#,
        )
        .unwrap();
        assert!(verify.redirect_url.is_empty());
    }

    #[test]
    fn null_user_decodes_to_none() {
        let me: MeResponse = serde_json::from_str(r#"{"success":false,"user":null}"#).unwrap();
        assert!(me.user.is_none());
    }

    #[test]
    fn tracking_event_omits_missing_metadata() {
        let event = TrackingEvent::new("t1", "eligibility_opened");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"tracking_id":"t1","event_type":"eligibility_opened"}"#);
    }

    #[test]
    fn paths_encode_dynamic_segments() {
        let req = ApiRequest::VerifyMagicLink {
            org_slug: "acme".into(),
            token: "a/b".into(),
        };
        assert_eq!(req.path(), "/api/auth/verify/acme/a%2Fb");
        assert_eq!(req.method(), HttpMethod::Get);
    }
    #[test]
    fn contact_writes_target_the_contacts_collection() {
        let draft = ContactDraft::default();
        let create = ApiRequest::CreateContact(draft.clone());
        assert_eq!((create.method(), create.path().as_str()), (HttpMethod::Post, "/api/contacts"));
        let update = ApiRequest::UpdateContact {
            id: "7".into(),
            contact: draft,
        };
        assert_eq!((update.method(), update.path().as_str()), (HttpMethod::Put, "/api/contacts/7"));
        let zip = ApiRequest::LookupZip { zip: "12345".into() };
        assert_eq!(zip.path(), "/api/zip-lookup/12345");
    }

    #[test]
    fn contact_draft_omits_unassigned_agent() {
        let json = serde_json::to_value(ContactDraft {
            gender: "F".into(),
            ..ContactDraft::default()
        })
        .unwrap();
        assert!(json.get("agent_id").is_none());
        assert_eq!(json["gender"], "F");
        assert_eq!(json["tobacco_user"], false);
    }
}
