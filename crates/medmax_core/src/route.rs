//! URL <-> [`Route`] translation.
//!
//! Parsing is a pure, ordered match on literal path segments. Empty segments
//! are ignored, so `/contacts/` and `/contacts` are the same route. Relative
//! paths are split by hand rather than joined onto a base URL, so an escaped
//! `%2E%2E` segment stays a value instead of collapsing its parent.

use std::fmt;

use url::{form_urlencoded, Url};

const PARSE_BASE: &str = "http://localhost/";

/// Identifier of a subscription plan tier, as carried in `?plan=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanId(pub String);

impl PlanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A path parameter: an id or token taking one whole, non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathParam(String);

impl PathParam {
    /// `None` for the empty string, which has no segment form.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!value.is_empty()).then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PathParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Onboarding progress carried in setup-route query strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupProgress {
    pub plan: Option<PlanId>,
    pub org_settings_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompareParams {
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub gender: Option<String>,
    pub tobacco: Option<bool>,
    pub age: Option<u32>,
    pub plan_type: Option<String>,
    pub current_carrier: Option<String>,
    pub date_of_birth: Option<String>,
    pub quote_id: Option<String>,
    pub tracking_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicRoute {
    Home,
    Login,
    Signup,
    Pricing,
    VerifyMagicLink {
        org_slug: PathParam,
        token: PathParam,
    },
    Compare(CompareParams),
    Quote {
        quote_id: Option<String>,
        tracking_id: Option<String>,
    },
    Eligibility {
        quote_id: Option<String>,
        tracking_id: Option<String>,
    },
    Schedule {
        quote_id: Option<String>,
        status: Option<String>,
        tracking_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectedRoute {
    Dashboard,
    Contacts,
    Contact { id: PathParam },
    Settings,
    Profile,
    TempLanding,
    Agents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupRoute {
    ChoosePlan(Option<SetupProgress>),
    SetupSettings(Option<SetupProgress>),
    SetupAddAgents(Option<SetupProgress>),
}

impl SetupRoute {
    pub fn progress(&self) -> SetupProgress {
        match self {
            SetupRoute::ChoosePlan(progress)
            | SetupRoute::SetupSettings(progress)
            | SetupRoute::SetupAddAgents(progress) => progress.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Public(PublicRoute),
    Protected(ProtectedRoute),
    Setup(SetupRoute),
    NotFound,
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Setup,
}

impl Route {
    /// Parses an absolute URL or a path with optional query string.
    pub fn parse(raw: &str) -> Route {
        let Some((path, query)) = split_target(raw.trim()) else {
            return Route::NotFound;
        };

        let segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(decode_segment)
            .collect();
        let query = Query::parse(&query);
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [] => Route::Public(PublicRoute::Home),
            ["login"] => Route::Public(PublicRoute::Login),
            ["signup"] => Route::Public(PublicRoute::Signup),
            ["pricing"] => Route::Public(PublicRoute::Pricing),
            ["auth", "verify", org_slug, token] => Route::Public(PublicRoute::VerifyMagicLink {
                org_slug: PathParam((*org_slug).to_string()),
                token: PathParam((*token).to_string()),
            }),
            ["compare"] => Route::Public(PublicRoute::Compare(CompareParams {
                state: query.string("state"),
                zip: query.string("zip"),
                county: query.string("county"),
                gender: query.string("gender"),
                tobacco: query.string("tobacco").and_then(|v| parse_bool(&v)),
                age: query.string("age").and_then(|v| v.parse().ok()),
                plan_type: query.string("planType"),
                current_carrier: query.string("currentCarrier"),
                date_of_birth: query.string("dateOfBirth"),
                quote_id: query.string("quoteId"),
                tracking_id: query.string("trackingId"),
            })),
            ["quote"] => Route::Public(PublicRoute::Quote {
                quote_id: query.string("id"),
                tracking_id: query.string("tid"),
            }),
            ["eligibility"] => Route::Public(PublicRoute::Eligibility {
                quote_id: query.string("id"),
                tracking_id: query.string("tid"),
            }),
            ["schedule"] => Route::Public(PublicRoute::Schedule {
                quote_id: query.string("id"),
                status: query.string("status"),
                tracking_id: query.string("tid"),
            }),
            ["dashboard"] => Route::Protected(ProtectedRoute::Dashboard),
            ["contacts"] => Route::Protected(ProtectedRoute::Contacts),
            ["contact", id] => Route::Protected(ProtectedRoute::Contact {
                id: PathParam((*id).to_string()),
            }),
            ["settings"] => Route::Protected(ProtectedRoute::Settings),
            ["profile"] => Route::Protected(ProtectedRoute::Profile),
            ["welcome"] => Route::Protected(ProtectedRoute::TempLanding),
            ["add-agents"] => Route::Protected(ProtectedRoute::Agents),
            ["choose-plan"] => Route::Setup(SetupRoute::ChoosePlan(query.setup_progress())),
            ["setup", "settings"] => {
                Route::Setup(SetupRoute::SetupSettings(query.setup_progress()))
            }
            ["setup", "add-agents"] => {
                Route::Setup(SetupRoute::SetupAddAgents(query.setup_progress()))
            }
            _ => Route::NotFound,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Public(_) | Route::NotFound => Access::Public,
            Route::Protected(_) => Access::Protected,
            Route::Setup(_) => Access::Setup,
        }
    }

    /// Builds the canonical relative URL for this route.
    ///
    /// `NotFound` has no canonical URL and maps to `/not-found`, which parses
    /// back to `NotFound`.
    pub fn to_url(&self) -> String {
        let (segments, query): (Vec<&str>, Vec<(&str, String)>) = match self {
            Route::Public(public) => match public {
                PublicRoute::Home => (vec![], vec![]),
                PublicRoute::Login => (vec!["login"], vec![]),
                PublicRoute::Signup => (vec!["signup"], vec![]),
                PublicRoute::Pricing => (vec!["pricing"], vec![]),
                PublicRoute::VerifyMagicLink { org_slug, token } => {
                    (vec!["auth", "verify", org_slug.as_str(), token.as_str()], vec![])
                }
                PublicRoute::Compare(params) => (vec!["compare"], compare_query(params)),
                PublicRoute::Quote {
                    quote_id,
                    tracking_id,
                } => (
                    vec!["quote"],
                    optional_pairs([("id", quote_id), ("tid", tracking_id)]),
                ),
                PublicRoute::Eligibility {
                    quote_id,
                    tracking_id,
                } => (
                    vec!["eligibility"],
                    optional_pairs([("id", quote_id), ("tid", tracking_id)]),
                ),
                PublicRoute::Schedule {
                    quote_id,
                    status,
                    tracking_id,
                } => (
                    vec!["schedule"],
                    optional_pairs([("id", quote_id), ("status", status), ("tid", tracking_id)]),
                ),
            },
            Route::Protected(protected) => match protected {
                ProtectedRoute::Dashboard => (vec!["dashboard"], vec![]),
                ProtectedRoute::Contacts => (vec!["contacts"], vec![]),
                ProtectedRoute::Contact { id } => (vec!["contact", id.as_str()], vec![]),
                ProtectedRoute::Settings => (vec!["settings"], vec![]),
                ProtectedRoute::Profile => (vec!["profile"], vec![]),
                ProtectedRoute::TempLanding => (vec!["welcome"], vec![]),
                ProtectedRoute::Agents => (vec!["add-agents"], vec![]),
            },
            Route::Setup(setup) => match setup {
                SetupRoute::ChoosePlan(progress) => {
                    (vec!["choose-plan"], progress_query(progress.as_ref()))
                }
                SetupRoute::SetupSettings(progress) => {
                    (vec!["setup", "settings"], progress_query(progress.as_ref()))
                }
                SetupRoute::SetupAddAgents(progress) => {
                    (vec!["setup", "add-agents"], progress_query(progress.as_ref()))
                }
            },
            Route::NotFound => (vec!["not-found"], vec![]),
        };
        build_url(&segments, &query)
    }
}

fn build_url(segments: &[&str], query: &[(&str, String)]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        match *segment {
            // Unreserved, so `encode` leaves them as dot segments.
            "." => out.push_str("%2E"),
            ".." => out.push_str("%2E%2E"),
            other => out.push_str(&urlencoding::encode(other)),
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    if !query.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        out.push('?');
        out.push_str(&encoded);
    }
    out
}

/// Splits a target into raw path and raw query, dropping any fragment.
fn split_target(raw: &str) -> Option<(String, String)> {
    if raw.starts_with('/') && !raw.starts_with("//") {
        let raw = raw.split_once('#').map_or(raw, |(before, _)| before);
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        return Some((path.to_string(), query.to_string()));
    }
    let url = Url::parse(PARSE_BASE).ok()?.join(raw).ok()?;
    Some((url.path().to_string(), url.query().unwrap_or("").to_string()))
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn optional_pairs<'a, const N: usize>(
    pairs: [(&'a str, &Option<String>); N],
) -> Vec<(&'a str, String)> {
    pairs
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
}

fn progress_query(progress: Option<&SetupProgress>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(progress) = progress {
        if let Some(plan) = &progress.plan {
            query.push(("plan", plan.0.clone()));
        }
        if progress.org_settings_complete {
            query.push(("org", "complete".to_string()));
        }
        // Present but empty still marks the progress as given.
        if query.is_empty() {
            query.push(("org", String::new()));
        }
    }
    query
}

fn compare_query(params: &CompareParams) -> Vec<(&'static str, String)> {
    let mut query = optional_pairs([
        ("state", &params.state),
        ("zip", &params.zip),
        ("county", &params.county),
        ("gender", &params.gender),
    ]);
    if let Some(tobacco) = params.tobacco {
        query.push(("tobacco", tobacco.to_string()));
    }
    if let Some(age) = params.age {
        query.push(("age", age.to_string()));
    }
    query.extend(optional_pairs([
        ("planType", &params.plan_type),
        ("currentCarrier", &params.current_carrier),
        ("dateOfBirth", &params.date_of_birth),
        ("quoteId", &params.quote_id),
        ("trackingId", &params.tracking_id),
    ]));
    query
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

struct Query(Vec<(String, String)>);

impl Query {
    fn parse(raw: &str) -> Self {
        Self(form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
    }

    /// First value for `key`. `?id=` gives `Some("")`; pages treat that as absent.
    fn string(&self, key: &str) -> Option<String> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    fn setup_progress(&self) -> Option<SetupProgress> {
        let plan = self.string("plan").map(PlanId);
        let org = self.string("org");
        if plan.is_none() && org.is_none() {
            return None;
        }
        Some(SetupProgress {
            plan,
            org_settings_complete: org.as_deref() == Some("complete"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_and_absolute_urls_parse() {
        assert_eq!(
            Route::parse("/contacts/"),
            Route::Protected(ProtectedRoute::Contacts)
        );
        assert_eq!(
            Route::parse("https://app.example.com/settings"),
            Route::Protected(ProtectedRoute::Settings)
        );
    }

    #[test]
    fn setup_settings_is_not_confused_with_settings() {
        assert_eq!(
            Route::parse("/setup/settings?plan=basic"),
            Route::Setup(SetupRoute::SetupSettings(Some(SetupProgress {
                plan: Some(PlanId::new("basic")),
                org_settings_complete: false,
            })))
        );
        assert_eq!(Route::parse("/settings/setup"), Route::NotFound);
    }

    #[test]
    fn unknown_org_value_is_not_complete() {
        let route = Route::parse("/choose-plan?org=pending");
        assert_eq!(
            route,
            Route::Setup(SetupRoute::ChoosePlan(Some(SetupProgress {
                plan: None,
                org_settings_complete: false,
            })))
        );
    }

    #[test]
    fn encoded_segments_are_decoded() {
        assert_eq!(
            Route::parse("/auth/verify/acme%20co/tok%2Fen"),
            Route::Public(PublicRoute::VerifyMagicLink {
                org_slug: PathParam::new("acme co").unwrap(),
                token: PathParam::new("tok/en").unwrap(),
            })
        );
    }

    #[test]
    fn dot_segments_are_escaped_not_collapsed() {
        let route = Route::Public(PublicRoute::VerifyMagicLink {
            org_slug: PathParam::new(".").unwrap(),
            token: PathParam::new("..").unwrap(),
        });
        assert_eq!(route.to_url(), "/auth/verify/%2E/%2E%2E");
        assert_eq!(Route::parse(&route.to_url()), route);
        // Unescaped dots still normalize the way a browser would.
        assert_eq!(
            Route::parse("https://app.example.com/contacts/x/.."),
            Route::Protected(ProtectedRoute::Contacts)
        );
    }

    #[test]
    fn fragment_is_ignored() {
        assert_eq!(
            Route::parse("/quote?id=abc#top"),
            Route::Public(PublicRoute::Quote {
                quote_id: Some("abc".into()),
                tracking_id: None,
            })
        );
    }

    #[test]
    fn empty_path_param_is_rejected() {
        assert_eq!(PathParam::new(""), None);
        assert_eq!(PathParam::new("7").map(PathParam::into_string), Some("7".into()));
    }
}
