use medmax_core::route::{CompareParams, ProtectedRoute, PublicRoute, SetupRoute};
use medmax_core::{Access, PathParam, PlanId, Route, SetupProgress};
use pretty_assertions::assert_eq;

fn progress(plan: Option<&str>, complete: bool) -> Option<SetupProgress> {
    Some(SetupProgress {
        plan: plan.map(PlanId::new),
        org_settings_complete: complete,
    })
}

fn param(value: &str) -> PathParam {
    PathParam::new(value).expect("non-empty path param")
}

fn every_route() -> Vec<Route> {
    vec![
        Route::Public(PublicRoute::Home),
        Route::Public(PublicRoute::Login),
        Route::Public(PublicRoute::Signup),
        Route::Public(PublicRoute::Pricing),
        Route::Public(PublicRoute::VerifyMagicLink {
            org_slug: param("acme-insurance"),
            token: param("tok en/1"),
        }),
        Route::Public(PublicRoute::VerifyMagicLink {
            org_slug: param("."),
            token: param(".."),
        }),
        Route::Public(PublicRoute::Compare(CompareParams::default())),
        Route::Public(PublicRoute::Compare(CompareParams {
            state: Some("TX".into()),
            zip: Some("78701".into()),
            county: Some("Travis".into()),
            gender: Some("F".into()),
            tobacco: Some(false),
            age: Some(67),
            plan_type: Some("G".into()),
            current_carrier: Some("Aetna & Co".into()),
            date_of_birth: Some("1958-04-01".into()),
            quote_id: Some("q1".into()),
            tracking_id: Some("t1".into()),
        })),
        Route::Public(PublicRoute::Quote {
            quote_id: Some("abc".into()),
            tracking_id: None,
        }),
        Route::Public(PublicRoute::Quote {
            quote_id: Some(String::new()),
            tracking_id: Some("a=b&c".into()),
        }),
        Route::Public(PublicRoute::Eligibility {
            quote_id: Some("abc".into()),
            tracking_id: Some("t9".into()),
        }),
        Route::Public(PublicRoute::Schedule {
            quote_id: Some("abc".into()),
            status: Some("decline".into()),
            tracking_id: Some("t9".into()),
        }),
        Route::Protected(ProtectedRoute::Dashboard),
        Route::Protected(ProtectedRoute::Contacts),
        Route::Protected(ProtectedRoute::Contact { id: param("17") }),
        Route::Protected(ProtectedRoute::Contact { id: param("a?b#c") }),
        Route::Protected(ProtectedRoute::Settings),
        Route::Protected(ProtectedRoute::Profile),
        Route::Protected(ProtectedRoute::TempLanding),
        Route::Protected(ProtectedRoute::Agents),
        Route::Setup(SetupRoute::ChoosePlan(None)),
        Route::Setup(SetupRoute::ChoosePlan(Some(SetupProgress::default()))),
        Route::Setup(SetupRoute::SetupSettings(progress(Some(""), false))),
        Route::Setup(SetupRoute::ChoosePlan(progress(Some("G"), true))),
        Route::Setup(SetupRoute::SetupSettings(progress(Some("pro"), false))),
        Route::Setup(SetupRoute::SetupAddAgents(progress(Some("pro"), true))),
        Route::NotFound,
    ]
}

#[test]
fn every_route_round_trips_through_its_url() {
    for route in every_route() {
        let url = route.to_url();
        assert_eq!(Route::parse(&url), route, "url {url}");
    }
}

#[test]
fn choose_plan_reads_plan_and_org_flags() {
    assert_eq!(
        Route::parse("/choose-plan?plan=G&org=complete"),
        Route::Setup(SetupRoute::ChoosePlan(progress(Some("G"), true)))
    );
}

#[test]
fn empty_values_survive_the_round_trip() {
    assert_eq!(
        Route::Setup(SetupRoute::ChoosePlan(Some(SetupProgress::default()))).to_url(),
        "/choose-plan?org="
    );
    assert_eq!(
        Route::parse("/quote?id="),
        Route::Public(PublicRoute::Quote {
            quote_id: Some(String::new()),
            tracking_id: None,
        })
    );
    assert_eq!(Route::parse("/contact/"), Route::NotFound);
    assert_eq!(PathParam::new(""), None);
}

#[test]
fn extra_segments_are_not_found() {
    assert_eq!(Route::parse("/dashboard/extra"), Route::NotFound);
    assert_eq!(Route::parse("/auth/verify/acme"), Route::NotFound);
    assert_eq!(Route::parse("/nope"), Route::NotFound);
}

#[test]
fn access_is_fixed_by_route_kind() {
    assert_eq!(Route::parse("/quote?id=1").access(), Access::Public);
    assert_eq!(Route::parse("/contact/3").access(), Access::Protected);
    assert_eq!(Route::parse("/setup/add-agents").access(), Access::Setup);
    assert_eq!(Route::parse("/missing").access(), Access::Public);
}
