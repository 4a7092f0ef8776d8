use std::time::Duration;

use medmax_client::{ApiClient, ClientSettings, ReqwestApiClient};
use medmax_core::api::{NewAgent, TrackingEvent};
use medmax_core::{ApiRequest, ApiResponse, RequestError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestApiClient {
    ReqwestApiClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn session_check_sends_cookie_and_decodes_lenient_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/session"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": 1,
            "session": "abc",
            "email": "pat@acme.test",
            "organizationSlug": "acme",
            "first_name": "Pat",
            "last_name": "Lee",
            "id": 12
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .send(&ApiRequest::CheckSession, Some("abc"))
        .await;
    let Ok(ApiResponse::Session(session)) = result else {
        panic!("unexpected result {result:?}");
    };
    assert!(session.valid);
    assert_eq!(session.id, "12");
    assert_eq!(session.organization_slug, "acme");
}

#[tokio::test]
async fn verify_path_is_built_from_slug_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify/acme/tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "redirectUrl": "/choose-plan",
            "session": "abc",
            "email": "pat@acme.test",
            "orgSlug": "acme"
        })))
        .mount(&server)
        .await;

    let request = ApiRequest::VerifyMagicLink {
        org_slug: "acme".into(),
        token: "tok123".into(),
    };
    let result = client_for(&server).send(&request, None).await;
    let Ok(ApiResponse::Verification(verify)) = result else {
        panic!("unexpected result {result:?}");
    };
    assert_eq!(verify.redirect_url, "/choose-plan");
    assert_eq!(verify.session, "abc");
}

#[tokio::test]
async fn tracking_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/contact-events"))
        .and(body_json(json!({
            "tracking_id": "t1",
            "event_type": "schedule_opened",
            "metadata": { "status": "accept" }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let event = TrackingEvent::new("t1", "schedule_opened").with_metadata("status", "accept");
    let result = client_for(&server)
        .send(&ApiRequest::TrackEvent(event), None)
        .await;
    assert_eq!(result, Ok(ApiResponse::Ack));
}

#[tokio::test]
async fn created_agent_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "first_name": "Sam",
            "last_name": "Fox",
            "email": "sam@acme.test",
            "phone": "555-0100",
            "created_at": "2024-01-01"
        })))
        .mount(&server)
        .await;

    let request = ApiRequest::CreateAgent(NewAgent {
        first_name: "Sam".into(),
        last_name: "Fox".into(),
        email: "sam@acme.test".into(),
        phone: "555-0100".into(),
    });
    let result = client_for(&server).send(&request, Some("abc")).await;
    let Ok(ApiResponse::Agent(agent)) = result else {
        panic!("unexpected result {result:?}");
    };
    assert_eq!(agent.id, "5");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/quotes/decode/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let request = ApiRequest::FetchQuote {
        quote_id: "missing".into(),
    };
    let result = client_for(&server).send(&request, None).await;
    assert_eq!(result, Err(RequestError::HttpStatus(404)));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[".repeat(64)))
        .mount(&server)
        .await;

    let client = ReqwestApiClient::new(ClientSettings {
        base_url: server.uri(),
        max_bytes: 16,
        ..ClientSettings::default()
    })
    .expect("client");
    let result = client.send(&ApiRequest::FetchContacts, None).await;
    assert_eq!(result, Err(RequestError::TooLarge { max_bytes: 16 }));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = ReqwestApiClient::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");
    let result = client.send(&ApiRequest::FetchCurrentUser, None).await;
    assert_eq!(result, Err(RequestError::Timeout));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = ReqwestApiClient::new(ClientSettings {
        base_url: "http://127.0.0.1:9".into(),
        connect_timeout: Duration::from_millis(200),
        ..ClientSettings::default()
    })
    .expect("client");
    let result = client.send(&ApiRequest::CheckSession, None).await;
    assert!(
        matches!(result, Err(RequestError::Network(_)) | Err(RequestError::Timeout)),
        "{result:?}"
    );
}
