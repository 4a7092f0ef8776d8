use std::sync::{Arc, Mutex};
use std::time::Duration;

use medmax_client::{ApiClient, ApiHandle, Completion};
use medmax_core::{ApiRequest, ApiResponse, ApiResult, ReplyTo};

/// Records the session each request was sent with.
#[derive(Default)]
struct RecordingClient {
    seen: Mutex<Vec<(ApiRequest, Option<String>)>>,
}

#[async_trait::async_trait]
impl ApiClient for RecordingClient {
    async fn send(&self, request: &ApiRequest, session: Option<&str>) -> ApiResult {
        self.seen
            .lock()
            .unwrap()
            .push((request.clone(), session.map(str::to_string)));
        Ok(ApiResponse::Ack)
    }
}

#[test]
fn completions_carry_the_reply_tag_and_request() {
    let client = Arc::new(RecordingClient::default());
    let handle = ApiHandle::with_client(client.clone()).expect("handle");

    handle.submit(ApiRequest::FetchAgents, ReplyTo::Page(4));
    let completion = handle
        .recv_timeout(Duration::from_secs(5))
        .expect("completion");
    assert_eq!(
        completion,
        Completion {
            reply: ReplyTo::Page(4),
            request: ApiRequest::FetchAgents,
            result: Ok(ApiResponse::Ack),
        }
    );
}

#[test]
fn session_token_applies_to_later_requests() {
    let client = Arc::new(RecordingClient::default());
    let handle = ApiHandle::with_client(client.clone()).expect("handle");

    handle.submit(ApiRequest::CheckSession, ReplyTo::Router);
    handle.recv_timeout(Duration::from_secs(5)).expect("first");
    handle.set_session_token(Some("abc".into()));
    handle.submit(ApiRequest::FetchCurrentUser, ReplyTo::Router);
    handle.recv_timeout(Duration::from_secs(5)).expect("second");
    drop(handle);

    let seen = client.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (ApiRequest::CheckSession, None),
            (ApiRequest::FetchCurrentUser, Some("abc".to_string())),
        ]
    );
}
