//! JSON bodies in and out, keyed by the request that produced them.

use medmax_core::api::{
    Agent, Contact, MeResponse, QuoteData, SessionResponse, SettingsResponse, VerifyResponse,
    ZipInfo,
};
use medmax_core::{ApiRequest, ApiResponse, ApiResult, RequestError};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Serializes the JSON body for `request`, if it carries one.
pub fn encode_body(request: &ApiRequest) -> Result<Option<Vec<u8>>, RequestError> {
    let body = match request {
        ApiRequest::RequestLoginLink { email } => serde_json::to_vec(&json!({ "email": email })),
        ApiRequest::Signup(signup) => serde_json::to_vec(signup),
        ApiRequest::TrackEvent(event) => serde_json::to_vec(event),
        ApiRequest::RequestCallback(callback) => serde_json::to_vec(callback),
        ApiRequest::SaveSettings(settings) => serde_json::to_vec(settings),
        ApiRequest::UpdateProfile(profile) => serde_json::to_vec(profile),
        ApiRequest::CreateAgent(agent) => serde_json::to_vec(agent),
        ApiRequest::CreateContact(contact) | ApiRequest::UpdateContact { contact, .. } => {
            serde_json::to_vec(contact)
        }
        ApiRequest::CheckSession
        | ApiRequest::VerifyMagicLink { .. }
        | ApiRequest::FetchCurrentUser
        | ApiRequest::Logout
        | ApiRequest::FinalizeOrganization { .. }
        | ApiRequest::SetupOrganizationDatabase { .. }
        | ApiRequest::FetchQuote { .. }
        | ApiRequest::FetchContacts
        | ApiRequest::FetchContact { .. }
        | ApiRequest::LookupZip { .. }
        | ApiRequest::FetchSettings
        | ApiRequest::FetchAgents => return Ok(None),
    };
    body.map(Some)
        .map_err(|err| RequestError::Decode(format!("encode {}: {err}", request.label())))
}

/// Decodes a 2xx body into the response shape `request` expects.
pub fn decode_response(request: &ApiRequest, body: &[u8]) -> ApiResult {
    match request {
        ApiRequest::CheckSession => parse::<SessionResponse>(body).map(ApiResponse::Session),
        ApiRequest::VerifyMagicLink { .. } => {
            parse::<VerifyResponse>(body).map(ApiResponse::Verification)
        }
        ApiRequest::FetchCurrentUser => parse::<MeResponse>(body).map(ApiResponse::CurrentUser),
        ApiRequest::FetchQuote { .. } => parse::<QuoteData>(body).map(ApiResponse::Quote),
        ApiRequest::FetchContacts => parse::<Vec<Contact>>(body).map(ApiResponse::Contacts),
        ApiRequest::FetchContact { .. }
        | ApiRequest::CreateContact(_)
        | ApiRequest::UpdateContact { .. } => parse::<Contact>(body).map(ApiResponse::Contact),
        ApiRequest::LookupZip { .. } => parse::<ZipInfo>(body).map(ApiResponse::Zip),
        ApiRequest::FetchSettings => parse::<SettingsResponse>(body).map(ApiResponse::Settings),
        ApiRequest::FetchAgents => parse::<Vec<Agent>>(body).map(ApiResponse::Agents),
        ApiRequest::CreateAgent(_) => {
            // Older backends answer with an empty body.
            if body.iter().all(u8::is_ascii_whitespace) {
                Ok(ApiResponse::Ack)
            } else {
                parse::<Agent>(body).map(ApiResponse::Agent)
            }
        }
        ApiRequest::RequestLoginLink { .. }
        | ApiRequest::Logout
        | ApiRequest::Signup(_)
        | ApiRequest::FinalizeOrganization { .. }
        | ApiRequest::SetupOrganizationDatabase { .. }
        | ApiRequest::TrackEvent(_)
        | ApiRequest::RequestCallback(_)
        | ApiRequest::SaveSettings(_)
        | ApiRequest::UpdateProfile(_) => Ok(ApiResponse::Ack),
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(body).map_err(|err| RequestError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medmax_core::api::{ContactDraft, TrackingEvent};

    #[test]
    fn tracking_body_omits_missing_metadata() {
        let request = ApiRequest::TrackEvent(TrackingEvent::new("t1", "eligibility_opened"));
        let body = encode_body(&request).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({ "tracking_id": "t1", "event_type": "eligibility_opened" })
        );
    }

    #[test]
    fn get_requests_have_no_body() {
        assert_eq!(encode_body(&ApiRequest::FetchContacts).unwrap(), None);
        assert_eq!(encode_body(&ApiRequest::CheckSession).unwrap(), None);
    }

    #[test]
    fn contacts_accept_integer_booleans() {
        let body = br#"[{
            "id": 4, "first_name": "Ann", "last_name": "Ray",
            "email": "a@r.test", "tobacco_user": 1
        }]"#;
        let Ok(ApiResponse::Contacts(contacts)) = decode_response(&ApiRequest::FetchContacts, body)
        else {
            panic!("expected contacts");
        };
        assert_eq!(contacts[0].id, "4");
        assert!(contacts[0].tobacco_user);
    }

    #[test]
    fn contact_update_sends_the_draft_and_reads_back_the_row() {
        let request = ApiRequest::UpdateContact {
            id: "4".into(),
            contact: ContactDraft {
                first_name: "Ann".into(),
                zip_code: "12345".into(),
                ..ContactDraft::default()
            },
        };
        let body = encode_body(&request).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["first_name"], "Ann");
        assert_eq!(value["zip_code"], "12345");

        let reply = br#"{"id": 4, "first_name": "Ann", "last_name": "", "email": "a@r.test"}"#;
        let Ok(ApiResponse::Contact(contact)) = decode_response(&request, reply) else {
            panic!("expected contact");
        };
        assert_eq!(contact.id, "4");
    }

    #[test]
    fn zip_lookup_decodes_state_and_places() {
        let request = ApiRequest::LookupZip { zip: "10001".into() };
        assert_eq!(encode_body(&request).unwrap(), None);
        let body = br#"{"state": "NY", "counties": ["New York"], "cities": ["New York"]}"#;
        let Ok(ApiResponse::Zip(zip)) = decode_response(&request, body) else {
            panic!("expected zip info");
        };
        assert_eq!(zip.state, "NY");
        assert_eq!(zip.counties, vec!["New York".to_string()]);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let result = decode_response(&ApiRequest::CheckSession, b"<html>");
        assert!(matches!(result, Err(RequestError::Decode(_))));
    }
}
