use futures_util::StreamExt;
use medmax_core::{ApiRequest, ApiResult, HttpMethod, RequestError};
use medmax_logging::medmax_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use url::Url;

use crate::codec::{decode_response, encode_body};
use crate::settings::ClientSettings;

#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// Performs `request`, authenticating with `session` when given.
    async fn send(&self, request: &ApiRequest, session: Option<&str>) -> ApiResult;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| RequestError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RequestError::Network(err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, request: &ApiRequest) -> Result<Url, RequestError> {
        self.base
            .join(&request.path())
            .map_err(|err| RequestError::InvalidUrl(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn send(&self, request: &ApiRequest, session: Option<&str>) -> ApiResult {
        let url = self.endpoint(request)?;
        let mut builder = match request.method() {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
        };
        builder = builder.header(ACCEPT, "application/json");
        if let Some(token) = session.filter(|t| !t.is_empty()) {
            builder = builder.header(COOKIE, format!("session={token}"));
        }
        if let Some(body) = encode_body(request)? {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            medmax_debug!("{} answered {status}", request.label());
            return Err(RequestError::HttpStatus(status.as_u16()));
        }

        let max_bytes = self.settings.max_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(RequestError::TooLarge { max_bytes });
        }
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(RequestError::TooLarge { max_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        decode_response(request, &body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::Timeout;
    }
    RequestError::Network(err.to_string())
}
