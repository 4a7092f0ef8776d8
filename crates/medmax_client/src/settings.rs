use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Origin the `/api/...` paths are joined onto.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Largest response body accepted, in bytes.
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}
