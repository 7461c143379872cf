//! Client configuration

use crate::{ClientResult, NetworkHttpClient};

/// Client configuration for connecting to the metadata API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
        }
    }

    /// Load from `REORDER_API_URL`, `REORDER_API_TOKEN` and `REORDER_API_TIMEOUT`
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("REORDER_API_URL").unwrap_or_else(|_| "http://localhost:3000".into()),
        );
        config.token = std::env::var("REORDER_API_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = std::env::var("REORDER_API_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
