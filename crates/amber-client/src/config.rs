//! Client configuration

use std::time::Duration;

/// Base path the storage API is mounted under
pub const DEFAULT_BASE_PATH: &str = "/api/storage";

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Server origin, e.g. `https://app.example.com`
    pub endpoint: String,
    /// Path prefix of the storage API on that server
    pub base_path: String,
    /// Request timeout. `None` leaves timing entirely to the transport.
    pub timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5173".to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: None,
            user_agent: format!("amber-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Create a new config with the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the API base path
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Endpoint and base path joined, without a trailing slash
    pub fn base_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        let base_path = self.base_path.trim_matches('/');
        if base_path.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}/{}", endpoint, base_path)
        }
    }
}
