//! Transport core: the one place a network call happens

use crate::{ClientError, Config, Outcome, Result};
use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

/// One call against the storage API
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    /// Appended to the configured base URL, e.g. `/files/abc`
    pub path: String,
    pub method: Method,
    /// Header overrides, applied over the defaults
    pub headers: HeaderMap,
    /// Serialized request body
    pub body: Option<Bytes>,
}

impl RequestDescriptor {
    /// A descriptor for `method` on `path`, with no body or overrides
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Override a header; the last value for a name wins
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Use raw bytes as the body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` as JSON and use it as the body
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_vec(body).map_err(ClientError::Encode)?;
        Ok(self.body(encoded))
    }
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self::get("")
    }
}

/// Headers sent with every request unless overridden
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// Defaults merged with `overrides`; overrides win on collision
fn merge_headers(overrides: &HeaderMap) -> HeaderMap {
    let mut headers = default_headers();
    for name in overrides.keys() {
        headers.remove(name);
        for value in overrides.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// Performs requests against one configured API base URL
#[derive(Clone, Debug)]
pub struct Transport {
    base_url: String,
    http: Client,
}

impl Transport {
    /// Build a transport from `config`
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Config(format!("invalid endpoint '{}': {}", base_url, e)))?;

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ClientError::Config(format!("invalid user agent: {}", e)))?;

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Http)?;

        Ok(Self { base_url, http })
    }

    /// Base URL every descriptor path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a path under the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Perform exactly one request and shape the result.
    ///
    /// Never fails: transport errors, unparsable bodies, API errors and
    /// bodies that do not decode as `T` all come back as
    /// [`Outcome::Error`].
    #[instrument(
        skip(self, descriptor),
        fields(method = %descriptor.method, path = %descriptor.path)
    )]
    pub async fn send<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Outcome<T> {
        let outcome: Outcome<T> = self.execute::<T>(descriptor).await.into();
        if let Outcome::Error(err) = &outcome {
            debug!(error = %err, "Request did not succeed");
        }
        outcome
    }

    async fn execute<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let url = self.url_for(&descriptor.path);
        let mut req = self
            .http
            .request(descriptor.method.clone(), &url)
            .headers(merge_headers(&descriptor.headers));

        if let Some(body) = descriptor.body {
            req = req.body(body);
        }

        debug!("Sending {} request to {}", descriptor.method, url);
        let response = req.send().await?;
        let status = response.status();

        // Error bodies are JSON too, so parse before branching on status
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes).map_err(ClientError::Decode)?;

        if !status.is_success() {
            return Err(ClientError::from_api_body(status.as_u16(), &body));
        }

        serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_type() {
        let headers = merge_headers(&HeaderMap::new());
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_overrides_win() {
        let descriptor = RequestDescriptor::post("/files")
            .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("r-1"),
            );

        let headers = merge_headers(&descriptor.headers);
        assert_eq!(headers.get_all(header::CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get("x-request-id").unwrap(), "r-1");
    }

    #[test]
    fn test_descriptor_defaults_to_get() {
        let descriptor = RequestDescriptor::default();
        assert_eq!(descriptor.method, Method::GET);
        assert!(descriptor.path.is_empty());
        assert!(descriptor.body.is_none());
    }

    #[test]
    fn test_json_body() {
        let descriptor = RequestDescriptor::post("/addons")
            .json(&serde_json::json!({ "addon_type": "extra_100gb" }))
            .unwrap();
        assert_eq!(
            descriptor.body.as_deref(),
            Some(br#"{"addon_type":"extra_100gb"}"#.as_slice())
        );
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let err = Transport::new(&Config::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_url_for() {
        let transport = Transport::new(&Config::new("http://localhost:8080")).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080/api/storage");
        assert_eq!(
            transport.url_for("/files/1"),
            "http://localhost:8080/api/storage/files/1"
        );
    }
}
