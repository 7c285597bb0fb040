//! Transport seam between the resource engine and the network.
//!
//! The engine only ever talks to a [`Transport`]. [`HttpTransport`] is the
//! production adapter built on reqwest; [`StubTransport`](crate::stub::StubTransport)
//! is the in-memory one used by tests.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AsanaError, Result};
use crate::request::Request;

const USER_AGENT: &str = concat!("asanapi/", env!("CARGO_PKG_VERSION"));

/// Status, headers and undecoded body of an HTTP exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests. Implementations must be reentrant: pagination calls
/// `execute` repeatedly on the same instance.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response could be obtained.
    async fn execute(&self, request: &Request) -> Result<RawResponse>;
}

/// Join a request path onto the API base URL.
///
/// The base is treated as a directory, so `https://app.asana.com/api/1.0`
/// plus `/users/me` yields `https://app.asana.com/api/1.0/users/me`.
///
/// # Errors
///
/// Returns an error if the joined URL is invalid.
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url> {
    Ok(base_url.join(path.trim_start_matches('/'))?)
}

/// Normalize a base URL so relative joins keep its last segment.
pub(crate) fn directory_url(base_url: &str) -> Result<Url> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Ok(Url::parse(&base)?)
}

/// reqwest-backed transport with bearer authentication.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport for the given access token and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = directory_url(base_url)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()
            .map_err(AsanaError::HttpError)?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: &Request) -> Result<RawResponse> {
        let url = resolve_url(&self.base_url, &request.path)?;

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .bearer_auth(&self.token)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(AsanaError::HttpError)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(AsanaError::HttpError)?.to_vec();

        tracing::debug!(status, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
