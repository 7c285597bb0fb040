//! In-memory stub of the Asana API for tests.
//!
//! A [`StubTransport`] answers requests from handlers registered per
//! method and path. It plugs into [`AsanaClient`](crate::AsanaClient) like
//! the real transport, so tests exercise the full request, parse and
//! decode pipeline without a network.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use asanapi::stub::StubTransport;
//! use asanapi::{AsanaClient, ClientConfig, HttpMethod, RequestOptions, User};
//!
//! # #[tokio::main]
//! # async fn main() -> asanapi::Result<()> {
//! let api = Arc::new(StubTransport::default());
//! api.on(HttpMethod::Get, "/users/me", |response| {
//!     response.status = 200; // the default
//!     response.body = Some(serde_json::json!({
//!         "data": {"gid": "123", "resource_type": "user", "name": "Greg"}
//!     }));
//! });
//!
//! let client = AsanaClient::with_transport(api.clone(), ClientConfig::default());
//! let me = User::me(&client, RequestOptions::new()).await?;
//! assert_eq!(me.name.as_deref(), Some("Greg"));
//! assert_eq!(api.calls(HttpMethod::Get, "/users/me"), 1);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::client::DEFAULT_BASE_URL;
use crate::error::{AsanaError, Result};
use crate::request::{HttpMethod, Request};
use crate::transport::{directory_url, resolve_url, RawResponse, Transport};

type Handler = Arc<dyn Fn(&mut StubResponse) + Send + Sync>;

/// Response descriptor handed to a stub handler.
///
/// Starts as `200`, no extra headers, empty body.
#[derive(Debug, Clone)]
pub struct StubResponse {
    request: Request,
    pub status: u16,
    /// Merged over `Content-Type: application/json`.
    pub headers: BTreeMap<String, String>,
    /// Serialized as JSON. `None` sends an empty body.
    pub body: Option<Value>,
    /// Sent verbatim instead of `body` when set.
    pub raw_body: Option<Vec<u8>>,
}

impl StubResponse {
    fn new(request: Request) -> Self {
        Self {
            request,
            status: 200,
            headers: BTreeMap::new(),
            body: None,
            raw_body: None,
        }
    }

    /// The request being answered.
    pub fn request(&self) -> &Request {
        &self.request
    }

    fn into_raw(self) -> Result<RawResponse> {
        let mut headers = BTreeMap::from([(
            "content-type".to_string(),
            "application/json".to_string(),
        )]);
        headers.extend(
            self.headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value)),
        );

        let body = match (self.raw_body, self.body) {
            (Some(raw), _) => raw,
            (None, Some(json)) => serde_json::to_vec(&json)?,
            (None, None) => Vec::new(),
        };

        Ok(RawResponse {
            status: self.status,
            headers,
            body,
        })
    }
}

/// Deterministic transport that serves registered handlers.
///
/// One handler per method and path; registering again replaces it. Query
/// strings take no part in matching. Requests with no handler fail with
/// [`AsanaError::UnstubbedRequest`].
pub struct StubTransport {
    base_url: Url,
    stubs: RwLock<HashMap<(HttpMethod, String), Handler>>,
    requests: Mutex<Vec<Request>>,
}

impl StubTransport {
    /// Create a stub rooted at `base_url`, the same value the client is configured with.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self::with_base_url(directory_url(base_url)?))
    }

    fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            stubs: RwLock::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Register the handler for `method` and `path`, replacing any earlier one.
    pub fn on<F>(&self, method: HttpMethod, path: &str, handler: F)
    where
        F: Fn(&mut StubResponse) + Send + Sync + 'static,
    {
        let key = (method, self.match_path(path));
        self.stubs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::new(handler));
    }

    /// Answer a request from the registered handler.
    ///
    /// # Errors
    ///
    /// Returns [`AsanaError::UnstubbedRequest`] when nothing is registered for
    /// the request's method and path.
    pub fn dispatch(&self, request: &Request) -> Result<RawResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let key = (request.method, self.match_path(&request.path));
        let handler = self
            .stubs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        let Some(handler) = handler else {
            tracing::warn!(%request, "unstubbed request");
            return Err(AsanaError::UnstubbedRequest {
                method: request.method,
                path: request.path.clone(),
            });
        };

        let mut response = StubResponse::new(request.clone());
        handler(&mut response);
        tracing::debug!(%request, status = response.status, "stubbed response");
        response.into_raw()
    }

    /// Total number of dispatched requests, stubbed or not.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of dispatched requests for one method and path.
    pub fn calls(&self, method: HttpMethod, path: &str) -> usize {
        let path = self.match_path(path);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method && self.match_path(&r.path) == path)
            .count()
    }

    /// Every dispatched request, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Path under the base URL, query string dropped, percent-decoded so a
    /// literal `/users/a@b.com` and the built `/users/a%40b.com` compare equal.
    fn match_path(&self, path: &str) -> String {
        let resolved = resolve_url(&self.base_url, path)
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| path.split('?').next().unwrap_or(path).to_string());
        urlencoding::decode(&resolved)
            .map(Cow::into_owned)
            .unwrap_or(resolved)
    }
}

impl Default for StubTransport {
    fn default() -> Self {
        let base_url = directory_url(DEFAULT_BASE_URL).expect("default base URL is valid");
        Self::with_base_url(base_url)
    }
}

impl std::fmt::Debug for StubTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stubs = self
            .stubs
            .read()
            .map(|s| s.len())
            .unwrap_or_default();
        f.debug_struct("StubTransport")
            .field("base_url", &self.base_url.as_str())
            .field("stubs", &stubs)
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: &Request) -> Result<RawResponse> {
        self.dispatch(request)
    }
}
