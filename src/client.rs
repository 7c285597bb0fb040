//! Asana API client.
//!
//! Ties a [`Transport`] to the response parser and the resource factory.
//! Resource-specific operations live on the resource types and take the
//! client by reference.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AsanaError, Result};
use crate::factory::{Decode, ResourceFactory, ResourceRegistry, TypeMode};
use crate::params::DEFAULT_PER_PAGE;
use crate::request::Request;
use crate::response::{self, Envelope};
use crate::transport::{HttpTransport, Transport};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Client settings other than credentials.
///
/// The same `base_url` is handed to whichever transport the client uses,
/// including [`StubTransport`](crate::stub::StubTransport) in tests.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Page size used when an operation's options leave it unset.
    pub per_page: u32,
    pub type_mode: TypeMode,
    pub timeout: Duration,
    pub registry: ResourceRegistry,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            type_mode: TypeMode::default(),
            timeout: DEFAULT_TIMEOUT,
            registry: ResourceRegistry::default(),
        }
    }
}

impl ClientConfig {
    /// Read optional settings from the environment.
    ///
    /// - `ASANA_BASE_URL` (defaults to `https://app.asana.com/api/1.0`)
    /// - `ASANA_PER_PAGE` (defaults to 20)
    /// - `ASANA_STRICT_TYPES` (`1` or `true` enables strict typing)
    ///
    /// # Errors
    ///
    /// Returns an error if `ASANA_PER_PAGE` is not a positive integer.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("ASANA_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(per_page) = env::var("ASANA_PER_PAGE") {
            config.per_page = per_page
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    AsanaError::ConfigMissing(format!(
                        "ASANA_PER_PAGE must be a positive integer, got '{per_page}'"
                    ))
                })?;
        }

        if let Ok(strict) = env::var("ASANA_STRICT_TYPES") {
            if matches!(strict.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config.type_mode = TypeMode::Strict;
            }
        }

        Ok(config)
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    #[must_use]
    pub fn type_mode(mut self, type_mode: TypeMode) -> Self {
        self.type_mode = type_mode;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: ResourceRegistry) -> Self {
        self.registry = registry;
        self
    }
}

/// Asana API client.
///
/// Cheaply cloneable; clones share the transport and the factory.
///
/// # Example
///
/// ```no_run
/// use asanapi::AsanaClient;
///
/// # fn example() -> asanapi::Result<()> {
/// // Create from environment variables
/// let client = AsanaClient::from_env()?;
///
/// // Or configure manually
/// let client = AsanaClient::new("personal-access-token", "https://app.asana.com/api/1.0")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AsanaClient {
    transport: Arc<dyn Transport>,
    factory: Arc<ResourceFactory>,
    base_url: Arc<str>,
    per_page: u32,
}

impl std::fmt::Debug for AsanaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsanaClient")
            .field("base_url", &self.base_url)
            .field("per_page", &self.per_page)
            .field("type_mode", &self.factory.mode())
            .finish_non_exhaustive()
    }
}

impl AsanaClient {
    /// Create a client from environment variables.
    ///
    /// Uses `ASANA_ACCESS_TOKEN` for authentication plus the optional
    /// settings read by [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if `ASANA_ACCESS_TOKEN` is not set or a setting is invalid.
    pub fn from_env() -> Result<Self> {
        let token = env::var("ASANA_ACCESS_TOKEN").map_err(|_| {
            AsanaError::ConfigMissing("ASANA_ACCESS_TOKEN environment variable not set".to_string())
        })?;

        Self::with_config(&token, ClientConfig::from_env()?)
    }

    /// Create a client with the provided token and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        Self::with_config(token, ClientConfig::default().base_url(base_url))
    }

    /// Create a client over HTTP with full configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_config(token: &str, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(token, &config.base_url, config.timeout)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create a client over any transport, e.g. a stub in tests.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            transport,
            factory: Arc::new(ResourceFactory::new(config.registry, config.type_mode)),
            base_url: Arc::from(config.base_url),
            per_page: config.per_page,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default page size for list operations.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn factory(&self) -> &ResourceFactory {
        &self.factory
    }

    /// Execute a request and parse the response envelope.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or the parser's `Api`/`MalformedResponse` error.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: &Request) -> Result<Envelope> {
        let raw = self.transport.execute(request).await?;
        response::parse(request, raw)
    }

    /// Execute a request whose `data` is a single object and decode it.
    pub(crate) async fn fetch_one<T: Decode>(&self, request: &Request) -> Result<T> {
        let object = self.execute(request).await?.into_one(request)?;
        T::decode(&self.factory, object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = AsanaClient::new("test-token", DEFAULT_BASE_URL).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("AsanaClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            AsanaClient::new("token", "not a url"),
            Err(AsanaError::UrlError(_))
        ));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::default()
            .base_url("http://localhost:8080")
            .per_page(50)
            .type_mode(TypeMode::Strict);
        let client = AsanaClient::new("token", "http://localhost:8080")
            .unwrap();
        assert_eq!(client.per_page(), DEFAULT_PER_PAGE);

        let client = AsanaClient::with_config("token", config).unwrap();
        assert_eq!(client.per_page(), 50);
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.factory().mode(), TypeMode::Strict);
    }
}
