//! REST client implementation.
//!
//! This module provides the [`RestClient`] type, the single entry point of
//! the crate: it owns the configuration and the HTTP session and hands out
//! [`Endpoint`]s by name.

use std::sync::Arc;

use crate::clients::HttpClient;
use crate::config::{BaseUrl, ClientConfig};
use crate::error::ConfigError;
use crate::rest::Endpoint;

/// Client for an arbitrary REST API.
///
/// Cloning a `RestClient` is cheap: clones share the configuration and the
/// connection pool. The client holds no mutable state after construction.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use generic_client::{BaseUrl, ClientConfig, Credentials, RestClient};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("http://dummy.org:8000/api").unwrap())
///     .credentials(Credentials::basic("user", "secret"))
///     .trailing_slash(true)
///     .build()
///     .unwrap();
///
/// let client = RestClient::new(config).unwrap();
/// assert_eq!(client.host(), "dummy.org:8000");
///
/// let users = client.endpoint("users");
/// assert_eq!(users.url(), "http://dummy.org:8000/api/users/");
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,
    http_client: HttpClient,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if no HTTP client was injected
    /// and the default one cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http_client = HttpClient::new(&config)?;
        tracing::debug!(base_url = %config.base_url(), "REST client created");

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http_client,
            }),
        })
    }

    /// Creates a client with default settings for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use generic_client::RestClient;
    ///
    /// let client = RestClient::from_url("http://dummy.org").unwrap();
    /// assert_eq!(client.base_url().as_ref(), "http://dummy.org/");
    /// ```
    pub fn from_url(base_url: &str) -> Result<Self, ConfigError> {
        let config = ClientConfig::builder()
            .base_url(BaseUrl::new(base_url)?)
            .build()?;
        Self::new(config)
    }

    /// Returns an endpoint for the collection `name`.
    ///
    /// No request is made; two endpoints with the same name are equal.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> Endpoint {
        Endpoint::new(self.clone(), name)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the normalized base URL (always ending in `/`).
    #[must_use]
    pub fn base_url(&self) -> &BaseUrl {
        self.inner.config.base_url()
    }

    /// Returns the authority of the base URL (`host[:port]`).
    #[must_use]
    pub fn host(&self) -> &str {
        self.inner.config.base_url().host()
    }

    /// Returns `true` if generated URLs carry a trailing `/`.
    #[must_use]
    pub fn trailing_slash(&self) -> bool {
        self.inner.config.trailing_slash()
    }

    pub(crate) fn http_client(&self) -> &HttpClient {
        &self.inner.http_client
    }
}
