//! Configuration types for the generic REST client.
//!
//! This module provides the configuration used to construct a
//! [`RestClient`](crate::RestClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: A validated, normalized API base URL
//! - [`Credentials`]: Static basic-auth credentials with masked debug output
//!
//! # Example
//!
//! ```rust
//! use generic_client::{BaseUrl, ClientConfig, Credentials};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("http://dummy.org/api").unwrap())
//!     .credentials(Credentials::basic("myusername", "password"))
//!     .trailing_slash(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.trailing_slash());
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, Credentials};

use std::sync::Arc;

use crate::error::ConfigError;
use crate::rest::{PaginationStrategy, PrimaryKeyResolver};

/// Configuration for a [`RestClient`](crate::RestClient).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    credentials: Option<Credentials>,
    trailing_slash: bool,
    autopaginate: Option<Arc<dyn PaginationStrategy>>,
    primary_key: PrimaryKeyResolver,
    patch_fallback: bool,
    headers: Vec<(String, String)>,
    user_agent_prefix: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the credentials, if configured.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns whether generated URLs end with `/`.
    #[must_use]
    pub const fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Returns the auto-pagination strategy, if configured.
    #[must_use]
    pub fn autopaginate(&self) -> Option<&dyn PaginationStrategy> {
        self.autopaginate.as_deref()
    }

    /// Returns the primary-key resolver.
    #[must_use]
    pub const fn primary_key(&self) -> &PrimaryKeyResolver {
        &self.primary_key
    }

    /// Returns whether a rejected PUT is retried once as a PATCH.
    #[must_use]
    pub const fn patch_fallback(&self) -> bool {
        self.patch_fallback
    }

    /// Returns the extra default headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the injected `reqwest` client, if any.
    #[must_use]
    pub const fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is the only required field.
///
/// # Defaults
///
/// - `credentials`: `None`
/// - `trailing_slash`: `false`
/// - `autopaginate`: `None`
/// - `primary_key_fields`: `id`, `uuid`, `pk`, `slug`, `username`
/// - `patch_fallback`: `true`
/// - `user_agent_prefix`: `None`
/// - `http_client`: a fresh `reqwest::Client` using rustls
///
/// # Example
///
/// ```rust
/// use generic_client::{BaseUrl, ClientConfig, LinkHeader};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com").unwrap())
///     .autopaginate(LinkHeader)
///     .primary_key_fields(["uuid", "id"])
///     .patch_fallback(false)
///     .header("X-Tenant", "acme")
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert!(config.autopaginate().is_some());
/// assert_eq!(config.primary_key().fields(), ["uuid", "id"]);
/// ```
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    credentials: Option<Credentials>,
    trailing_slash: Option<bool>,
    autopaginate: Option<Arc<dyn PaginationStrategy>>,
    primary_key: Option<PrimaryKeyResolver>,
    patch_fallback: Option<bool>,
    headers: Vec<(String, String)>,
    user_agent_prefix: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets basic-auth credentials sent with every request.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets whether every generated collection and detail URL ends with `/`.
    #[must_use]
    pub const fn trailing_slash(mut self, trailing_slash: bool) -> Self {
        self.trailing_slash = Some(trailing_slash);
        self
    }

    /// Enables auto-pagination with the given strategy.
    #[must_use]
    pub fn autopaginate(mut self, strategy: impl PaginationStrategy + 'static) -> Self {
        self.autopaginate = Some(Arc::new(strategy));
        self
    }

    /// Overrides the primary-key precedence.
    #[must_use]
    pub fn primary_key_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(PrimaryKeyResolver::new(fields));
        self
    }

    /// Sets whether `save()` retries a 400-rejected PUT as a PATCH.
    #[must_use]
    pub const fn patch_fallback(mut self, enabled: bool) -> Self {
        self.patch_fallback = Some(enabled);
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Later values for the same name replace earlier ones, including the
    /// built-in defaults.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Injects a preconfigured `reqwest` client.
    ///
    /// Timeouts, proxies, TLS settings and connection pooling are configured
    /// on this client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set,
    /// or [`ConfigError::InvalidHeader`] if a header name or value cannot be
    /// sent over HTTP.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        for (name, value) in &self.headers {
            let valid_name = !name.is_empty()
                && name
                    .bytes()
                    .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b));
            let valid_value = value.bytes().all(|b| b == b'\t' || (b' '..=b'~').contains(&b));
            if !valid_name || !valid_value {
                return Err(ConfigError::InvalidHeader { name: name.clone() });
            }
        }

        Ok(ClientConfig {
            base_url,
            credentials: self.credentials,
            trailing_slash: self.trailing_slash.unwrap_or(false),
            autopaginate: self.autopaginate,
            primary_key: self.primary_key.unwrap_or_default(),
            patch_fallback: self.patch_fallback.unwrap_or(true),
            headers: self.headers,
            user_agent_prefix: self.user_agent_prefix,
            http_client: self.http_client,
        })
    }
}
