//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// A validated API base URL.
///
/// The URL must be absolute (`scheme://host[:port][/path]`) and must not carry
/// a query string or fragment. It is normalized to end with exactly one `/`
/// so endpoint names can be joined onto it directly.
///
/// # Example
///
/// ```rust
/// use generic_client::BaseUrl;
///
/// let url = BaseUrl::new("http://dummy.org:8000/api").unwrap();
/// assert_eq!(url.as_ref(), "http://dummy.org:8000/api/");
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.host(), "dummy.org:8000");
/// assert_eq!(url.host_name(), "dummy.org");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme, no
    /// host, or carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim();
        let invalid = || ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
        };

        let scheme_end = trimmed.find("://").ok_or_else(invalid)?;
        let scheme = &trimmed[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        if trimmed.contains(['?', '#']) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &trimmed[host_start..];
        let host_end = remainder.find('/').map_or(trimmed.len(), |i| host_start + i);
        if host_end == host_start || remainder.contains(char::is_whitespace) {
            return Err(invalid());
        }

        let normalized = format!("{}/", trimmed.trim_end_matches('/'));

        Ok(Self {
            url: normalized,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the authority of the URL, including the port if one was given.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Returns the host name without any port.
    #[must_use]
    pub fn host_name(&self) -> &str {
        let host = self.host();
        if host.starts_with('[') {
            // IPv6 literal, keep the brackets
            return host.find(']').map_or(host, |i| &host[..=i]);
        }
        host.split(':').next().unwrap_or(host)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Static HTTP basic-auth credentials attached to every request.
///
/// # Security
///
/// The `Debug` implementation masks the password.
///
/// # Example
///
/// ```rust
/// use generic_client::Credentials;
///
/// let credentials = Credentials::basic("myusername", "password");
/// assert_eq!(credentials.username(), "myusername");
/// assert_eq!(
///     format!("{:?}", credentials),
///     r#"Credentials { username: "myusername", password: "*****" }"#
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates basic-auth credentials.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"*****")
            .finish()
    }
}

// Verify newtypes are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BaseUrl>();
    assert_send_sync::<Credentials>();
};
