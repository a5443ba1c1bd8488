//! Configuration error types for the generic REST client.
//!
//! This module contains the error returned while building a
//! [`ClientConfig`](crate::ClientConfig) or constructing a
//! [`RestClient`](crate::RestClient).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Errors raised while talking to a server live in
//! [`ResourceError`](crate::rest::ResourceError) instead.
//!
//! # Example
//!
//! ```rust
//! use generic_client::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://api.example.com/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A default header name or value cannot be sent over HTTP.
    #[error("Invalid header '{name}'. Header names and values must be visible ASCII.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClientBuild {
        /// Why the client builder failed.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "dummy".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("dummy"));
        assert!(message.contains("absolute URL"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "base_url" };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::InvalidHeader {
            name: "X-Bad".to_string(),
        };
        let _: &dyn std::error::Error = &error;
    }
}
