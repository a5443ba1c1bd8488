//! Error taxonomy for endpoint and resource operations.
//!
//! Every non-2xx status that an operation does not explicitly treat as
//! success is translated into one of the [`ResourceError`] variants:
//!
//! - **400**: [`ResourceError::BadRequest`] - a specialization of `Http`, and
//!   the trigger for the PUT to PATCH fallback in `save()`
//! - **401/403**: [`ResourceError::NotAuthenticated`]
//! - **404**: [`ResourceError::ResourceNotFound`]
//! - **Other**: [`ResourceError::Http`]
//!
//! # Example
//!
//! ```rust,ignore
//! use generic_client::rest::ResourceError;
//!
//! match client.endpoint("users").get(&json!({"group": "watchers"})).await {
//!     Ok(user) => println!("Found: {user}"),
//!     Err(ResourceError::ResourceNotFound { .. }) => println!("no such user"),
//!     Err(ResourceError::MultipleResourcesFound { count, .. }) => {
//!         println!("{count} users matched");
//!     }
//!     Err(e) if e.is_http_error() => println!("HTTP {:?}", e.status()),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::clients::{HttpError, HttpMethod, HttpResponse};

/// Diagnostic snapshot of a rejected HTTP exchange.
///
/// Carries what a caller needs to render an error without holding on to the
/// transport response.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    /// The method of the rejected request.
    pub method: HttpMethod,
    /// The URL of the rejected request.
    pub url: String,
    /// The HTTP status code.
    pub code: u16,
    /// The raw response text.
    pub text: String,
    /// The decoded response body, if it was JSON.
    pub body: Option<Value>,
    /// The request ID for debugging (from X-Request-Id header).
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Captures the diagnostic fields of a response.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>, response: &HttpResponse) -> Self {
        Self {
            method,
            url: url.into(),
            code: response.code,
            text: response.text.clone(),
            body: response.body().cloned(),
            request_id: response.request_id().map(ToString::to_string),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} returned {}",
            self.method.to_string().to_uppercase(),
            self.url,
            self.code
        )?;
        if !self.text.is_empty() {
            write!(f, ": {}", self.text)?;
        }
        Ok(())
    }
}

/// Error type for endpoint, resource and route operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A lookup matched nothing: a detail request returned 404, or a
    /// filtered lookup returned zero records.
    #[error("Cannot find `{endpoint}` resource matching {lookup}")]
    ResourceNotFound {
        /// The endpoint name.
        endpoint: String,
        /// The lookup that matched nothing (a URL or query description).
        lookup: String,
        /// The 404 response, when there was one.
        response: Option<Box<ErrorResponse>>,
    },

    /// A filtered lookup expected one record and got several.
    #[error("Found {count} `{endpoint}` resources matching {lookup}, expected exactly one")]
    MultipleResourcesFound {
        /// The endpoint name.
        endpoint: String,
        /// The lookup that was too broad.
        lookup: String,
        /// How many records matched.
        count: usize,
    },

    /// An operation needed an identifier and none of the recognized fields
    /// was present.
    #[error("No primary key for `{endpoint}` resource, expected one of: {}", .fields.join(", "))]
    UnknownPrimaryKey {
        /// The endpoint name.
        endpoint: String,
        /// The recognized identifier fields, in precedence order.
        fields: Vec<String>,
    },

    /// HTTP 401 or 403.
    #[error("{message}")]
    NotAuthenticated {
        /// Names the configured user, if any.
        message: String,
        /// The rejected exchange.
        response: Box<ErrorResponse>,
    },

    /// HTTP 400.
    #[error("Bad request: {0}")]
    BadRequest(Box<ErrorResponse>),

    /// Any other status the operation does not accept.
    #[error("HTTP error: {0}")]
    Http(Box<ErrorResponse>),

    /// A non-empty JSON body failed to parse, or did not have the expected
    /// shape.
    #[error("Invalid response body (HTTP {code}): {reason}")]
    InvalidResponseBody {
        /// The HTTP status code.
        code: u16,
        /// The raw response text.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Two resources share a primary key but differ in payload.
    #[error("Resources of `{endpoint}` share primary key {primary_key} but have different payloads")]
    AmbiguousComparison {
        /// The endpoint name.
        endpoint: String,
        /// The shared key, as `name=value`.
        primary_key: String,
    },

    /// A payload field collides with a reserved resource operation name.
    #[error("Field name `{name}` is reserved for a resource operation")]
    ReservedFieldName {
        /// The colliding field name.
        name: String,
    },

    /// Lookup, filter or body arguments could not be used.
    #[error("Invalid parameters: {reason}")]
    InvalidParameters {
        /// What was wrong with them.
        reason: String,
    },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] HttpError),
}

impl ResourceError {
    /// Translates a non-2xx response into the error taxonomy.
    ///
    /// `username` is the configured user, used to phrase authentication
    /// failures.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use generic_client::clients::{HttpMethod, HttpResponse};
    /// use generic_client::rest::ResourceError;
    ///
    /// let response = HttpResponse::new(404, HashMap::new(), String::new());
    /// let error = ResourceError::from_http_response(
    ///     HttpMethod::Get,
    ///     "http://dummy.org/users/9999",
    ///     &response,
    ///     "users",
    ///     None,
    /// );
    /// assert!(error.is_not_found());
    /// ```
    #[must_use]
    pub fn from_http_response(
        method: HttpMethod,
        url: &str,
        response: &HttpResponse,
        endpoint: &str,
        username: Option<&str>,
    ) -> Self {
        let snapshot = Box::new(ErrorResponse::new(method, url, response));
        match response.code {
            400 => Self::BadRequest(snapshot),
            401 | 403 => Self::NotAuthenticated {
                message: username.map_or_else(
                    || "Not authenticated on the API".to_string(),
                    |user| format!("Cannot authenticate user `{user}` on the API"),
                ),
                response: snapshot,
            },
            404 => Self::ResourceNotFound {
                endpoint: endpoint.to_string(),
                lookup: url.to_string(),
                response: Some(snapshot),
            },
            _ => Self::Http(snapshot),
        }
    }

    /// Wraps an unexpected status (a 2xx the operation does not accept).
    #[must_use]
    pub fn unexpected_status(method: HttpMethod, url: &str, response: &HttpResponse) -> Self {
        Self::Http(Box::new(ErrorResponse::new(method, url, response)))
    }

    /// Returns `true` for [`ResourceError::ResourceNotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Returns `true` for [`ResourceError::BadRequest`].
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Returns `true` for `Http` and its `BadRequest` specialization.
    #[must_use]
    pub const fn is_http_error(&self) -> bool {
        matches!(self, Self::Http(_) | Self::BadRequest(_))
    }

    /// Returns the rejected exchange, when the error came from a response.
    #[must_use]
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::BadRequest(response)
            | Self::Http(response)
            | Self::NotAuthenticated { response, .. } => Some(response),
            Self::ResourceNotFound { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponseBody { code, .. } => Some(*code),
            _ => self.response().map(|r| r.code),
        }
    }

    /// Returns the request ID if available.
    ///
    /// Useful for debugging and error reporting.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.response().and_then(|r| r.request_id.as_deref())
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
    assert_send_sync::<ErrorResponse>();
};
