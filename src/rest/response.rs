//! Response wrapper for collection operations.
//!
//! This module provides [`ResourceResponse<T>`], which pairs decoded data with
//! the metadata of the response it came from: status code, request id and the
//! parsed `Link` relations. The wrapper implements `Deref` for ergonomic
//! access to the inner data.
//!
//! # Deref Pattern
//!
//! ```rust,ignore
//! let users = client.endpoint("users").all().await?;
//!
//! // Vec methods via Deref
//! for user in users.iter() {
//!     println!("{user}");
//! }
//! println!("Count: {}", users.len());
//!
//! // Response metadata
//! if let Some(next) = users.link("next") {
//!     println!("More at {}", next.url);
//! }
//! ```

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::clients::{HttpResponse, Link};
use crate::rest::ResourceError;

/// Returns the decoded body, turning a parse failure into
/// [`ResourceError::InvalidResponseBody`].
pub(crate) fn checked_body(response: &HttpResponse) -> Result<Option<&Value>, ResourceError> {
    match response.decode_error() {
        Some(reason) => Err(ResourceError::InvalidResponseBody {
            code: response.code,
            text: response.text.clone(),
            reason: reason.to_string(),
        }),
        None => Ok(response.body()),
    }
}

/// Decoded data plus the metadata of the response that carried it.
///
/// With auto-pagination the metadata is that of the last page fetched.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use generic_client::clients::Link;
/// use generic_client::rest::ResourceResponse;
///
/// let links = Link::parse_header(r#"<http://dummy.org/users?page=2>; rel="next""#);
/// let response = ResourceResponse::new(vec!["a", "b"], 200, links, Some("req-1".to_string()));
///
/// assert_eq!(response.len(), 2);
/// assert_eq!(response[0], "a");
/// assert!(response.has_next_page());
/// assert!(!response.has_prev_page());
/// assert_eq!(response.request_id(), Some("req-1"));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceResponse<T> {
    data: T,
    code: u16,
    links: HashMap<String, Link>,
    request_id: Option<String>,
}

impl<T> ResourceResponse<T> {
    /// Creates a new `ResourceResponse` with the given data and metadata.
    #[must_use]
    pub const fn new(
        data: T,
        code: u16,
        links: HashMap<String, Link>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            data,
            code,
            links,
            request_id,
        }
    }

    /// Wraps `data` with the metadata of `response`.
    #[must_use]
    pub fn from_http_response(data: T, response: &HttpResponse) -> Self {
        Self::new(
            data,
            response.code,
            response.links.clone(),
            response.request_id().map(ToString::to_string),
        )
    }

    /// Consumes the response and returns the inner data.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use generic_client::rest::ResourceResponse;
    ///
    /// let response = ResourceResponse::new(vec![1, 2, 3], 200, HashMap::new(), None);
    /// let data: Vec<i32> = response.into_inner();
    /// assert_eq!(data, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Returns a reference to the inner data.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Returns a mutable reference to the inner data.
    #[must_use]
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Returns all `Link` relations, keyed by relation name.
    #[must_use]
    pub const fn links(&self) -> &HashMap<String, Link> {
        &self.links
    }

    /// Returns the relation with the given name, if present.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }

    /// Returns `true` if the response links to a next page.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.links.contains_key("next")
    }

    /// Returns `true` if the response links to a previous page.
    #[must_use]
    pub fn has_prev_page(&self) -> bool {
        self.links.contains_key("previous") || self.links.contains_key("prev")
    }

    /// Returns the request ID, if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Transforms the inner data while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> ResourceResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ResourceResponse {
            data: f(self.data),
            code: self.code,
            links: self.links,
            request_id: self.request_id,
        }
    }
}

impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for ResourceResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
