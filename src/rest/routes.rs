//! Custom, non-CRUD calls attached to an endpoint.
//!
//! A [`Route`] is either list-scoped (`POST /users/notify`) or detail-scoped
//! (`POST /users/2/notify`). Naming an [`Action`] on it fixes the URL; calling
//! the action issues exactly one request and returns the raw response.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let users = client.endpoint("users");
//!
//! let response = users
//!     .detail(&json!({"id": 2}))?
//!     .action("notify")
//!     .call(&json!({"message": "Hello"}))
//!     .await?;
//! assert_eq!(response.code, 200);
//!
//! let stats = users
//!     .detail(&json!({"id": 2, "_method": "get"}))?
//!     .action("stats")
//!     .send()
//!     .await?;
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{HttpMethod, HttpResponse};
use crate::rest::endpoint::{serialize_to_query, to_object};
use crate::rest::{key_segment, urljoin, Endpoint, PrimaryKey, ResourceError};

/// A namespace of actions, optionally bound to one record.
#[derive(Clone, Debug)]
pub struct Route {
    endpoint: Endpoint,
    pk: Option<PrimaryKey>,
    method: HttpMethod,
}

impl Route {
    pub(crate) const fn new(endpoint: Endpoint, pk: Option<PrimaryKey>) -> Self {
        Self {
            endpoint,
            pk,
            method: HttpMethod::Post,
        }
    }

    /// Sets the HTTP method used by this route's actions.
    #[must_use]
    pub const fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Returns the HTTP method used by this route's actions.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the record key for detail routes, `None` for list routes.
    #[must_use]
    pub const fn primary_key(&self) -> Option<&PrimaryKey> {
        self.pk.as_ref()
    }

    /// Returns the endpoint this route belongs to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Binds an action name. No request is made.
    #[must_use]
    pub fn action(&self, name: &str) -> Action {
        Action::new(self, name)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pk {
            Some(pk) => write!(
                f,
                "<Route on `{}` with lookup `{}`>",
                self.endpoint.url(),
                pk
            ),
            None => write!(f, "<Route on `{}`>", self.endpoint.url()),
        }
    }
}

/// A callable sub-resource: `<endpoint>/[pk/]<name>`.
#[derive(Clone, Debug)]
pub struct Action {
    endpoint: Endpoint,
    name: String,
    method: HttpMethod,
    pk: Option<PrimaryKey>,
    url: String,
}

impl Action {
    fn new(route: &Route, name: &str) -> Self {
        let trailing_slash = route.endpoint.client().trailing_slash();
        let url = match &route.pk {
            Some(pk) => urljoin(
                route.endpoint.url(),
                [key_segment(pk).as_str(), name],
                trailing_slash,
            ),
            None => urljoin(route.endpoint.url(), [name], trailing_slash),
        };

        Self {
            endpoint: route.endpoint.clone(),
            name: name.to_string(),
            method: route.method,
            pk: route.pk.clone(),
            url,
        }
    }

    /// Returns the action name, the last path segment of its URL.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the URL the action is sent to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the HTTP method the action is sent with.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the record key of a detail action, `None` for list actions.
    #[must_use]
    pub const fn primary_key(&self) -> Option<&PrimaryKey> {
        self.pk.as_ref()
    }

    /// Invokes the action with `params`.
    ///
    /// For methods that carry a body the parameters are sent as a JSON object
    /// (`{}` when empty); for GET and DELETE they are sent as the query
    /// string. The response is returned as-is: actions are not assumed to
    /// return records.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidParameters`] if `params` is not an
    /// object, or the status error of the request.
    pub async fn call<P>(&self, params: &P) -> Result<HttpResponse, ResourceError>
    where
        P: Serialize + ?Sized,
    {
        let params = to_object(params)?;

        if self.method.requires_body() {
            let body = Value::Object(params);
            self.endpoint
                .request(self.method, &self.url, &[], Some(&body))
                .await
        } else {
            let query = serialize_to_query(&params);
            self.endpoint
                .request(self.method, &self.url, &query, None)
                .await
        }
    }

    /// Invokes the action without parameters.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn send(&self) -> Result<HttpResponse, ResourceError> {
        self.call(&()).await
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Action `{}` on `{}`", self.name, self.url)?;
        if let Some(pk) = &self.pk {
            write!(f, " with lookup `{pk}`")?;
        }
        f.write_str(">")
    }
}

// Verify route types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Route>();
    assert_send_sync::<Action>();
};
