//! HTTP transport layer.
//!
//! This module wraps the injected HTTP session. The core never talks to
//! `reqwest` directly: every call goes through [`HttpClient::send`] with an
//! [`HttpRequest`] and comes back as an [`HttpResponse`] envelope.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async HTTP client carrying the default headers
//! - [`HttpRequest`]: a request to be sent (absolute URL, query, JSON body)
//! - [`HttpResponse`]: status code, headers, decoded body and `Link` relations
//! - [`HttpMethod`]: GET, POST, PUT, PATCH, DELETE
//! - [`DataType`]: content types for request bodies
//! - [`RestClient`]: the entry point of the crate
//!
//! # Example
//!
//! ```rust,ignore
//! use generic_client::clients::{HttpClient, HttpMethod, HttpRequest};
//! use generic_client::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("http://dummy.org")?)
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "http://dummy.org/users")
//!     .query_param("group", "admin")
//!     .build()?;
//!
//! let response = client.send(request).await?;
//! println!("{} {:?}", response.code, response.body());
//! ```

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, Link};

pub use rest::RestClient;
