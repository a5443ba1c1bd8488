//! The schema-less resource layer.
//!
//! This module lets a caller address arbitrary server collections without
//! writing a model type per resource:
//!
//! - **[`Endpoint`]**: a named collection at `<base>/<name>` with `filter`,
//!   `all`, `get`, `create`, `get_or_create`, `create_or_update` and `delete`
//! - **[`Resource`]**: one record, a mutable JSON object plus `save`, `delete`
//!   and `primary_key`
//! - **[`Route`] / [`Action`]**: custom calls such as `POST /users/2/notify`
//! - **[`PaginationStrategy`]**: pluggable "next page" discovery, with
//!   [`LinkHeader`] and [`PageEnvelope`] built in
//! - **[`ResourceResponse<T>`]**: a Deref-based wrapper keeping the response
//!   metadata next to the records
//! - **[`ResourceError`]**: the error taxonomy for everything above
//!
//! # Example
//!
//! ```rust,ignore
//! use generic_client::{BaseUrl, ClientConfig, LinkHeader, RestClient};
//! use serde_json::json;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("http://dummy.org")?)
//!     .autopaginate(LinkHeader)
//!     .build()?;
//! let client = RestClient::new(config)?;
//! let users = client.endpoint("users");
//!
//! // Every page, flattened
//! let everyone = users.all().await?;
//! println!("{} users", everyone.len());
//!
//! // Lookup by key is a detail GET, by anything else a filtered list GET
//! let mut user = users.get(&json!({"username": "user1"})).await?;
//! user.set("group", "admins")?;
//! user.save().await?;
//!
//! // Idempotent creation
//! let group = client
//!     .endpoint("groups")
//!     .get_or_create(&json!({"slug": "admins", "defaults": {"name": "Admins"}}))
//!     .await?;
//!
//! // Custom calls
//! users.detail(&json!({"id": 2}))?.action("notify").call(&json!({"text": "hi"})).await?;
//! ```

mod endpoint;
mod errors;
mod pagination;
mod path;
mod primary_key;
mod resource;
mod response;
mod routes;

pub use endpoint::Endpoint;
pub use errors::{ErrorResponse, ResourceError};
pub use pagination::{
    hydrate_records, LinkHeader, PageEnvelope, PaginationStrategy, Paginator, PaginatorState,
};
pub use path::{key_segment, urljoin};
pub use primary_key::{PrimaryKey, PrimaryKeyResolver, DEFAULT_PRIMARY_KEY_FIELDS};
pub use resource::{FieldValue, Resource, RESERVED_FIELD_NAMES};
pub use response::ResourceResponse;
pub use routes::{Action, Route};
