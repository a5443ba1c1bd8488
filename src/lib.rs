//! # Generic REST Client
//!
//! A schema-less client for arbitrary REST APIs. Given only a base URL, it
//! addresses server collections ("endpoints") and individual records
//! ("resources") without hand-written model types.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the base URL and credentials
//! - Name-driven endpoints with `filter`, `all`, `get`, `create`,
//!   `get_or_create`, `create_or_update` and `delete`
//! - Records whose fields are exactly the server payload, with `save`
//!   (PUT, falling back to PATCH) and `delete`
//! - Primary-key inference across `id`, `uuid`, `pk`, `slug` and `username`
//! - Pluggable auto-pagination ([`LinkHeader`], [`PageEnvelope`])
//! - Custom detail and list calls via [`Route`] and [`Action`]
//!
//! ## Quick Start
//!
//! ```rust
//! use generic_client::{BaseUrl, ClientConfig, Credentials, LinkHeader, RestClient};
//!
//! // Create configuration using the builder pattern
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
//!     .credentials(Credentials::basic("myusername", "password"))
//!     .autopaginate(LinkHeader)
//!     .build()
//!     .unwrap();
//!
//! let client = RestClient::new(config).unwrap();
//! let users = client.endpoint("users");
//! assert_eq!(users.url(), "https://api.example.com/v1/users");
//! ```
//!
//! ## Working with Records
//!
//! ```rust,ignore
//! use generic_client::RestClient;
//! use serde_json::json;
//!
//! let client = RestClient::from_url("https://api.example.com/v1")?;
//! let users = client.endpoint("users");
//!
//! // Detail GET, because `id` is a primary key
//! let mut user = users.get(&json!({"id": 1})).await?;
//! println!("{user}"); // <Resource `users` id: 1>
//!
//! // Field access goes straight to the payload
//! user.set("username", "renamed")?;
//! user.save().await?;
//!
//! // Filtered list GET: `group__in=admin&group__in=staff`
//! let staff = users.filter(&json!({"group__in": ["admin", "staff"]})).await?;
//!
//! // Create or fetch
//! let created = users.create(&json!({"username": "user3"})).await?;
//! created.delete().await?;
//! ```
//!
//! ## Error Handling
//!
//! Construction fails with [`ConfigError`]; every network operation fails
//! with [`ResourceError`], which distinguishes "not found", "found several",
//! authentication failures, bad requests and other HTTP errors:
//!
//! ```rust,ignore
//! match users.get(&json!({"username": "nobody"})).await {
//!     Ok(user) => println!("{user}"),
//!     Err(e) if e.is_not_found() => println!("no such user"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: Clients and endpoints are `Send + Sync` and cheap to clone
//! - **Async-first**: One suspension point per HTTP round trip; no spawned tasks

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder, Credentials};
pub use error::ConfigError;

// Re-export the client and the resource layer
pub use clients::{HttpError, HttpMethod, HttpResponse, RestClient};
pub use rest::{
    Action, Endpoint, LinkHeader, PageEnvelope, PaginationStrategy, PrimaryKey, Resource,
    ResourceError, ResourceResponse, Route,
};
