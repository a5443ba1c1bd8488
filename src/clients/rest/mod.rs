//! REST API client.
//!
//! This module provides the [`RestClient`], the entry point of the crate.
//! It owns the [`ClientConfig`](crate::ClientConfig) and the
//! [`HttpClient`](crate::clients::HttpClient), and produces
//! [`Endpoint`](crate::rest::Endpoint)s by name.
//!
//! # Example
//!
//! ```rust,ignore
//! use generic_client::RestClient;
//! use serde_json::json;
//!
//! let client = RestClient::from_url("https://api.example.com/v1")?;
//!
//! for user in client.endpoint("users").all().await?.iter() {
//!     println!("{user}");
//! }
//! ```

mod client;

pub use client::RestClient;
