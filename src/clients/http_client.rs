//! HTTP transport wrapper.
//!
//! This module provides the [`HttpClient`] type: the injected `reqwest`
//! session plus the default headers every request carries. It performs no
//! status classification and no retries.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ClientConfig;
use crate::error::ConfigError;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for sending requests to a REST API.
///
/// The client handles:
/// - Default headers: `Content-Type`, `Accept`, `User-Agent`, and
///   `Authorization` when credentials are configured
/// - Extra headers from [`ClientConfig`], which override the defaults
/// - Response header parsing into a lowercased multi-value map
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use generic_client::{BaseUrl, ClientConfig};
/// use generic_client::clients::HttpClient;
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("http://dummy.org").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config).unwrap();
/// assert_eq!(
///     client.default_headers().get("content-type").map(String::as_str),
///     Some("application/json")
/// );
/// ```
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers keyed by lowercased name.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// Uses the injected `reqwest::Client` when one is configured, otherwise
    /// builds one with rustls.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the `reqwest` client cannot
    /// be created.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = match config.http_client() {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .use_rustls_tls()
                .build()
                .map_err(|e| ConfigError::HttpClientBuild {
                    reason: e.to_string(),
                })?,
        };

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Generic REST Client v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert(
            "content-type".to_string(),
            DataType::Json.as_content_type().to_string(),
        );
        default_headers.insert("accept".to_string(), "application/json".to_string());
        default_headers.insert("user-agent".to_string(), user_agent);

        if let Some(credentials) = config.credentials() {
            default_headers.insert(
                "authorization".to_string(),
                credentials.authorization_header(),
            );
        }

        for (name, value) in config.headers() {
            default_headers.insert(name.to_ascii_lowercase(), value.clone());
        }

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers for this client, keyed by lowercased name.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends one HTTP request and returns whatever the server answered.
    ///
    /// Non-2xx responses are returned as `Ok`; callers classify the status.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The request never produced a response (`Network`), including
    ///   timeouts configured on the injected client
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let method = match request.http_method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "content-type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.to_ascii_lowercase(), value.clone());
            }
        }

        let mut req_builder = self.client.request(method, &request.url);
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let text = res.text().await?;

        Ok(HttpResponse::new(code, res_headers, text))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: HashMap<&str, &str> = self
            .default_headers
            .iter()
            .map(|(name, value)| {
                if name == "authorization" {
                    (name.as_str(), "*****")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpClient")
            .field("default_headers", &headers)
            .finish_non_exhaustive()
    }
}
