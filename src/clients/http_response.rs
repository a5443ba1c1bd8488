//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] Response Envelope: status code,
//! lowercased headers, the raw text, the decoded JSON body and the parsed
//! `Link` relations.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// One entry of a `Link` response header.
///
/// # Example
///
/// ```rust
/// use generic_client::clients::Link;
///
/// let links = Link::parse_header(
///     r#"<http://dummy.org/users?page=2>; rel="next", <http://dummy.org/users?page=0>; rel="previous""#,
/// );
/// assert_eq!(links["next"].url, "http://dummy.org/users?page=2");
/// assert_eq!(links["previous"].rel, "previous");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// Target URL of the relation.
    pub url: String,
    /// Relation name (`next`, `previous`, ...).
    pub rel: String,
}

impl Link {
    /// Parses a `Link` header value into a map keyed by relation name.
    ///
    /// The format is `<url>; rel="name", <url>; rel=name, ...`. Quotes around
    /// the relation are optional, parameters other than `rel` are ignored and
    /// a `rel` holding several space-separated names registers the link under
    /// each of them. Entries without a `rel` are skipped.
    #[must_use]
    pub fn parse_header(header_value: &str) -> HashMap<String, Self> {
        let mut links = HashMap::new();
        let mut rest = header_value;

        while let Some(start) = rest.find('<') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('>') else {
                break;
            };
            let url = after[..end].trim();
            let tail = &after[end + 1..];
            let params_end = tail.find('<').unwrap_or(tail.len());

            for param in tail[..params_end].split(';') {
                let param = param.trim().trim_end_matches(',').trim();
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if !key.trim().eq_ignore_ascii_case("rel") {
                    continue;
                }
                for rel in value.trim().trim_matches('"').split_whitespace() {
                    let rel = rel.to_ascii_lowercase();
                    links.insert(
                        rel.clone(),
                        Self {
                            url: url.to_string(),
                            rel,
                        },
                    );
                }
            }

            rest = &tail[params_end..];
        }

        links
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>; rel=\"{}\"", self.url, self.rel)
    }
}

/// A response received from the server.
///
/// The body is decoded once, on construction:
///
/// - an empty (or whitespace-only) body decodes to no value;
/// - a non-empty body whose `Content-Type` is present and not JSON is not
///   decoded, and the mismatch is recorded as a decode error;
/// - anything else is parsed as JSON, and a parse failure is recorded and
///   reported through [`decode_error`](Self::decode_error).
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercased name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response text.
    pub text: String,
    /// Relations parsed from every `Link` header.
    pub links: HashMap<String, Link>,
    body: Result<Option<Value>, String>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, decoding the body and parsing `Link`.
    ///
    /// `headers` keys must already be lowercased.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use generic_client::clients::HttpResponse;
    ///
    /// let response = HttpResponse::new(200, HashMap::new(), r#"{"id": 1}"#.to_string());
    /// assert!(response.is_ok());
    /// assert_eq!(response.body().unwrap()["id"], 1);
    ///
    /// let empty = HttpResponse::new(204, HashMap::new(), String::new());
    /// assert!(empty.body().is_none());
    /// assert!(empty.decode_error().is_none());
    /// ```
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, text: String) -> Self {
        let links = headers
            .get("link")
            .map(|values| Link::parse_header(&values.join(", ")))
            .unwrap_or_default();

        let content_type = headers
            .get("content-type")
            .and_then(|values| values.first())
            .filter(|value| !value.to_ascii_lowercase().contains("json"));

        let body = if text.trim().is_empty() {
            Ok(None)
        } else if let Some(content_type) = content_type {
            Err(format!("unexpected content type `{content_type}`"))
        } else {
            serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| e.to_string())
        };

        Self {
            code,
            headers,
            text,
            links,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the decoded body, if there is one and it parsed.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref().ok().and_then(Option::as_ref)
    }

    /// Consumes the response and returns the decoded body.
    #[must_use]
    pub fn into_body(self) -> Option<Value> {
        self.body.ok().flatten()
    }

    /// Returns why a non-empty body could not be decoded, if it could not.
    ///
    /// This covers malformed JSON and content declared as something other
    /// than JSON.
    #[must_use]
    pub fn decode_error(&self) -> Option<&str> {
        self.body.as_ref().err().map(String::as_str)
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    ///
    /// This ID is useful for debugging and should be included in error reports.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the relation with the given name, if present.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }
}

// Verify response types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpResponse>();
    assert_send_sync::<Link>();
};
