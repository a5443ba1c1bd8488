//! Auto-pagination.
//!
//! A [`PaginationStrategy`] knows how to read the records of one page and
//! where the next page lives. The [`Paginator`] drives a strategy across
//! successive responses and concatenates records in fetch order.
//!
//! Two strategies ship with the crate:
//!
//! - [`LinkHeader`]: the body is a JSON array, the next page is the `next`
//!   relation of the `Link` header.
//! - [`PageEnvelope`]: the body is an object holding the records under one key
//!   (default `results`) and the next page URL under another (default `next`).

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;

use crate::clients::HttpResponse;
use crate::rest::response::checked_body;
use crate::rest::ResourceError;

/// Decides how pages are read and followed.
///
/// Implementations must be cheap to call; they are consulted once per page.
pub trait PaginationStrategy: Send + Sync + fmt::Debug {
    /// Extracts the records carried by one page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidResponseBody`] if the body does not
    /// have the shape this strategy expects.
    fn records(&self, response: &HttpResponse) -> Result<Vec<Value>, ResourceError>;

    /// Returns the URL of the following page, or `None` when done.
    fn next_url(&self, response: &HttpResponse) -> Option<String>;
}

/// Reads records from a bare body: an array is a list of records, an object
/// is one record and an empty body is no records.
///
/// # Errors
///
/// Returns [`ResourceError::InvalidResponseBody`] for a body that failed to
/// parse or is neither an array nor an object.
pub fn hydrate_records(response: &HttpResponse) -> Result<Vec<Value>, ResourceError> {
    match checked_body(response)? {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(record @ Value::Object(_)) => Ok(vec![record.clone()]),
        Some(_) => Err(ResourceError::InvalidResponseBody {
            code: response.code,
            text: response.text.clone(),
            reason: "expected a JSON array or object".to_string(),
        }),
    }
}

/// Follows the `next` relation of the `Link` header.
///
/// # Example
///
/// ```rust
/// use generic_client::{BaseUrl, ClientConfig, LinkHeader};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("http://dummy.org").unwrap())
///     .autopaginate(LinkHeader)
///     .build()
///     .unwrap();
/// assert!(config.autopaginate().is_some());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkHeader;

impl PaginationStrategy for LinkHeader {
    fn records(&self, response: &HttpResponse) -> Result<Vec<Value>, ResourceError> {
        hydrate_records(response)
    }

    fn next_url(&self, response: &HttpResponse) -> Option<String> {
        response.link("next").map(|link| link.url.clone())
    }
}

/// Reads pages shaped like `{"results": [...], "next": "<url>"}`.
///
/// A body that is a bare array is accepted as the last page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageEnvelope {
    records_key: String,
    next_key: String,
}

impl PageEnvelope {
    /// Creates an envelope strategy with custom keys.
    #[must_use]
    pub fn new(records_key: impl Into<String>, next_key: impl Into<String>) -> Self {
        Self {
            records_key: records_key.into(),
            next_key: next_key.into(),
        }
    }

    /// Returns the key holding the records.
    #[must_use]
    pub fn records_key(&self) -> &str {
        &self.records_key
    }

    /// Returns the key holding the next page URL.
    #[must_use]
    pub fn next_key(&self) -> &str {
        &self.next_key
    }
}

impl Default for PageEnvelope {
    fn default() -> Self {
        Self::new("results", "next")
    }
}

impl PaginationStrategy for PageEnvelope {
    fn records(&self, response: &HttpResponse) -> Result<Vec<Value>, ResourceError> {
        match checked_body(response)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(Value::Object(envelope)) => match envelope.get(&self.records_key) {
                Some(Value::Array(items)) => Ok(items.clone()),
                Some(Value::Null) | None => Ok(Vec::new()),
                Some(_) => Err(ResourceError::InvalidResponseBody {
                    code: response.code,
                    text: response.text.clone(),
                    reason: format!("`{}` is not an array", self.records_key),
                }),
            },
            Some(_) => Err(ResourceError::InvalidResponseBody {
                code: response.code,
                text: response.text.clone(),
                reason: "expected a page object".to_string(),
            }),
        }
    }

    fn next_url(&self, response: &HttpResponse) -> Option<String> {
        response
            .body()?
            .get(&self.next_key)?
            .as_str()
            .filter(|url| !url.is_empty())
            .map(ToString::to_string)
    }
}

/// Where a [`Paginator`] is in its walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaginatorState {
    /// No page consumed yet.
    Idle,
    /// A page was consumed and another one is due at `next`.
    FetchedPage {
        /// URL of the page to fetch next.
        next: String,
    },
    /// No more pages.
    Done,
}

/// Accumulates records across pages.
///
/// The caller fetches pages; the paginator decides whether another one is
/// due. Records are kept in fetch order and never deduplicated.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use generic_client::clients::HttpResponse;
/// use generic_client::rest::{LinkHeader, Paginator, PaginatorState};
///
/// let mut headers = HashMap::new();
/// headers.insert(
///     "link".to_string(),
///     vec![r#"<http://dummy.org/users?page=2>; rel="next""#.to_string()],
/// );
/// let first = HttpResponse::new(200, headers, r#"[{"id": 1}]"#.to_string());
///
/// let mut paginator = Paginator::new(&LinkHeader);
/// let next = paginator.push_page("http://dummy.org/users", &first).unwrap();
/// assert_eq!(next.as_deref(), Some("http://dummy.org/users?page=2"));
///
/// let last = HttpResponse::new(200, HashMap::new(), r#"[{"id": 2}]"#.to_string());
/// assert!(paginator.push_page("http://dummy.org/users?page=2", &last).unwrap().is_none());
/// assert_eq!(paginator.state(), &PaginatorState::Done);
/// assert_eq!(paginator.into_records().len(), 2);
/// ```
#[derive(Debug)]
pub struct Paginator<'a> {
    strategy: &'a dyn PaginationStrategy,
    state: PaginatorState,
    records: Vec<Value>,
    pages: usize,
    visited: HashSet<String>,
}

impl<'a> Paginator<'a> {
    /// Creates an idle paginator.
    #[must_use]
    pub fn new(strategy: &'a dyn PaginationStrategy) -> Self {
        Self {
            strategy,
            state: PaginatorState::Idle,
            records: Vec::new(),
            pages: 0,
            visited: HashSet::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &PaginatorState {
        &self.state
    }

    /// Returns how many pages were consumed.
    #[must_use]
    pub const fn pages(&self) -> usize {
        self.pages
    }

    /// Consumes the page fetched from `url` and returns the URL to fetch
    /// next, if any.
    ///
    /// A `next` URL that was already fetched, including `url` itself, ends
    /// the walk. Pushing a page after the walk is done is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the strategy's error if the page body cannot be read.
    pub fn push_page(
        &mut self,
        url: &str,
        response: &HttpResponse,
    ) -> Result<Option<String>, ResourceError> {
        if self.state == PaginatorState::Done {
            return Ok(None);
        }

        let records = self.strategy.records(response)?;
        self.records.extend(records);
        self.pages += 1;
        self.visited.insert(url.to_string());

        let next = match self.strategy.next_url(response) {
            Some(next) if self.visited.contains(&next) => {
                tracing::warn!(url, next = %next, "Pagination next link points at a page already fetched, stopping");
                None
            }
            other => other,
        };

        self.state = next
            .clone()
            .map_or(PaginatorState::Done, |next| PaginatorState::FetchedPage { next });
        Ok(next)
    }

    /// Returns the records collected so far.
    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Consumes the paginator and returns all records in fetch order.
    #[must_use]
    pub fn into_records(self) -> Vec<Value> {
        self.records
    }
}
