//! Named collections under the client's base URL.
//!
//! An [`Endpoint`] addresses `<base>/<name>` and owns the request/response
//! policy: every HTTP call made on behalf of an endpoint, its resources and
//! its routes passes through [`Endpoint::request`], which translates status
//! codes into [`ResourceError`] variants.
//!
//! # Example
//!
//! ```rust,ignore
//! use generic_client::RestClient;
//! use serde_json::json;
//!
//! let client = RestClient::from_url("http://dummy.org")?;
//! let users = client.endpoint("users");
//!
//! let admins = users.filter(&json!({"group__in": ["admin", "staff"]})).await?;
//! let user = users.get(&json!({"username": "user1"})).await?;
//! let created = users.create(&json!({"username": "user3"})).await?;
//! users.delete(created.primary_key().unwrap()).await?;
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::{DataType, HttpError, HttpMethod, HttpRequest, HttpResponse, RestClient};
use crate::rest::pagination::{hydrate_records, Paginator};
use crate::rest::response::checked_body;
use crate::rest::{
    key_segment, urljoin, PrimaryKeyResolver, Resource, ResourceError, ResourceResponse, Route,
};

/// A named collection of records.
///
/// Endpoints are cheap handles: constructing one performs no I/O, and two
/// endpoints with the same name on the same client behave identically.
#[derive(Clone)]
pub struct Endpoint {
    client: RestClient,
    name: String,
    url: String,
}

impl Endpoint {
    pub(crate) fn new(client: RestClient, name: &str) -> Self {
        let url = urljoin(client.base_url().as_ref(), [name], client.trailing_slash());
        Self {
            client,
            name: name.to_string(),
            url,
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the owning client.
    #[must_use]
    pub const fn client(&self) -> &RestClient {
        &self.client
    }

    /// Returns the URL of one record of this collection.
    ///
    /// The key is percent-encoded, so it always addresses a single segment.
    #[must_use]
    pub fn detail_url(&self, pk: impl fmt::Display) -> String {
        urljoin(&self.url, [key_segment(pk)], self.client.trailing_slash())
    }

    pub(crate) fn primary_key_resolver(&self) -> &PrimaryKeyResolver {
        self.client.config().primary_key()
    }

    /// Lists the collection, filtered by `params`.
    ///
    /// `params` must serialize to a JSON object (or `()` for none). Array
    /// values become repeated query keys. With auto-pagination configured,
    /// every page is fetched and the records are concatenated in page order;
    /// the returned metadata is that of the last page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidParameters`] if `params` is not an
    /// object, [`ResourceError::InvalidResponseBody`] if a page cannot be
    /// read, or the status error of any failed page request.
    pub async fn filter<P>(&self, params: &P) -> Result<ResourceResponse<Vec<Resource>>, ResourceError>
    where
        P: Serialize + ?Sized,
    {
        let query = serialize_to_query(&to_object(params)?);
        let (records, response) = self.collect_records(&query).await?;

        let resources = records
            .into_iter()
            .map(|record| self.hydrate(record, &response))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResourceResponse::from_http_response(resources, &response))
    }

    /// Lists the whole collection. Equivalent to `filter(&())`.
    ///
    /// # Errors
    ///
    /// See [`filter`](Self::filter).
    pub async fn all(&self) -> Result<ResourceResponse<Vec<Resource>>, ResourceError> {
        self.filter(&()).await
    }

    /// Fetches exactly one record.
    ///
    /// If `lookup` carries a recognized identifier, the detail URL for it is
    /// requested. Otherwise the collection is filtered by `lookup` and must
    /// yield exactly one record.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResourceNotFound`] on a 404 or an empty
    /// result, and [`ResourceError::MultipleResourcesFound`] when a filtered
    /// lookup matches more than one record.
    pub async fn get<P>(&self, lookup: &P) -> Result<Resource, ResourceError>
    where
        P: Serialize + ?Sized,
    {
        let lookup = to_object(lookup)?;

        if let Some(pk) = self.primary_key_resolver().resolve(&lookup) {
            let url = self.detail_url(&pk);
            let response = self.request(HttpMethod::Get, &url, &[], None).await?;
            let records = hydrate_records(&response)?;
            return self.single(records, &response, &url);
        }

        let query = serialize_to_query(&lookup);
        let (records, response) = self.collect_records(&query).await?;
        self.single(records, &response, &Value::Object(lookup).to_string())
    }

    /// Creates a record. Success is exactly HTTP 201.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for any other status, including other
    /// 2xx codes, and [`ResourceError::BadRequest`] for a 400.
    pub async fn create<P>(&self, payload: &P) -> Result<Resource, ResourceError>
    where
        P: Serialize + ?Sized,
    {
        let payload = to_object(payload)?;
        let body = Value::Object(payload.clone());
        let response = self
            .request(HttpMethod::Post, &self.url, &[], Some(&body))
            .await?;

        if response.code != 201 {
            return Err(ResourceError::unexpected_status(
                HttpMethod::Post,
                &self.url,
                &response,
            ));
        }

        let payload = self.written_payload(&response)?.unwrap_or(payload);
        Resource::new(self.clone(), payload)
    }

    /// Fetches the record matching `lookup`, creating it if none exists.
    ///
    /// A `defaults` object inside `lookup` is not used for the lookup; it is
    /// merged into the creation payload, winning over lookup fields.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MultipleResourcesFound`] if the lookup is
    /// ambiguous, or any error of [`get`](Self::get) other than not-found and
    /// of [`create`](Self::create).
    pub async fn get_or_create<P>(&self, lookup: &P) -> Result<Resource, ResourceError>
    where
        P: Serialize + ?Sized,
    {
        let mut lookup = to_object(lookup)?;
        let defaults = match lookup.remove("defaults") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(defaults)) => defaults,
            Some(_) => {
                return Err(ResourceError::InvalidParameters {
                    reason: "`defaults` must be an object".to_string(),
                })
            }
        };

        match self.get(&lookup).await {
            Err(e) if e.is_not_found() => {
                let mut payload = lookup;
                payload.extend(defaults);
                self.create(&payload).await
            }
            other => other,
        }
    }

    /// Saves `payload` as an update when it carries an identifier, or
    /// creates it otherwise.
    ///
    /// # Errors
    ///
    /// See [`Resource::save`] and [`create`](Self::create).
    pub async fn create_or_update<P>(&self, payload: &P) -> Result<Resource, ResourceError>
    where
        P: Serialize + ?Sized,
    {
        let payload = to_object(payload)?;
        if self.primary_key_resolver().resolve(&payload).is_none() {
            return self.create(&payload).await;
        }

        let mut resource = Resource::new(self.clone(), payload)?;
        resource.save().await?;
        Ok(resource)
    }

    /// Deletes the record with the given key. Success is exactly HTTP 204.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResourceNotFound`] on a 404 and
    /// [`ResourceError::Http`] for any other status.
    pub async fn delete(&self, pk: impl fmt::Display) -> Result<(), ResourceError> {
        let url = self.detail_url(pk);
        let response = self.request(HttpMethod::Delete, &url, &[], None).await?;
        if response.code != 204 {
            return Err(ResourceError::unexpected_status(
                HttpMethod::Delete,
                &url,
                &response,
            ));
        }
        Ok(())
    }

    /// Returns a route scoped to one record.
    ///
    /// A string `_method` entry in `lookup` selects the HTTP method of the
    /// route's actions (default POST).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownPrimaryKey`] if `lookup` carries no
    /// recognized identifier, and [`ResourceError::InvalidParameters`] for an
    /// unknown `_method`.
    pub fn detail<P>(&self, lookup: &P) -> Result<Route, ResourceError>
    where
        P: Serialize + ?Sized,
    {
        let mut lookup = to_object(lookup)?;
        let method = take_method(&mut lookup)?;
        let pk = self.primary_key_resolver().require(&lookup, &self.name)?;
        Ok(Route::new(self.clone(), Some(pk)).method(method))
    }

    /// Returns a route scoped to the whole collection.
    #[must_use]
    pub fn list(&self) -> Route {
        Route::new(self.clone(), None)
    }

    /// Sends one request and classifies its status.
    ///
    /// This is the only path from the core to the transport. 2xx responses
    /// are returned as-is; anything else becomes a [`ResourceError`]
    /// (400 `BadRequest`, 401/403 `NotAuthenticated`, 404 `ResourceNotFound`,
    /// otherwise `Http`).
    ///
    /// # Errors
    ///
    /// Returns the classified status error, or
    /// [`ResourceError::Transport`] if no response was received.
    pub async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<HttpResponse, ResourceError> {
        let mut builder = HttpRequest::builder(method, url).query(query.to_vec());
        if let Some(body) = body {
            builder = builder.body(body.clone()).body_type(DataType::Json);
        }
        let request = builder.build().map_err(HttpError::from)?;

        let response = self.client.http_client().send(request).await?;
        tracing::debug!(
            endpoint = %self.name,
            method = %method,
            url,
            status = response.code,
            "Request completed"
        );

        if response.is_ok() {
            return Ok(response);
        }

        let username = self
            .client
            .config()
            .credentials()
            .map(crate::config::Credentials::username);
        Err(ResourceError::from_http_response(
            method,
            url,
            &response,
            &self.name,
            username,
        ))
    }

    /// Reads the record a write returned: `None` for an empty body.
    pub(crate) fn written_payload(
        &self,
        response: &HttpResponse,
    ) -> Result<Option<Map<String, Value>>, ResourceError> {
        match checked_body(response)? {
            None => Ok(None),
            Some(Value::Object(payload)) => Ok(Some(payload.clone())),
            Some(_) => Err(not_a_record(response)),
        }
    }

    fn hydrate(&self, record: Value, response: &HttpResponse) -> Result<Resource, ResourceError> {
        match record {
            Value::Object(payload) => Resource::new(self.clone(), payload),
            _ => Err(not_a_record(response)),
        }
    }

    /// Requests the collection with `query` and reads its records, following
    /// next pages when auto-pagination is configured. Returns the records
    /// with the last page fetched.
    async fn collect_records(
        &self,
        query: &[(String, String)],
    ) -> Result<(Vec<Value>, HttpResponse), ResourceError> {
        let mut response = self.request(HttpMethod::Get, &self.url, query, None).await?;

        let Some(strategy) = self.client.config().autopaginate() else {
            let records = hydrate_records(&response)?;
            return Ok((records, response));
        };

        let mut paginator = Paginator::new(strategy);
        let mut url = self.url.clone();
        while let Some(next) = paginator.push_page(&url, &response)? {
            tracing::debug!(endpoint = %self.name, url = %next, "Following next page");
            response = self.request(HttpMethod::Get, &next, &[], None).await?;
            url = next;
        }
        Ok((paginator.into_records(), response))
    }

    fn single(
        &self,
        records: Vec<Value>,
        response: &HttpResponse,
        lookup: &str,
    ) -> Result<Resource, ResourceError> {
        let count = records.len();
        let mut records = records.into_iter();
        match records.next() {
            None => Err(ResourceError::ResourceNotFound {
                endpoint: self.name.clone(),
                lookup: lookup.to_string(),
                response: None,
            }),
            Some(record) if count == 1 => self.hydrate(record, response),
            Some(_) => Err(ResourceError::MultipleResourcesFound {
                endpoint: self.name.clone(),
                lookup: lookup.to_string(),
                count,
            }),
        }
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Endpoint {}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Endpoint `{}`>", self.url)
    }
}

// Verify Endpoint is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Endpoint>();
};

fn not_a_record(response: &HttpResponse) -> ResourceError {
    ResourceError::InvalidResponseBody {
        code: response.code,
        text: response.text.clone(),
        reason: "expected a JSON object".to_string(),
    }
}

/// Serializes call arguments into a JSON object. `()` and `None` give an
/// empty object.
pub(crate) fn to_object<P>(params: &P) -> Result<Map<String, Value>, ResourceError>
where
    P: Serialize + ?Sized,
{
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(ResourceError::InvalidParameters {
            reason: format!("expected a JSON object, got `{other}`"),
        }),
        Err(e) => Err(ResourceError::InvalidParameters {
            reason: e.to_string(),
        }),
    }
}

/// Removes a `_method` entry and parses it.
pub(crate) fn take_method(lookup: &mut Map<String, Value>) -> Result<HttpMethod, ResourceError> {
    match lookup.remove("_method") {
        None | Some(Value::Null) => Ok(HttpMethod::Post),
        Some(Value::String(method)) => {
            method
                .parse::<HttpMethod>()
                .map_err(|e| ResourceError::InvalidParameters {
                    reason: e.to_string(),
                })
        }
        Some(other) => Err(ResourceError::InvalidParameters {
            reason: format!("`_method` must be a string, got `{other}`"),
        }),
    }
}

/// Flattens an argument object into query pairs.
///
/// Nulls are skipped, arrays expand to one pair per element and nested
/// objects are sent as their JSON text.
pub(crate) fn serialize_to_query(params: &Map<String, Value>) -> Vec<(String, String)> {
    fn render(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        }
    }

    let mut query = Vec::new();
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(rendered) = render(item) {
                        query.push((key.clone(), rendered));
                    }
                }
            }
            other => {
                if let Some(rendered) = render(other) {
                    query.push((key.clone(), rendered));
                }
            }
        }
    }
    query
}
