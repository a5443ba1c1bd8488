//! Schema-less records.
//!
//! A [`Resource`] is one record of an [`Endpoint`]: a mutable JSON object
//! whose fields are exactly what the server sent, plus the operations
//! `save`, `delete` and `primary_key`. Those operation names are reserved and
//! can never be payload fields, so field access and operations never shadow
//! each other.
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
//! let mut user = users.get(&json!({"id": 1})).await?;
//! user.set("group", "watchers")?;
//! user.save().await?;
//!
//! // Foreign-key flattening: the group's primary key is stored
//! let group = client.endpoint("groups").get(&json!({"slug": "admins"})).await?;
//! user.set("group", &group)?;
//! assert_eq!(user.get("group"), Some(&json!("admins")));
//! ```

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::rest::{Endpoint, PrimaryKey, ResourceError};

/// Names that belong to resource operations and cannot be payload fields.
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["save", "delete", "primary_key"];

/// A value assigned to a resource field.
///
/// Assigning a [`Resource`] stores its primary key (foreign-key
/// flattening), or its whole payload when it has no key.
#[derive(Clone, Debug)]
pub enum FieldValue {
    /// A plain JSON value, stored as-is.
    Json(Value),
    /// A related record, stored by key.
    Related(Box<Resource>),
}

macro_rules! impl_field_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Json(Value::from(value))
                }
            }
        )*
    };
}

impl_field_value_from!(Value, &str, String, bool, i32, i64, u32, u64, f64);

impl From<Resource> for FieldValue {
    fn from(resource: Resource) -> Self {
        Self::Related(Box::new(resource))
    }
}

impl From<&Resource> for FieldValue {
    fn from(resource: &Resource) -> Self {
        Self::Related(Box::new(resource.clone()))
    }
}

/// One record of an endpoint.
#[derive(Clone, Debug)]
pub struct Resource {
    endpoint: Endpoint,
    payload: Map<String, Value>,
}

impl Resource {
    /// Wraps a payload as a record of `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ReservedFieldName`] if the payload contains a
    /// field named after a resource operation.
    pub fn new(endpoint: Endpoint, payload: Map<String, Value>) -> Result<Self, ResourceError> {
        check_reserved(&payload)?;
        Ok(Self { endpoint, payload })
    }

    /// Returns the owning endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Sets a field value.
    ///
    /// Assigning another resource stores its primary key instead of the
    /// resource; a resource without a key is stored as its payload object.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ReservedFieldName`] for `save`, `delete` or
    /// `primary_key`.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self, ResourceError> {
        if RESERVED_FIELD_NAMES.contains(&name) {
            return Err(ResourceError::ReservedFieldName {
                name: name.to_string(),
            });
        }

        let value = match value.into() {
            FieldValue::Json(value) => value,
            FieldValue::Related(related) => related.primary_key().map_or_else(
                || Value::Object(related.payload.clone()),
                |pk| pk.value().clone(),
            ),
        };
        self.payload.insert(name.to_string(), value);
        Ok(self)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.payload.remove(name)
    }

    /// Returns the whole payload.
    #[must_use]
    pub const fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Consumes the resource and returns its payload.
    #[must_use]
    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }

    /// Returns the resolved identifier, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<PrimaryKey> {
        self.endpoint.primary_key_resolver().resolve(&self.payload)
    }

    /// Returns `true` if a recognized identifier is present.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.primary_key().is_some()
    }

    /// Writes the record to the server.
    ///
    /// With a primary key, the payload is PUT to the detail URL; if the
    /// server answers 400 and the PATCH fallback is enabled, the same payload
    /// is sent once more as a PATCH. Without a key, the payload is POSTed to
    /// the collection. On success the local payload is replaced by the
    /// server's representation (kept as-is if the server returned no body).
    ///
    /// # Errors
    ///
    /// Returns the status error of the final request, or
    /// [`ResourceError::InvalidResponseBody`] if the server's body is not a
    /// record.
    pub async fn save(&mut self) -> Result<&mut Self, ResourceError> {
        let body = Value::Object(self.payload.clone());

        let response = if let Some(pk) = self.primary_key() {
            let url = self.endpoint.detail_url(&pk);
            match self
                .endpoint
                .request(HttpMethod::Put, &url, &[], Some(&body))
                .await
            {
                Err(e) if e.is_bad_request() && self.endpoint.client().config().patch_fallback() => {
                    tracing::debug!(
                        endpoint = %self.endpoint.name(),
                        url = %url,
                        "PUT rejected with 400, retrying as PATCH"
                    );
                    self.endpoint
                        .request(HttpMethod::Patch, &url, &[], Some(&body))
                        .await?
                }
                other => other?,
            }
        } else {
            let url = self.endpoint.url().to_string();
            self.endpoint
                .request(HttpMethod::Post, &url, &[], Some(&body))
                .await?
        };

        if let Some(payload) = self.endpoint.written_payload(&response)? {
            check_reserved(&payload)?;
            self.payload = payload;
        }
        Ok(self)
    }

    /// Deletes the record on the server. The local payload is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownPrimaryKey`] if the record has no
    /// identifier, or the status error of the request.
    pub async fn delete(&self) -> Result<(), ResourceError> {
        let pk = self
            .endpoint
            .primary_key_resolver()
            .require(&self.payload, self.endpoint.name())?;
        let url = self.endpoint.detail_url(&pk);
        self.endpoint
            .request(HttpMethod::Delete, &url, &[], None)
            .await?;
        Ok(())
    }

    /// Compares two records.
    ///
    /// Records are equal when their payloads are equal. Two records of the
    /// same endpoint with different payloads but the same primary key are
    /// ambiguous: that is an error rather than "not equal".
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::AmbiguousComparison`] in the ambiguous case.
    pub fn try_eq(&self, other: &Self) -> Result<bool, ResourceError> {
        if self.payload == other.payload {
            return Ok(true);
        }
        if self.endpoint != other.endpoint {
            return Ok(false);
        }

        match (self.primary_key(), other.primary_key()) {
            (Some(left), Some(right)) if left == right => {
                Err(ResourceError::AmbiguousComparison {
                    endpoint: self.endpoint.name().to_string(),
                    primary_key: format!("{}={}", left.name(), left),
                })
            }
            _ => Ok(false),
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary_key() {
            Some(pk) => write!(
                f,
                "<Resource `{}` {}: {}>",
                self.endpoint.name(),
                pk.name(),
                pk
            ),
            None => write!(f, "<Resource `{}` (unsaved)>", self.endpoint.name()),
        }
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
    assert_send_sync::<FieldValue>();
};

fn check_reserved(payload: &Map<String, Value>) -> Result<(), ResourceError> {
    match RESERVED_FIELD_NAMES
        .iter()
        .find(|name| payload.contains_key(**name))
    {
        Some(name) => Err(ResourceError::ReservedFieldName {
            name: (*name).to_string(),
        }),
        None => Ok(()),
    }
}
