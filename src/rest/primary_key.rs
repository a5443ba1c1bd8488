//! Primary-key inference across heterogeneous identifier schemes.
//!
//! APIs disagree on what identifies a record. The resolver scans a payload
//! for the first recognized identifier field, in precedence order. The
//! default precedence is `id`, `uuid`, `pk`, `slug`, `username`.

use std::fmt;

use serde_json::{Map, Value};

use crate::rest::ResourceError;

/// Identifier fields recognized when no custom precedence is configured.
pub const DEFAULT_PRIMARY_KEY_FIELDS: [&str; 5] = ["id", "uuid", "pk", "slug", "username"];

/// A resolved identifier: the field name and its value.
///
/// Displays as the bare value (strings unquoted), which is how it appears in
/// a detail URL.
///
/// # Example
///
/// ```rust
/// use generic_client::rest::PrimaryKey;
/// use serde_json::json;
///
/// let pk = PrimaryKey::new("slug", json!("hello-world"));
/// assert_eq!(pk.to_string(), "hello-world");
/// assert_eq!(PrimaryKey::new("id", json!(42)).to_string(), "42");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PrimaryKey {
    name: String,
    value: Value,
}

impl PrimaryKey {
    /// Creates a primary key from a field name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Returns the identifier field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identifier value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Finds the identifier of a payload.
///
/// # Example
///
/// ```rust
/// use generic_client::rest::PrimaryKeyResolver;
/// use serde_json::json;
///
/// let resolver = PrimaryKeyResolver::default();
/// let fields = json!({"id": 1, "username": "a"});
/// let pk = resolver.resolve(fields.as_object().unwrap()).unwrap();
/// assert_eq!((pk.name(), pk.value()), ("id", &json!(1)));
///
/// let empty = json!({});
/// assert!(resolver.resolve(empty.as_object().unwrap()).is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimaryKeyResolver {
    fields: Vec<String>,
}

impl PrimaryKeyResolver {
    /// Creates a resolver with a custom precedence.
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the recognized fields in precedence order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the first recognized identifier present in `fields`.
    ///
    /// A `null` value counts as absent.
    #[must_use]
    pub fn resolve(&self, fields: &Map<String, Value>) -> Option<PrimaryKey> {
        self.fields.iter().find_map(|name| match fields.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(PrimaryKey::new(name.clone(), value.clone())),
        })
    }

    /// Like [`resolve`](Self::resolve), but a missing identifier is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownPrimaryKey`] naming `endpoint` when no
    /// recognized identifier is present.
    pub fn require(
        &self,
        fields: &Map<String, Value>,
        endpoint: &str,
    ) -> Result<PrimaryKey, ResourceError> {
        self.resolve(fields)
            .ok_or_else(|| ResourceError::UnknownPrimaryKey {
                endpoint: endpoint.to_string(),
                fields: self.fields.clone(),
            })
    }
}

impl Default for PrimaryKeyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_KEY_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_resolve_prefers_id_over_username() {
        let pk = PrimaryKeyResolver::default()
            .resolve(&object(json!({"id": 1, "username": "a"})))
            .unwrap();
        assert_eq!(pk.name(), "id");
        assert_eq!(pk.value(), &json!(1));
    }

    #[test]
    fn test_resolve_slug() {
        let pk = PrimaryKeyResolver::default()
            .resolve(&object(json!({"slug": "a", "title": "A"})))
            .unwrap();
        assert_eq!(pk, PrimaryKey::new("slug", json!("a")));
    }

    #[test]
    fn test_resolve_follows_precedence() {
        let resolver = PrimaryKeyResolver::default();
        let pk = resolver
            .resolve(&object(json!({"username": "u", "pk": 7, "uuid": "abc"})))
            .unwrap();
        assert_eq!(pk.name(), "uuid");
    }

    #[test]
    fn test_resolve_unknown_for_empty_payload() {
        assert!(PrimaryKeyResolver::default()
            .resolve(&Map::new())
            .is_none());
    }

    #[test]
    fn test_null_identifier_counts_as_absent() {
        let pk = PrimaryKeyResolver::default()
            .resolve(&object(json!({"id": null, "slug": "s"})))
            .unwrap();
        assert_eq!(pk.name(), "slug");
    }

    #[test]
    fn test_custom_precedence() {
        let resolver = PrimaryKeyResolver::new(["username", "id"]);
        let pk = resolver
            .resolve(&object(json!({"id": 1, "username": "a"})))
            .unwrap();
        assert_eq!(pk.name(), "username");
        assert!(resolver.resolve(&object(json!({"slug": "x"}))).is_none());
    }

    #[test]
    fn test_require_reports_unknown_primary_key() {
        let result = PrimaryKeyResolver::default().require(&object(json!({"name": "x"})), "users");
        assert!(matches!(
            result,
            Err(ResourceError::UnknownPrimaryKey { endpoint, fields })
                if endpoint == "users" && fields.len() == 5
        ));
    }

    #[test]
    fn test_display_renders_bare_value() {
        assert_eq!(PrimaryKey::new("uuid", json!("a-b-c")).to_string(), "a-b-c");
        assert_eq!(PrimaryKey::new("id", json!(9999)).to_string(), "9999");
    }
}
