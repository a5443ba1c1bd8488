//! Integration tests for resource persistence.
//!
//! These tests verify `save` (PUT, the PATCH fallback and POST for unsaved
//! records), `delete`, and that the server's representation replaces the
//! local payload after a write.

use generic_client::{BaseUrl, ClientConfig, Endpoint, Resource, ResourceError, RestClient};
use serde_json::{json, Map, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates the `users` endpoint of a client pointed at the mock server
fn users(server: &MockServer, patch_fallback: bool) -> Endpoint {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .patch_fallback(patch_fallback)
        .build()
        .unwrap();
    RestClient::new(config).unwrap().endpoint("users")
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

// === Save ===

#[tokio::test]
async fn test_save_existing_record_puts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"id": 1, "username": "user1", "group": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "user1", "group": "admin", "updated": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut user = Resource::new(
        users(&server, true),
        object(json!({"id": 1, "username": "user1", "group": "watchers"})),
    )
    .unwrap();
    user.set("group", "admin").unwrap();

    assert_ok!(user.save().await);
    assert_eq!(user.get("updated"), Some(&json!(true)));
}

#[tokio::test]
async fn test_save_falls_back_to_patch_once() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "partial only"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/1"))
        .and(body_json(json!({"id": 1, "group": "admin"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "group": "admin", "username": "user1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut user = Resource::new(users(&server, true), object(json!({"id": 1, "group": "admin"}))).unwrap();

    assert_ok!(user.save().await);
    assert_eq!(user.get("username"), Some(&json!("user1")));
}

#[tokio::test]
async fn test_save_patch_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let mut user = Resource::new(users(&server, true), object(json!({"id": 1}))).unwrap();

    let error = assert_err!(user.save().await);
    assert!(error.is_bad_request());
    assert_eq!(error.response().unwrap().method.to_string(), "patch");
}

#[tokio::test]
async fn test_save_without_patch_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut user = Resource::new(users(&server, false), object(json!({"id": 1}))).unwrap();

    let error = assert_err!(user.save().await);
    assert!(error.is_bad_request());
}

#[tokio::test]
async fn test_save_unsaved_record_posts_to_collection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"username": "user7"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 7, "username": "user7"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut user = Resource::new(users(&server, true), object(json!({"username": "user7"}))).unwrap();
    assert!(!user.is_persisted());

    assert_ok!(user.save().await);
    assert!(user.is_persisted());
    assert_eq!(user.to_string(), "<Resource `users` id: 7>");
}

#[tokio::test]
async fn test_save_with_empty_body_keeps_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut user = Resource::new(users(&server, true), object(json!({"id": 1, "group": "admin"}))).unwrap();

    assert_ok!(user.save().await);
    assert_eq!(user.payload(), &object(json!({"id": 1, "group": "admin"})));
}

#[tokio::test]
async fn test_save_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut user = Resource::new(users(&server, true), object(json!({"id": 1}))).unwrap();

    let error = assert_err!(user.save().await);
    assert!(matches!(error, ResourceError::Http(_)));
}

#[tokio::test]
async fn test_save_rejects_reserved_field_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "save": true})))
        .mount(&server)
        .await;

    let mut user = Resource::new(users(&server, true), object(json!({"id": 1}))).unwrap();

    let error = assert_err!(user.save().await);
    assert!(matches!(error, ResourceError::ReservedFieldName { name } if name == "save"));
    assert_eq!(user.payload(), &object(json!({"id": 1})));
}

// === Delete ===

#[tokio::test]
async fn test_delete_uses_detail_url() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let user = Resource::new(users(&server, true), object(json!({"slug": "abc", "name": "A"}))).unwrap();

    assert_ok!(user.delete().await);
    assert_eq!(user.get("name"), Some(&json!("A")));
}

#[tokio::test]
async fn test_delete_accepts_any_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&server)
        .await;

    let user = Resource::new(users(&server, true), object(json!({"id": 1}))).unwrap();
    assert_ok!(user.delete().await);
}

#[tokio::test]
async fn test_delete_without_primary_key_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let user = Resource::new(users(&server, true), object(json!({"name": "draft"}))).unwrap();

    let error = assert_err!(user.delete().await);
    assert!(matches!(error, ResourceError::UnknownPrimaryKey { endpoint, .. } if endpoint == "users"));
}

#[tokio::test]
async fn test_delete_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/9999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let user = Resource::new(users(&server, true), object(json!({"id": 9999}))).unwrap();

    let error = assert_err!(user.delete().await);
    assert!(error.is_not_found());
}

// === Foreign keys and equality ===

#[tokio::test]
async fn test_related_record_is_sent_as_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slug": "admins", "name": "Admins"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"id": 1, "group": "admins"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "group": "admins"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = users(&server, true).client().clone();
    let group = assert_ok!(client.endpoint("groups").get(&json!({"slug": "admins"})).await);

    let mut user = Resource::new(client.endpoint("users"), object(json!({"id": 1}))).unwrap();
    user.set("group", &group).unwrap();

    assert_ok!(user.save().await);
}

#[tokio::test]
async fn test_fetched_records_compare_by_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "user1"})))
        .mount(&server)
        .await;

    let endpoint = users(&server, true);
    let first = assert_ok!(endpoint.get(&json!({"id": 1})).await);
    let mut second = assert_ok!(endpoint.get(&json!({"id": 1})).await);
    assert!(first.try_eq(&second).unwrap());

    second.set("username", "changed").unwrap();
    assert!(matches!(
        first.try_eq(&second),
        Err(ResourceError::AmbiguousComparison { .. })
    ));
}
