//! Integration tests for auto-pagination.
//!
//! These tests verify that every page is requested exactly once, in order,
//! and that records are concatenated in page order.

use generic_client::{
    BaseUrl, ClientConfig, Endpoint, LinkHeader, PageEnvelope, PaginationStrategy, ResourceError,
    RestClient,
};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn users(server: &MockServer, strategy: impl PaginationStrategy + 'static) -> Endpoint {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .autopaginate(strategy)
        .build()
        .unwrap();
    RestClient::new(config).unwrap().endpoint("users")
}

fn ids(records: &[generic_client::Resource]) -> Vec<Value> {
    records
        .iter()
        .map(|record| record.get("id").cloned().unwrap_or(Value::Null))
        .collect()
}

fn without_query(request: &Request) -> bool {
    request.url.query().is_none()
}

// === Link header ===

#[tokio::test]
async fn test_link_header_follows_every_page() {
    let server = MockServer::start().await;
    let page = |n: u32| format!("{}/users?page={n}", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(without_query)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}, {"id": 2}]))
                .insert_header("Link", format!(r#"<{}>; rel="next""#, page(2)).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 3}, {"id": 4}]))
                .insert_header(
                    "Link",
                    format!(r#"<{}>; rel="next", <{}>; rel="prev""#, page(3), page(1)).as_str(),
                ),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 5}]))
                .insert_header("Link", format!(r#"<{}>; rel="prev""#, page(2)).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let everyone = assert_ok!(users(&server, LinkHeader).all().await);

    assert_eq!(ids(&everyone), vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    assert!(!everyone.has_next_page());
    assert!(everyone.has_prev_page());
}

#[tokio::test]
async fn test_link_header_keeps_filter_on_first_request() {
    let server = MockServer::start().await;
    let next = format!("{}/users?group=admin&page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(|request: &Request| request.url.query() == Some("group=admin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}]))
                .insert_header("Link", format!(r#"<{next}>; rel="next""#).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 9}])))
        .expect(1)
        .mount(&server)
        .await;

    let admins = assert_ok!(users(&server, LinkHeader).filter(&json!({"group": "admin"})).await);
    assert_eq!(ids(&admins), vec![json!(1), json!(9)]);
}

#[tokio::test]
async fn test_self_referencing_next_link_stops() {
    let server = MockServer::start().await;
    let own = format!("{}/users", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}]))
                .insert_header("Link", format!(r#"<{own}>; rel="next""#).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let everyone = assert_ok!(users(&server, LinkHeader).all().await);
    assert_eq!(everyone.len(), 1);
}

#[tokio::test]
async fn test_next_link_back_to_first_page_stops() {
    let server = MockServer::start().await;
    let first = format!("{}/users", server.uri());
    let second = format!("{}/users?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(without_query)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}]))
                .insert_header("Link", format!(r#"<{second}>; rel="next""#).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 2}]))
                .insert_header("Link", format!(r#"<{first}>; rel="next""#).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let everyone = assert_ok!(
        tokio::time::timeout(std::time::Duration::from_secs(5), users(&server, LinkHeader).all())
            .await
            .expect("pagination did not terminate")
    );
    assert_eq!(ids(&everyone), vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn test_failed_page_fails_the_listing() {
    let server = MockServer::start().await;
    let next = format!("{}/users?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(without_query)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}]))
                .insert_header("Link", format!(r#"<{next}>; rel="next""#).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let error = assert_err!(users(&server, LinkHeader).all().await);
    assert_eq!(error.status(), Some(500));
}

// === Page envelope ===

#[tokio::test]
async fn test_page_envelope_follows_next_key() {
    let server = MockServer::start().await;
    let next = format!("{}/users?cursor=abc", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(without_query)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1}, {"id": 2}],
            "next": next,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("cursor", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 3}],
            "next": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let everyone = assert_ok!(users(&server, PageEnvelope::default()).all().await);
    assert_eq!(ids(&everyone), vec![json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn test_page_envelope_custom_keys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1}],
            "next_page": "",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let everyone = assert_ok!(
        users(&server, PageEnvelope::new("items", "next_page"))
            .all()
            .await
    );
    assert_eq!(ids(&everyone), vec![json!(1)]);
}

#[tokio::test]
async fn test_get_by_filter_reads_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("username", "user1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1, "username": "user1"}],
            "next": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = assert_ok!(
        users(&server, PageEnvelope::default())
            .get(&json!({"username": "user1"}))
            .await
    );
    assert_eq!(user.get("id"), Some(&json!(1)));
}

// === Get across pages ===

#[tokio::test]
async fn test_get_by_filter_counts_records_on_later_pages() {
    let server = MockServer::start().await;
    let next = format!("{}/users?group=watchers&page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(|request: &Request| request.url.query() == Some("group=watchers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}]))
                .insert_header("Link", format!(r#"<{next}>; rel="next""#).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2}])))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        users(&server, LinkHeader)
            .get(&json!({"group": "watchers"}))
            .await
    );
    assert!(matches!(
        error,
        ResourceError::MultipleResourcesFound { count: 2, .. }
    ));
}

#[tokio::test]
async fn test_get_by_filter_finds_record_on_second_page() {
    let server = MockServer::start().await;
    let next = format!("{}/users?cursor=abc", server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("username", "user7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "next": next,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("cursor", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 7, "username": "user7"}],
            "next": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = assert_ok!(
        users(&server, PageEnvelope::default())
            .get(&json!({"username": "user7"}))
            .await
    );
    assert_eq!(user.get("id"), Some(&json!(7)));
}
