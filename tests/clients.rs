//! Integration tests for the client endpoints.
//!
//! These tests use wiremock to mock the Management API and verify the
//! exact requests the client sends.

use mgmt_api::models::Client;
use mgmt_api::MgmtApi;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn api(server: &MockServer) -> MgmtApi {
    assert_ok!(MgmtApi::new(&server.uri(), TOKEN))
}

#[tokio::test]
async fn test_list_clients() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/clients"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"client_id": "abc", "name": "First"},
            {"client_id": "def", "name": "Second"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let clients = assert_ok!(api(&mock_server).list_clients().unwrap().execute().await);

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].client_id.as_deref(), Some("abc"));
    assert_eq!(clients[1].name.as_deref(), Some("Second"));
}

#[tokio::test]
async fn test_list_clients_empty_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let clients = assert_ok!(api(&mock_server).list_clients().unwrap().execute().await);
    assert!(clients.is_empty());
}

#[tokio::test]
async fn test_get_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/clients/abc123"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_id": "abc123",
            "name": "My App",
            "app_type": "spa",
            "callbacks": ["https://app.example.com/callback"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = assert_ok!(api(&mock_server).get_client("abc123").unwrap().execute().await);

    assert_eq!(client.client_id.as_deref(), Some("abc123"));
    assert_eq!(client.app_type.as_deref(), Some("spa"));
    assert_eq!(
        client.callbacks,
        Some(vec!["https://app.example.com/callback".to_string()])
    );
}

#[tokio::test]
async fn test_create_client_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/clients"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "My App", "app_type": "spa"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "client_id": "new-id",
            "name": "My App",
            "app_type": "spa"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let payload = Client::new("My App").with_app_type("spa");
    let created = assert_ok!(
        api(&mock_server)
            .create_client(&payload)
            .unwrap()
            .execute()
            .await
    );

    assert_eq!(created.client_id.as_deref(), Some("new-id"));
}

#[tokio::test]
async fn test_update_client_uses_patch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v2/clients/abc123"))
        .and(body_json(json!({"description": "Updated"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_id": "abc123",
            "description": "Updated"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let patch = Client {
        description: Some("Updated".to_string()),
        ..Client::default()
    };
    let updated = assert_ok!(
        api(&mock_server)
            .update_client("abc123", &patch)
            .unwrap()
            .execute()
            .await
    );

    assert_eq!(updated.description.as_deref(), Some("Updated"));
}

#[tokio::test]
async fn test_delete_client_accepts_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/clients/abc123"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_ok!(api(&mock_server).delete_client("abc123").unwrap().execute().await);
}

#[tokio::test]
async fn test_rotate_client_secret() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/clients/abc123/rotate-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_id": "abc123",
            "client_secret": "fresh-secret"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let rotated = assert_ok!(
        api(&mock_server)
            .rotate_client_secret("abc123")
            .unwrap()
            .execute()
            .await
    );

    assert_eq!(rotated.client_secret.as_deref(), Some("fresh-secret"));
}

#[tokio::test]
async fn test_client_id_is_percent_encoded_in_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/clients/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"client_id": "a/b"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = assert_ok!(api(&mock_server).get_client("a/b").unwrap().execute().await);
    assert_eq!(client.client_id.as_deref(), Some("a/b"));
}

#[tokio::test]
async fn test_custom_header_and_query_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/clients"))
        .and(header("x-request-id", "req-42"))
        .and(wiremock::matchers::query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let request = api
        .list_clients()
        .unwrap()
        .add_header("X-Request-Id", "req-42")
        .add_query_parameter("page", "2");
    assert_ok!(request.execute().await);
}

#[tokio::test]
async fn test_blank_client_id_is_rejected_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let err = assert_err!(api.get_client(""));
    assert_eq!(
        err.to_string(),
        "invalid argument: 'client id' cannot be null or empty"
    );
    assert_err!(api.delete_client("  "));
    assert_err!(api.rotate_client_secret(""));
}
