//! REST client against a mock backend.

use std::time::Duration;

use codepulse_core::{ResourceKey, TransportError};
use codepulse_tui::api_client::{ResourceFetcher, RestClient};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RestClient {
    RestClient::with_base_url(&server.uri(), None).unwrap()
}

#[tokio::test]
async fn test_fetch_decodes_files_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "files": [{"id": 1, "filename": "vmx.c", "line_count": 420, "stub_count": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resource = client_for(&server).fetch(&ResourceKey::Files).await.unwrap();
    let files = resource.as_files().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "vmx.c");
    assert_eq!(files[0].function_count, 0);
}

#[tokio::test]
async fn test_non_success_status_carries_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&ResourceKey::Files).await.unwrap_err();
    assert_eq!(err, TransportError::Status(500));
    assert_eq!(err.to_string(), "API error: 500");
}

#[tokio::test]
async fn test_not_found_is_status_error() {
    let server = MockServer::start().await;
    let err = client_for(&server).fetch(&ResourceKey::Tasks).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stubs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&ResourceKey::Stubs).await.unwrap_err();
    assert!(matches!(err, TransportError::Parse(_)));
}

#[tokio::test]
async fn test_search_query_is_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/functions/search"))
        .and(query_param("query", "ept & vmexit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": ["handle_ept"]})))
        .expect(1)
        .mount(&server)
        .await;

    let key = ResourceKey::Search("ept & vmexit".to_string());
    let resource = client_for(&server).fetch(&key).await.unwrap();
    assert_eq!(resource.as_search().unwrap()["results"][0], "handle_ept");
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = RestClient::with_base_url(&server.uri(), Some(Duration::from_millis(50))).unwrap();
    let err = client.fetch(&ResourceKey::Dashboard).await.unwrap_err();
    assert_eq!(err, TransportError::Timeout);
}

/// Base URL of a local port with nothing listening on it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_connection_refused_is_connection_error() {
    let client = RestClient::with_base_url(&closed_port_url(), Some(Duration::from_secs(2))).unwrap();
    let err = client.fetch(&ResourceKey::Components).await.unwrap_err();
    assert!(matches!(err, TransportError::Connection(_)), "got {:?}", err);
}
