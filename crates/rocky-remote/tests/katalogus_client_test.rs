//! KATalogus client against a mock HTTP server.

use std::time::Duration;

use rocky_core::models::organization::OrganizationCode;
use rocky_remote::{KatalogusClient, RemoteConfig};
use rocky_services::client::{CatalogClient, ClientError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn code() -> OrganizationCode {
    OrganizationCode::parse("acme-test").unwrap()
}

fn client(server: &MockServer) -> KatalogusClient {
    KatalogusClient::new(&RemoteConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn health_parses_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service": "katalogus",
            "healthy": true,
            "version": "1.17.0",
            "results": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let health = client(&server).health().await.unwrap();

    assert!(health.healthy);
    assert_eq!(health.version.as_deref(), Some("1.17.0"));
}

#[tokio::test]
async fn health_with_bad_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let err = client(&server).health().await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn organization_exists_maps_not_found_to_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/organisations/acme-test"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client(&server).organization_exists(&code()).await.unwrap());
}

#[tokio::test]
async fn organization_exists_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/organisations/acme-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "acme-test", "name": "Acme Test" })),
        )
        .mount(&server)
        .await;

    assert!(client(&server).organization_exists(&code()).await.unwrap());
}

#[tokio::test]
async fn organization_exists_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/organisations/acme-test"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server).organization_exists(&code()).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Status {
            status: 503,
            message: "maintenance".into(),
        }
    );
}

#[tokio::test]
async fn create_posts_id_and_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/organisations/"))
        .and(body_json(json!({ "id": "acme-test", "name": "Acme Test" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .create_organization(&code(), "Acme Test")
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_organization() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/organisations/acme-test"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_organization(&code()).await.unwrap();
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/organisations/acme-test"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = KatalogusClient::new(
        &RemoteConfig::new(server.uri()).with_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let err = client.delete_organization(&code()).await.unwrap_err();

    assert_eq!(err, ClientError::Timeout);
}

#[tokio::test]
async fn unreachable_service_is_connection_error() {
    let client = KatalogusClient::new(&RemoteConfig::new("http://127.0.0.1:9")).unwrap();

    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ClientError::Connection(_)));
}
