//! End-to-end tests for the aggregate client against a mock API.

use nodesty::{FailureKind, NodestyClient, RetryPolicy, ServiceId};
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5));

fn client_for(server: &MockServer) -> NodestyClient {
    NodestyClient::builder("token-1")
        .with_base_url(server.uri())
        .with_retry_policy(RetryPolicy::new().with_base_delay(Duration::from_millis(1)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn api_key_update_reaches_every_area() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("Authorization", "PAT token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "timestamp": "2024-06-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    for route in [
        "/api/users/@me/sessions",
        "/api/services/42/vps/tasks",
        "/api/services/42/dedicated/tasks",
        "/api/services/42/firewall/203.0.113.5/rules",
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "PAT token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    assert!(client.health_check().await.is_success());

    client.update_api_key("token-2");
    let service = ServiceId::new("42").unwrap();

    assert!(client.get_user_sessions().await.is_success());
    assert!(client.get_vps_tasks(&service).await.is_success());
    assert!(client.get_dedicated_tasks(&service).await.is_success());
    assert!(client.get_firewall_rules(&service, IP).await.is_success());
}

#[tokio::test]
async fn base_url_update_reaches_every_area() {
    let old = MockServer::start().await;
    let new = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&new)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services/42/vps/backups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&new)
        .await;

    let client = client_for(&old);
    client.update_base_url(new.uri()).unwrap();
    let service = ServiceId::new("42").unwrap();

    assert!(client.get_services().await.is_success());
    assert!(client.get_vps_backups(&service).await.is_success());
    assert!(old.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn transient_failures_are_retried_through_the_facade() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/42/vps/action"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/services/42/vps/action"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.start_vps(&ServiceId::new("42").unwrap()).await;

    assert!(response.is_success());
    assert_eq!(response.attempts(), 3);
}

#[tokio::test]
async fn client_errors_convert_into_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/@me/invoices/9"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_invoice(9).await.into_result().unwrap_err();

    assert_eq!(err.error_code(), "CLIENT_ERROR");
    assert!(!err.is_retryable());
    assert_eq!(err.to_string(), "forbidden: HTTP 403: Forbidden");
    assert!(matches!(
        err,
        nodesty::Error::Api {
            kind: FailureKind::ClientError,
            ..
        }
    ));
}
