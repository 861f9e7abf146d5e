#![allow(clippy::unwrap_used)]
// Integration tests for `NifiClient` and `AuthSession` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nifictl_api::{Error, FieldPolicy, NifiClient, RetryPolicy, TlsMode, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

const TOKEN_PATH: &str = "/nifi-api/access/token";

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    }
}

fn api_base(server: &MockServer) -> Url {
    Url::parse(&format!("{}/nifi-api", server.uri())).unwrap()
}

async fn setup() -> (MockServer, NifiClient) {
    let server = MockServer::start().await;
    let client = NifiClient::with_client(
        reqwest::Client::new(),
        api_base(&server),
        fast_retry(),
        Duration::from_secs(5),
    )
    .unwrap();
    (server, client)
}

fn password() -> SecretString {
    SecretString::from("s3cret".to_string())
}

async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string(token))
        .mount(server)
        .await;
}

async fn login(server: &MockServer, client: &NifiClient) {
    mount_token(server, "tok-1").await;
    client
        .session()
        .initialize("admin", password())
        .await
        .unwrap();
}

fn status_body() -> serde_json::Value {
    json!({
        "processGroupStatus": {
            "id": "pg-1",
            "name": "Ingest",
            "statsLastRefreshed": "10:15:00 UTC",
            "aggregateSnapshot": {
                "id": "pg-1",
                "name": "Ingest",
                "connectionStatusSnapshots": [],
                "processorStatusSnapshots": [{
                    "id": "p-1",
                    "processorStatusSnapshot": {
                        "id": "p-1",
                        "name": "GetFile",
                        "type": "GetFile",
                        "runStatus": "Running",
                        "flowFilesIn": 500,
                        "bytesIn": 2000000
                    },
                    "canRead": true
                }],
                "flowFilesIn": 500,
                "bytesIn": 2000000
            }
        },
        "canRead": true
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_initialize_acquires_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(201).set_body_string("tok-1\n"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.session().current_token().is_none());
    let token = client
        .session()
        .initialize("admin", password())
        .await
        .unwrap();

    assert_eq!(token.expose_secret(), "tok-1");
    assert_eq!(
        client.session().current_token().unwrap().expose_secret(),
        "tok-1"
    );
}

#[tokio::test]
async fn test_initialize_rejected_credentials_are_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.session().initialize("admin", password()).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(client.session().current_token().is_none());
}

#[tokio::test]
async fn test_initialize_retries_server_errors() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_token(&server, "tok-after-retry").await;

    let token = client
        .session()
        .initialize("admin", password())
        .await
        .unwrap();
    assert_eq!(token.expose_secret(), "tok-after-retry");
}

#[tokio::test]
async fn test_initialize_gives_up_after_bounded_attempts() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let result = client.session().initialize("admin", password()).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_request_without_session_fails_fast() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/resources"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.list_resources().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

// ── Bearer injection and 401 handling ───────────────────────────────

#[tokio::test]
async fn test_bearer_token_is_injected() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/resources"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [
                { "identifier": "/process-groups/pg-1", "name": "Ingest" },
                { "identifier": "/processors/p-1", "name": "GetFile" }
            ]
        })))
        .mount(&server)
        .await;

    let resources = client.list_resources().await.unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].identifier, "/process-groups/pg-1");
    assert_eq!(resources[1].name, "GetFile");
}

#[tokio::test]
async fn test_unauthorized_refreshes_token_and_signals_resubmit() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string("stale"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_token(&server, "fresh").await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/resources"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nifi-api/resources"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resources": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .session()
        .initialize("admin", password())
        .await
        .unwrap();

    let first = client.list_resources().await;
    assert!(
        matches!(first, Err(Error::TokenRefreshed)),
        "expected TokenRefreshed, got: {first:?}"
    );
    assert!(first.unwrap_err().is_auth_expired());
    assert_eq!(
        client.session().current_token().unwrap().expose_secret(),
        "fresh"
    );

    let second = client.list_resources().await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_unauthorized_with_failing_refresh_is_an_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string("tok-1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nifi-api/processors/p-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    client
        .session()
        .initialize("admin", password())
        .await
        .unwrap();

    let result = client.get_processor("p-1").await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Retry policy ────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_is_retried_then_surfaced() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/process-groups/pg-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(4)
        .mount(&server)
        .await;

    let result = client.get_process_group("pg-1").await;
    match result {
        Err(Error::Server { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/processors/p-1"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nifi-api/processors/p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-1",
            "component": {
                "id": "p-1",
                "name": "GetFile",
                "type": "org.apache.nifi.processors.standard.GetFile",
                "state": "RUNNING"
            }
        })))
        .mount(&server)
        .await;

    let processor = client.get_processor("p-1").await.unwrap();
    let component = processor.component.unwrap();
    assert_eq!(component.name.as_deref(), Some("GetFile"));
    assert_eq!(component.state.as_deref(), Some("RUNNING"));
}

#[tokio::test]
async fn test_client_error_is_surfaced_verbatim_without_retry() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("PUT"))
        .and(path("/nifi-api/process-groups/pg-1/run-status"))
        .respond_with(ResponseTemplate::new(409).set_body_string("pg-1 is not in a valid state"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.update_run_status("pg-1", "RUNNING").await;
    match result {
        Err(Error::Client { status, body }) => {
            assert_eq!(status, 409);
            assert_eq!(body, "pg-1 is not in a valid state");
        }
        other => panic!("expected Client error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: Duration::from_millis(200),
        retry: RetryPolicy::none(),
    };
    let client = NifiClient::new(api_base(&server), &transport).unwrap();
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/process-groups/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = client.get_process_group("slow").await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_prebuilt_http_client_still_gets_per_call_timeout() {
    let server = MockServer::start().await;
    let client = NifiClient::with_client(
        reqwest::Client::new(),
        api_base(&server),
        RetryPolicy::none(),
        Duration::from_millis(200),
    )
    .unwrap();
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/process-groups/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "slow"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let result = client.get_process_group("slow").await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout, got: {result:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_token_request_honours_per_call_timeout() {
    let server = MockServer::start().await;
    let client = NifiClient::with_client(
        reqwest::Client::new(),
        api_base(&server),
        RetryPolicy::none(),
        Duration::from_millis(200),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string("tok-slow")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let result = client.session().initialize("admin", password()).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication, got: {result:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(client.session().current_token().is_none());
}

// ── Endpoint payloads ───────────────────────────────────────────────

#[tokio::test]
async fn test_update_run_status_sends_transition_body() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("PUT"))
        .and(path("/nifi-api/process-groups/pg-1/run-status"))
        .and(body_json(json!({
            "id": "pg-1",
            "state": "STOPPED",
            "disconnectedNodeAcknowledged": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pg-1",
            "component": { "id": "pg-1", "name": "Ingest" },
            "runningCount": 0,
            "stoppedCount": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entity = client.update_run_status("pg-1", "STOPPED").await.unwrap();
    assert_eq!(entity.id, "pg-1");
    assert_eq!(entity.stopped_count, Some(4));
}

#[tokio::test]
async fn test_get_process_group_status() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/flow/process-groups/pg-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let status = client.get_process_group_status("pg-1").await.unwrap();
    let snapshot = status.process_group_status.aggregate_snapshot;
    assert_eq!(snapshot.name.as_deref(), Some("Ingest"));
    assert_eq!(snapshot.counters.bytes_in, Some(2_000_000));
    assert_eq!(snapshot.processor_status_snapshots.len(), 1);
    assert_eq!(
        snapshot.processor_status_snapshots[0]
            .processor_status_snapshot
            .run_status
            .as_deref(),
        Some("Running")
    );
    assert!(snapshot.input_port_status_snapshots.is_empty());
}

#[tokio::test]
async fn test_status_missing_required_lists_is_a_parse_error() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/nifi-api/flow/process-groups/pg-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processGroupStatus": {
                "id": "pg-1",
                "aggregateSnapshot": { "id": "pg-1", "flowFilesIn": 3 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.get_process_group_status("pg-1").await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_reject_unknown_policy_flags_new_fields() {
    let (server, client) = setup().await;
    login(&server, &client).await;
    let client = client.with_field_policy(FieldPolicy::RejectUnknown);

    let mut body = status_body();
    body["processGroupStatus"]["aggregateSnapshot"]["brandNewCounter"] = json!(7);

    Mock::given(method("GET"))
        .and(path("/nifi-api/flow/process-groups/pg-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = client.get_process_group_status("pg-1").await;
    match result {
        Err(Error::Deserialization { message, .. }) => {
            assert!(message.contains("brandNewCounter"), "message: {message}");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
