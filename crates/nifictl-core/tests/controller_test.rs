#![allow(clippy::unwrap_used)]
// Integration tests for the core services, driven through `Controller`
// against a wiremock NiFi.

use std::time::Duration;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nifictl_api::{NifiClient, RetryPolicy};
use nifictl_core::{
    ConnectionState, Controller, CoreError, Credentials, PollInterval, ResourceKind,
    TickFailurePolicy,
};

// ── Helpers ─────────────────────────────────────────────────────────

const STATUS_PATH: &str = "/nifi-api/flow/process-groups/pg-1/status";

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    }
}

fn credentials() -> Credentials {
    Credentials {
        username: "admin".into(),
        password: SecretString::from("s3cret".to_string()),
    }
}

async fn setup_with(retry: RetryPolicy) -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let client = NifiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("{}/nifi-api", server.uri())).unwrap(),
        retry,
        Duration::from_secs(5),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/nifi-api/access/token"))
        .respond_with(ResponseTemplate::new(201).set_body_string("tok-1"))
        .mount(&server)
        .await;

    let controller = Controller::with_client(client, credentials());
    controller.connect().await.unwrap();
    (server, controller)
}

async fn setup() -> (MockServer, Controller) {
    setup_with(fast_retry()).await
}

fn resources_body() -> serde_json::Value {
    json!({
        "resources": [
            {"identifier": "/flow", "name": "flow"},
            {"identifier": "/process-groups/pg-1", "name": "Ingest"},
            {"identifier": "/processors/p-1", "name": "GetFile"},
            {"identifier": "/process-groups/pg-2", "name": "Ingest"},
            {"identifier": "/data/process-groups/pg-1/", "name": "Ingest data"},
        ]
    })
}

async fn mount_resources(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/nifi-api/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(resources_body()))
        .mount(server)
        .await;
}

fn group_entity(state_counts: (u32, u32)) -> serde_json::Value {
    json!({
        "id": "pg-1",
        "revision": {"version": 4},
        "component": {"id": "pg-1", "name": "Ingest", "parentGroupId": "root"},
        "runningCount": state_counts.0,
        "stoppedCount": state_counts.1,
    })
}

fn status_body() -> serde_json::Value {
    json!({
        "processGroupStatus": {
            "id": "pg-1",
            "name": "Ingest",
            "aggregateSnapshot": {
                "connectionStatusSnapshots": [{
                    "id": "c-1",
                    "connectionStatusSnapshot": {
                        "id": "c-1",
                        "sourceName": "GetFile",
                        "destinationName": "PutS3",
                        "flowFilesQueued": 12,
                        "queuedSize": "4 KB"
                    }
                }],
                "processorStatusSnapshots": [{
                    "id": "p-1",
                    "processorStatusSnapshot": {
                        "id": "p-1",
                        "name": "GetFile",
                        "type": "GetFile",
                        "runStatus": "Stopped",
                        "flowFilesIn": 500,
                        "bytesIn": 2000000,
                        "taskCount": 10,
                        "tasksDurationNanos": 125000000000u64
                    }
                }],
                "flowFilesIn": 500,
                "bytesIn": 2000000
            }
        }
    })
}

async fn status_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == STATUS_PATH)
        .count()
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn connect_marks_controller_connected() {
    let (_server, controller) = setup().await;
    assert_eq!(*controller.connection_state().borrow(), ConnectionState::Connected);
}

#[tokio::test]
async fn rejected_credentials_fail_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nifi-api/access/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;
    let client = NifiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("{}/nifi-api", server.uri())).unwrap(),
        fast_retry(),
        Duration::from_secs(5),
    )
    .unwrap();
    let controller = Controller::with_client(client, credentials());

    let err = controller.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert_eq!(*controller.connection_state().borrow(), ConnectionState::Failed);
}

// ── Catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_resolves_and_classifies() {
    let (server, controller) = setup().await;
    mount_resources(&server).await;

    let snapshot = controller.catalog().fetch_all().await.unwrap();
    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot.process_groups().count(), 2);

    let by_name = controller.catalog().resolve_by_name("Ingest").await.unwrap();
    assert_eq!(by_name.and_then(|r| r.id).as_deref(), Some("pg-1"));

    let processor = controller
        .catalog()
        .find_processor_by_name("GetFile")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(processor.kind, ResourceKind::Processor);

    let children = controller.catalog().children_of("pg-1").await.unwrap();
    assert_eq!(children.len(), 1);
}

#[tokio::test]
async fn discovery_tolerates_unavailable_server() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path("/nifi-api/resources"))
        .respond_with(ResponseTemplate::new(503))
        // one attempt plus three retries, for each of the two reads
        .expect(8)
        .mount(&server)
        .await;

    let groups = controller.catalog().discover_process_groups().await.unwrap();
    assert!(groups.is_empty());

    // Ordinary reads still surface the failure.
    let err = controller.catalog().fetch_all().await.unwrap_err();
    assert!(matches!(err, CoreError::RemoteServer { status: 503, .. }));
}

// ── Control ─────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_group_fails_without_state_change_request() {
    let (server, controller) = setup().await;
    mount_resources(&server).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_entity((1, 0))))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller.control().start("pg-missing").await.unwrap_err();
    match err {
        CoreError::NotFound {
            entity_type,
            identifier,
        } => {
            assert_eq!(entity_type, "Process group");
            assert_eq!(identifier, "pg-missing");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn starting_a_running_group_is_idempotent() {
    let (server, controller) = setup().await;
    mount_resources(&server).await;
    Mock::given(method("PUT"))
        .and(path("/nifi-api/process-groups/pg-1/run-status"))
        .and(body_partial_json(json!({"id": "pg-1", "state": "RUNNING"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_entity((3, 0))))
        .expect(2)
        .mount(&server)
        .await;

    let first = controller.control().start("pg-1").await.unwrap();
    let second = controller.control().start("pg-1").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.running_count, 3);
    assert_eq!(second.revision, Some(4));
}

#[tokio::test]
async fn stop_sends_stopped_state() {
    let (server, controller) = setup().await;
    mount_resources(&server).await;
    Mock::given(method("PUT"))
        .and(path("/nifi-api/process-groups/pg-1/run-status"))
        .and(body_partial_json(json!({"state": "STOPPED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_entity((0, 3))))
        .expect(1)
        .mount(&server)
        .await;

    let group = controller.control().stop("pg-1").await.unwrap();
    assert_eq!(group.stopped_count, 3);
}

#[tokio::test]
async fn conflict_is_surfaced_verbatim() {
    let (server, controller) = setup().await;
    mount_resources(&server).await;
    Mock::given(method("PUT"))
        .and(path("/nifi-api/process-groups/pg-1/run-status"))
        .respond_with(ResponseTemplate::new(409).set_body_string("revision mismatch"))
        .expect(1)
        .mount(&server)
        .await;

    let err = controller.control().start("pg-1").await.unwrap_err();
    match err {
        CoreError::RemoteClient { status, body } => {
            assert_eq!(status, 409);
            assert_eq!(body, "revision mismatch");
        }
        other => panic!("expected RemoteClient, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_processor_maps_to_not_found() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path("/nifi-api/processors/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let err = controller.control().get_processor("nope").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

// ── Status & analysis ───────────────────────────────────────────────

#[tokio::test]
async fn snapshot_and_processor_status() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let snapshot = controller.status().get_snapshot("pg-1").await.unwrap();
    assert_eq!(snapshot.id, "pg-1");
    assert_eq!(snapshot.connections.len(), 1);

    let processor = controller
        .status()
        .processor_status("pg-1", "p-1")
        .await
        .unwrap();
    assert_eq!(processor.name.as_deref(), Some("GetFile"));

    let err = controller
        .status()
        .processor_status("pg-1", "p-9")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn analyze_process_group_end_to_end() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let analysis = controller.analyze_process_group("pg-1").await.unwrap();
    assert_eq!(analysis.queue_connections.len(), 1);
    assert_eq!(analysis.queue_connections[0].queued_count, 12);
    assert_eq!(analysis.stopped_processors.len(), 1);
    assert_eq!(analysis.processor_transfers[0].input.formatted_size, "1.91 MB");
    assert_eq!(
        analysis.processor_transfers[0].timing.formatted_processing_time,
        "2 minutes 5 seconds"
    );
    assert_eq!(analysis.group_total_transfer.formatted_size, "1.91 MB");
}

#[tokio::test]
async fn malformed_status_is_a_parse_error_and_not_retried() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processGroupStatus": {"id": "pg-1", "aggregateSnapshot": {}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = controller.analyze_process_group("pg-1").await.unwrap_err();
    assert!(matches!(err, CoreError::Parse { .. }));
}

// ── Streams ─────────────────────────────────────────────────────────

#[tokio::test]
async fn cancelled_stream_stops_fetching() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let interval = PollInterval::from_secs(1).unwrap();
    let mut stream = controller.watch("pg-1", interval, TickFailurePolicy::Terminate);

    for _ in 0..2 {
        let item = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.unwrap().id, "pg-1");
    }
    stream.cancel();
    let seen = status_requests(&server).await;
    assert_eq!(seen, 2);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(status_requests(&server).await, seen);
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn shutdown_ends_open_streams() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let mut stream = controller.watch(
        "pg-1",
        PollInterval::from_secs(1).unwrap(),
        TickFailurePolicy::Terminate,
    );
    assert!(stream.next().await.unwrap().is_ok());

    controller.shutdown();
    assert!(stream.next().await.is_none());
    assert_eq!(status_requests(&server).await, 1);
}

#[tokio::test]
async fn failed_tick_terminates_by_default() {
    let (server, controller) = setup_with(RetryPolicy::none()).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut stream = controller.status().stream_snapshots(
        "pg-1",
        PollInterval::from_secs(1).unwrap(),
        TickFailurePolicy::Terminate,
    );
    let first = stream.next().await.unwrap();
    assert!(matches!(first, Err(CoreError::RemoteServer { status: 500, .. })));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn skip_policy_continues_past_failed_tick() {
    let (server, controller) = setup_with(RetryPolicy::none()).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let mut stream = controller.status().stream_snapshots(
        "pg-1",
        PollInterval::from_secs(1).unwrap(),
        TickFailurePolicy::Skip,
    );
    let item = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.unwrap().name.as_deref(), Some("Ingest"));
    assert_eq!(status_requests(&server).await, 2);
}

#[tokio::test]
async fn stream_is_lazy_until_polled() {
    let (server, controller) = setup().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let stream = controller.status().stream_snapshots(
        "pg-1",
        PollInterval::default(),
        TickFailurePolicy::Terminate,
    );
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(status_requests(&server).await, 0);
    drop(stream);
}
