// NiFi REST API wire models
//
// Field names follow the NiFi JSON (camelCase). Numeric telemetry is
// optional everywhere because NiFi omits counters it has not computed yet;
// the nested snapshot lists that give a status payload its shape are
// required, so a truncated or foreign body fails to parse instead of
// silently producing an empty snapshot.
//
// Every type serializes all of its declared fields; see `parse.rs`.

use serde::{Deserialize, Serialize};

// ── Resources ────────────────────────────────────────────────────────

/// Response of `GET /resources`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResourcesEntity {
    #[serde(default)]
    pub resources: Vec<ResourceDto>,
}

/// One entry of the resource listing, e.g.
/// `{"identifier": "/process-groups/1f0e…", "name": "Ingest"}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResourceDto {
    pub identifier: String,
    #[serde(default)]
    pub name: String,
}

// ── Process groups ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionDto {
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Response of `GET /process-groups/{id}` and `PUT .../run-status`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupEntity {
    pub id: String,
    #[serde(default)]
    pub revision: Option<RevisionDto>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub component: Option<ProcessGroupComponent>,
    #[serde(default)]
    pub running_count: Option<u32>,
    #[serde(default)]
    pub stopped_count: Option<u32>,
    #[serde(default)]
    pub invalid_count: Option<u32>,
    #[serde(default)]
    pub disabled_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupComponent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_group_id: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Body of `PUT /process-groups/{id}/run-status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatusRequest {
    pub id: String,
    pub state: String,
    pub disconnected_node_acknowledged: bool,
}

// ── Processors ───────────────────────────────────────────────────────

/// Response of `GET /processors/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorEntity {
    pub id: String,
    #[serde(default)]
    pub revision: Option<RevisionDto>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub component: Option<ProcessorComponent>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorComponent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub processor_type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub parent_group_id: Option<String>,
}

// ── Flow status ──────────────────────────────────────────────────────

/// Response of `GET /flow/process-groups/{id}/status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupStatusEntity {
    pub process_group_status: ProcessGroupStatusDto,
    #[serde(default)]
    pub can_read: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupStatusDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stats_last_refreshed: Option<String>,
    pub aggregate_snapshot: ProcessGroupSnapshotDto,
}

/// Aggregate status of one process group.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupSnapshotDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,

    pub connection_status_snapshots: Vec<ConnectionStatusSnapshotEntity>,
    pub processor_status_snapshots: Vec<ProcessorStatusSnapshotEntity>,
    #[serde(default)]
    pub process_group_status_snapshots: Vec<ChildGroupStatusSnapshotEntity>,
    #[serde(default)]
    pub remote_process_group_status_snapshots: Vec<RemoteProcessGroupStatusSnapshotEntity>,
    #[serde(default)]
    pub input_port_status_snapshots: Vec<PortStatusSnapshotEntity>,
    #[serde(default)]
    pub output_port_status_snapshots: Vec<PortStatusSnapshotEntity>,

    #[serde(flatten)]
    pub counters: GroupCountersDto,
}

/// Aggregate counters shared by a group snapshot and its child entries.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCountersDto {
    #[serde(default)]
    pub flow_files_in: Option<u64>,
    #[serde(default)]
    pub bytes_in: Option<u64>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub flow_files_queued: Option<u64>,
    #[serde(default)]
    pub bytes_queued: Option<u64>,
    #[serde(default)]
    pub queued: Option<String>,
    #[serde(default)]
    pub queued_count: Option<String>,
    #[serde(default)]
    pub queued_size: Option<String>,
    #[serde(default)]
    pub bytes_read: Option<u64>,
    #[serde(default)]
    pub read: Option<String>,
    #[serde(default)]
    pub bytes_written: Option<u64>,
    #[serde(default)]
    pub written: Option<String>,
    #[serde(default)]
    pub flow_files_out: Option<u64>,
    #[serde(default)]
    pub bytes_out: Option<u64>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub flow_files_transferred: Option<u64>,
    #[serde(default)]
    pub bytes_transferred: Option<u64>,
    #[serde(default)]
    pub transferred: Option<String>,
    #[serde(default)]
    pub flow_files_received: Option<u64>,
    #[serde(default)]
    pub bytes_received: Option<u64>,
    #[serde(default)]
    pub received: Option<String>,
    #[serde(default)]
    pub flow_files_sent: Option<u64>,
    #[serde(default)]
    pub bytes_sent: Option<u64>,
    #[serde(default)]
    pub sent: Option<String>,
    #[serde(default)]
    pub active_thread_count: Option<u32>,
    #[serde(default)]
    pub terminated_thread_count: Option<u32>,
    #[serde(default)]
    pub stateless_active_thread_count: Option<u32>,
    #[serde(default)]
    pub processing_nanos: Option<u64>,
}

// ── Connections ──

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusSnapshotEntity {
    #[serde(default)]
    pub id: Option<String>,
    pub connection_status_snapshot: ConnectionStatusSnapshotDto,
    #[serde(default)]
    pub can_read: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusSnapshotDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub destination_name: Option<String>,
    #[serde(default)]
    pub flow_files_in: Option<u64>,
    #[serde(default)]
    pub bytes_in: Option<u64>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub flow_files_out: Option<u64>,
    #[serde(default)]
    pub bytes_out: Option<u64>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub flow_files_queued: Option<u64>,
    #[serde(default)]
    pub bytes_queued: Option<u64>,
    #[serde(default)]
    pub queued: Option<String>,
    #[serde(default)]
    pub queued_size: Option<String>,
    #[serde(default)]
    pub queued_count: Option<String>,
    #[serde(default)]
    pub percent_use_count: Option<u32>,
    #[serde(default)]
    pub percent_use_bytes: Option<u32>,
    #[serde(default)]
    pub flow_file_availability: Option<String>,
}

// ── Processors ──

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorStatusSnapshotEntity {
    #[serde(default)]
    pub id: Option<String>,
    pub processor_status_snapshot: ProcessorStatusSnapshotDto,
    #[serde(default)]
    pub can_read: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorStatusSnapshotDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub processor_type: Option<String>,
    #[serde(default)]
    pub run_status: Option<String>,
    #[serde(default)]
    pub execution_node: Option<String>,
    #[serde(default)]
    pub bytes_read: Option<u64>,
    #[serde(default)]
    pub bytes_written: Option<u64>,
    #[serde(default)]
    pub read: Option<String>,
    #[serde(default)]
    pub written: Option<String>,
    #[serde(default)]
    pub flow_files_in: Option<u64>,
    #[serde(default)]
    pub bytes_in: Option<u64>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub flow_files_out: Option<u64>,
    #[serde(default)]
    pub bytes_out: Option<u64>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub task_count: Option<u64>,
    #[serde(default)]
    pub tasks_duration_nanos: Option<u64>,
    #[serde(default)]
    pub tasks: Option<String>,
    #[serde(default)]
    pub tasks_duration: Option<String>,
    #[serde(default)]
    pub active_thread_count: Option<u32>,
    #[serde(default)]
    pub terminated_thread_count: Option<u32>,
}

// ── Child groups ──

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildGroupStatusSnapshotEntity {
    #[serde(default)]
    pub id: Option<String>,
    pub process_group_status_snapshot: ChildGroupSnapshotDto,
    #[serde(default)]
    pub can_read: Option<bool>,
}

/// A child group's aggregate. NiFi only fills the nested lists for
/// recursive status requests, so they are optional here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildGroupSnapshotDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub connection_status_snapshots: Vec<ConnectionStatusSnapshotEntity>,
    #[serde(default)]
    pub processor_status_snapshots: Vec<ProcessorStatusSnapshotEntity>,
    #[serde(default)]
    pub process_group_status_snapshots: Vec<ChildGroupStatusSnapshotEntity>,
    #[serde(default)]
    pub remote_process_group_status_snapshots: Vec<RemoteProcessGroupStatusSnapshotEntity>,
    #[serde(default)]
    pub input_port_status_snapshots: Vec<PortStatusSnapshotEntity>,
    #[serde(default)]
    pub output_port_status_snapshots: Vec<PortStatusSnapshotEntity>,
    #[serde(flatten)]
    pub counters: GroupCountersDto,
}

// ── Ports ──

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortStatusSnapshotEntity {
    #[serde(default)]
    pub id: Option<String>,
    pub port_status_snapshot: PortStatusSnapshotDto,
    #[serde(default)]
    pub can_read: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortStatusSnapshotDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub run_status: Option<String>,
    #[serde(default)]
    pub bytes_received: Option<u64>,
    #[serde(default)]
    pub bytes_sent: Option<u64>,
    #[serde(default)]
    pub flow_files_received: Option<u64>,
    #[serde(default)]
    pub flow_files_sent: Option<u64>,
    #[serde(default)]
    pub received: Option<String>,
    #[serde(default)]
    pub sent: Option<String>,
    #[serde(default)]
    pub active_thread_count: Option<u32>,
}

// ── Remote process groups ──

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProcessGroupStatusSnapshotEntity {
    #[serde(default)]
    pub id: Option<String>,
    pub remote_process_group_status_snapshot: RemoteProcessGroupStatusSnapshotDto,
    #[serde(default)]
    pub can_read: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProcessGroupStatusSnapshotDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target_uri: Option<String>,
    #[serde(default)]
    pub transmission_status: Option<String>,
    #[serde(default)]
    pub active_thread_count: Option<u32>,
    #[serde(default)]
    pub flow_files_sent: Option<u64>,
    #[serde(default)]
    pub bytes_sent: Option<u64>,
    #[serde(default)]
    pub flow_files_received: Option<u64>,
    #[serde(default)]
    pub bytes_received: Option<u64>,
}
