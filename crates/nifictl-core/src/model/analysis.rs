// ── Analysis result types ──
//
// Output of `analysis::analyze`. Field names serialize in camelCase so the
// JSON matches what dashboards built on the NiFi UI vocabulary expect.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Display unit chosen by magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SizeUnit {
    #[serde(rename = "bytes")]
    #[strum(serialize = "bytes")]
    Bytes,
    #[serde(rename = "KB")]
    #[strum(serialize = "KB")]
    Kb,
    #[serde(rename = "MB")]
    #[strum(serialize = "MB")]
    Mb,
}

/// A flow-file count paired with a scaled byte size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMetrics {
    pub flow_file_count: u64,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub formatted_size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueConnectionInfo {
    pub connection_id: Option<String>,
    pub source_name: Option<String>,
    pub destination_name: Option<String>,
    pub queued_count: u64,
    pub queued_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorStateInfo {
    pub processor_id: Option<String>,
    pub processor_name: Option<String>,
    pub processor_type: Option<String>,
    pub run_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorTimingInfo {
    pub tasks_duration_nanos: u64,
    pub formatted_processing_time: String,
    pub processing_time_seconds: f64,
    pub task_count: u64,
    pub average_task_duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorTransferInfo {
    pub processor_id: Option<String>,
    pub processor_name: Option<String>,
    pub processor_type: Option<String>,
    pub input: TransferMetrics,
    pub output: TransferMetrics,
    pub timing: ProcessorTimingInfo,
}

/// Operational summary of one process group snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupAnalysis {
    pub process_group_id: String,
    pub process_group_name: Option<String>,
    /// Connections with at least one queued flow-file.
    pub queue_connections: Vec<QueueConnectionInfo>,
    /// Processors whose run status is `STOPPED`.
    pub stopped_processors: Vec<ProcessorStateInfo>,
    /// Processors neither running nor stopped (invalid, disabled, validating).
    pub not_running_processors: Vec<ProcessorStateInfo>,
    pub processor_transfers: Vec<ProcessorTransferInfo>,
    pub group_total_transfer: TransferMetrics,
}
