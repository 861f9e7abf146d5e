// ── Status snapshot domain types ──
//
// A point-in-time capture of one process group's telemetry. Counters stay
// optional: NiFi omits values it has not computed, and consumers decide
// how to treat the gap (the analysis engine reads them as zero).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate status of one process group, as captured by a single fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub id: String,
    pub name: Option<String>,
    /// Server-side refresh time as NiFi formats it (e.g. `10:15:00 UTC`).
    pub stats_last_refreshed: Option<String>,
    /// When this client received the snapshot.
    pub fetched_at: DateTime<Utc>,
    pub connections: Vec<ConnectionStatus>,
    pub processors: Vec<ProcessorStatus>,
    pub child_groups: Vec<ChildGroupStatus>,
    pub remote_groups: Vec<RemoteGroupStatus>,
    pub input_ports: Vec<PortStatus>,
    pub output_ports: Vec<PortStatus>,
    pub totals: GroupCounters,
}

impl StatusSnapshot {
    /// Look up a processor's status entry by processor id.
    pub fn processor(&self, processor_id: &str) -> Option<&ProcessorStatus> {
        self.processors
            .iter()
            .find(|p| p.id.as_deref() == Some(processor_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounters {
    pub flow_files_in: Option<u64>,
    pub bytes_in: Option<u64>,
    pub flow_files_out: Option<u64>,
    pub bytes_out: Option<u64>,
    pub flow_files_transferred: Option<u64>,
    pub bytes_transferred: Option<u64>,
    pub flow_files_received: Option<u64>,
    pub bytes_received: Option<u64>,
    pub flow_files_sent: Option<u64>,
    pub bytes_sent: Option<u64>,
    pub flow_files_queued: Option<u64>,
    pub bytes_queued: Option<u64>,
    pub bytes_read: Option<u64>,
    pub bytes_written: Option<u64>,
    pub active_thread_count: Option<u32>,
    pub terminated_thread_count: Option<u32>,
    pub processing_nanos: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub id: Option<String>,
    pub name: Option<String>,
    pub source_name: Option<String>,
    pub destination_name: Option<String>,
    pub flow_files_in: Option<u64>,
    pub bytes_in: Option<u64>,
    pub flow_files_out: Option<u64>,
    pub bytes_out: Option<u64>,
    pub flow_files_queued: Option<u64>,
    pub bytes_queued: Option<u64>,
    /// Display string from NiFi, e.g. `"1,204 (2.5 MB)"`.
    pub queued: Option<String>,
    pub queued_size: Option<String>,
    pub percent_use_count: Option<u32>,
    pub percent_use_bytes: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorStatus {
    pub id: Option<String>,
    pub group_id: Option<String>,
    pub name: Option<String>,
    pub processor_type: Option<String>,
    pub run_status: Option<String>,
    pub flow_files_in: Option<u64>,
    pub bytes_in: Option<u64>,
    pub flow_files_out: Option<u64>,
    pub bytes_out: Option<u64>,
    pub bytes_read: Option<u64>,
    pub bytes_written: Option<u64>,
    pub task_count: Option<u64>,
    pub tasks_duration_nanos: Option<u64>,
    pub active_thread_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatus {
    pub id: Option<String>,
    pub name: Option<String>,
    pub run_status: Option<String>,
    pub flow_files_received: Option<u64>,
    pub bytes_received: Option<u64>,
    pub flow_files_sent: Option<u64>,
    pub bytes_sent: Option<u64>,
    pub active_thread_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGroupStatus {
    pub id: Option<String>,
    pub name: Option<String>,
    pub target_uri: Option<String>,
    pub transmission_status: Option<String>,
    pub flow_files_sent: Option<u64>,
    pub bytes_sent: Option<u64>,
    pub flow_files_received: Option<u64>,
    pub bytes_received: Option<u64>,
    pub active_thread_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildGroupStatus {
    pub id: Option<String>,
    pub name: Option<String>,
    pub counters: GroupCounters,
}
