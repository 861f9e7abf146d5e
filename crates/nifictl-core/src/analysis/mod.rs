// ── Flow analysis ──
//
// Pure transformation of a `StatusSnapshot` into operator-facing insight:
// queue backlog, stalled processors, and per-processor transfer volumes
// with unit scaling. No I/O happens here. Missing counters read as zero.

mod duration;
mod units;

pub use duration::{format_nanos, timing};
pub use units::{transfer_metrics, unit_for};

use tracing::{debug, info};

use nifictl_api::FieldPolicy;
use nifictl_api::models::ProcessGroupStatusEntity;

use crate::convert::snapshot_from_entity;
use crate::error::CoreError;
use crate::model::{
    ConnectionStatus, GroupCounters, ProcessGroupAnalysis, ProcessorStateInfo, ProcessorStatus,
    ProcessorTransferInfo, QueueConnectionInfo, RunState, StatusSnapshot, TransferMetrics,
};

/// `process_group_id` reported by [`analyze_json`] when the body names no
/// group id at either the top level or the aggregate snapshot.
pub const UNIDENTIFIED_GROUP_ID: &str = "unidentified";

/// Derive the analysis for one snapshot.
pub fn analyze(snapshot: &StatusSnapshot) -> ProcessGroupAnalysis {
    let queue_connections = snapshot
        .connections
        .iter()
        .filter(|c| c.flow_files_queued.unwrap_or(0) > 0)
        .map(queue_info)
        .collect();

    let stopped_processors = snapshot
        .processors
        .iter()
        .filter(|p| is_stopped(p))
        .map(state_info)
        .collect();

    let not_running_processors = snapshot
        .processors
        .iter()
        .filter(|p| !is_running(p) && !is_stopped(p))
        .map(state_info)
        .collect();

    let processor_transfers = snapshot.processors.iter().map(transfer_info).collect();

    ProcessGroupAnalysis {
        process_group_id: snapshot.id.clone(),
        process_group_name: snapshot.name.clone(),
        queue_connections,
        stopped_processors,
        not_running_processors,
        processor_transfers,
        group_total_transfer: group_total(&snapshot.totals),
    }
}

/// Decode a raw status response body and analyze it.
///
/// A body missing the required connection or processor lists fails with
/// `CoreError::Parse`. Under `FieldPolicy::RejectUnknown` an unrecognized
/// field fails the same way. A body without any group id is reported as
/// [`UNIDENTIFIED_GROUP_ID`].
pub fn analyze_json(body: &str, policy: FieldPolicy) -> Result<ProcessGroupAnalysis, CoreError> {
    let entity: ProcessGroupStatusEntity = nifictl_api::parse::decode(body, policy)?;
    let snapshot = snapshot_from_entity(entity, UNIDENTIFIED_GROUP_ID);
    Ok(analyze(&snapshot))
}

/// Log the headline numbers of an analysis.
pub fn log_summary(analysis: &ProcessGroupAnalysis) {
    info!(
        process_group = %analysis.process_group_id,
        name = analysis.process_group_name.as_deref().unwrap_or(""),
        queued_connections = analysis.queue_connections.len(),
        stopped = analysis.stopped_processors.len(),
        not_running = analysis.not_running_processors.len(),
        total = %analysis.group_total_transfer.formatted_size,
        "process group analysis"
    );
    for transfer in &analysis.processor_transfers {
        debug!(
            processor = transfer.processor_name.as_deref().unwrap_or(""),
            input = %transfer.input.formatted_size,
            output = %transfer.output.formatted_size,
            time = %transfer.timing.formatted_processing_time,
            "processor transfer"
        );
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn run_status_is(p: &ProcessorStatus, state: RunState) -> bool {
    p.run_status.as_deref().is_some_and(|s| state.matches(s))
}

fn is_stopped(p: &ProcessorStatus) -> bool {
    run_status_is(p, RunState::Stopped)
}

fn is_running(p: &ProcessorStatus) -> bool {
    run_status_is(p, RunState::Running)
}

fn queue_info(c: &ConnectionStatus) -> QueueConnectionInfo {
    QueueConnectionInfo {
        connection_id: c.id.clone(),
        source_name: c.source_name.clone(),
        destination_name: c.destination_name.clone(),
        queued_count: c.flow_files_queued.unwrap_or(0),
        queued_size: c.queued_size.clone(),
    }
}

fn state_info(p: &ProcessorStatus) -> ProcessorStateInfo {
    ProcessorStateInfo {
        processor_id: p.id.clone(),
        processor_name: p.name.clone(),
        processor_type: p.processor_type.clone(),
        run_status: p.run_status.clone(),
    }
}

fn transfer_info(p: &ProcessorStatus) -> ProcessorTransferInfo {
    ProcessorTransferInfo {
        processor_id: p.id.clone(),
        processor_name: p.name.clone(),
        processor_type: p.processor_type.clone(),
        input: transfer_metrics(p.flow_files_in.unwrap_or(0), p.bytes_in.unwrap_or(0)),
        output: transfer_metrics(p.flow_files_out.unwrap_or(0), p.bytes_out.unwrap_or(0)),
        timing: timing(
            p.tasks_duration_nanos.unwrap_or(0),
            p.task_count.unwrap_or(0),
        ),
    }
}

fn group_total(c: &GroupCounters) -> TransferMetrics {
    let pairs = [
        (c.flow_files_in, c.bytes_in),
        (c.flow_files_out, c.bytes_out),
        (c.flow_files_transferred, c.bytes_transferred),
        (c.flow_files_received, c.bytes_received),
        (c.flow_files_sent, c.bytes_sent),
    ];
    let (files, bytes) = pairs.iter().fold((0u64, 0u64), |(f, b), (files, bytes)| {
        (
            f.saturating_add(files.unwrap_or(0)),
            b.saturating_add(bytes.unwrap_or(0)),
        )
    });
    transfer_metrics(files, bytes)
}
