// ── API-to-domain type conversions ──
//
// Bridges raw `nifictl_api` response types into canonical
// `nifictl_core::model` domain types. Status entities are unwrapped from
// their `{id, <kind>StatusSnapshot, canRead}` envelopes here so nothing
// downstream sees the wire nesting.

use chrono::Utc;

use nifictl_api::models::{
    ChildGroupStatusSnapshotEntity, ConnectionStatusSnapshotEntity, GroupCountersDto,
    PortStatusSnapshotEntity, ProcessGroupEntity, ProcessGroupStatusEntity, ProcessorEntity,
    ProcessorStatusSnapshotEntity, RemoteProcessGroupStatusSnapshotEntity, ResourceDto,
};

use crate::model::{
    ChildGroupStatus, ConnectionStatus, GroupCounters, PortStatus, ProcessGroup, Processor,
    ProcessorStatus, RemoteGroupStatus, Resource, StatusSnapshot,
};

// ── Resources ───────────────────────────────────────────────────────

impl From<ResourceDto> for Resource {
    fn from(dto: ResourceDto) -> Self {
        Resource::new(dto.identifier, dto.name)
    }
}

// ── Components ──────────────────────────────────────────────────────

impl From<ProcessGroupEntity> for ProcessGroup {
    fn from(entity: ProcessGroupEntity) -> Self {
        let component = entity.component.unwrap_or_default();
        ProcessGroup {
            id: entity.id,
            name: component.name,
            parent_group_id: component.parent_group_id,
            comments: component.comments,
            revision: entity.revision.and_then(|r| r.version),
            running_count: entity.running_count.unwrap_or(0),
            stopped_count: entity.stopped_count.unwrap_or(0),
            invalid_count: entity.invalid_count.unwrap_or(0),
            disabled_count: entity.disabled_count.unwrap_or(0),
        }
    }
}

impl From<ProcessorEntity> for Processor {
    fn from(entity: ProcessorEntity) -> Self {
        let component = entity.component.unwrap_or_default();
        Processor {
            id: entity.id,
            name: component.name,
            processor_type: component.processor_type,
            state: component.state,
            parent_group_id: component.parent_group_id,
            revision: entity.revision.and_then(|r| r.version),
        }
    }
}

// ── Status ──────────────────────────────────────────────────────────

impl From<GroupCountersDto> for GroupCounters {
    fn from(c: GroupCountersDto) -> Self {
        GroupCounters {
            flow_files_in: c.flow_files_in,
            bytes_in: c.bytes_in,
            flow_files_out: c.flow_files_out,
            bytes_out: c.bytes_out,
            flow_files_transferred: c.flow_files_transferred,
            bytes_transferred: c.bytes_transferred,
            flow_files_received: c.flow_files_received,
            bytes_received: c.bytes_received,
            flow_files_sent: c.flow_files_sent,
            bytes_sent: c.bytes_sent,
            flow_files_queued: c.flow_files_queued,
            bytes_queued: c.bytes_queued,
            bytes_read: c.bytes_read,
            bytes_written: c.bytes_written,
            active_thread_count: c.active_thread_count,
            terminated_thread_count: c.terminated_thread_count,
            processing_nanos: c.processing_nanos,
        }
    }
}

impl From<ConnectionStatusSnapshotEntity> for ConnectionStatus {
    fn from(entity: ConnectionStatusSnapshotEntity) -> Self {
        let s = entity.connection_status_snapshot;
        ConnectionStatus {
            id: s.id.or(entity.id),
            name: s.name,
            source_name: s.source_name,
            destination_name: s.destination_name,
            flow_files_in: s.flow_files_in,
            bytes_in: s.bytes_in,
            flow_files_out: s.flow_files_out,
            bytes_out: s.bytes_out,
            flow_files_queued: s.flow_files_queued,
            bytes_queued: s.bytes_queued,
            queued: s.queued,
            queued_size: s.queued_size,
            percent_use_count: s.percent_use_count,
            percent_use_bytes: s.percent_use_bytes,
        }
    }
}

impl From<ProcessorStatusSnapshotEntity> for ProcessorStatus {
    fn from(entity: ProcessorStatusSnapshotEntity) -> Self {
        let s = entity.processor_status_snapshot;
        ProcessorStatus {
            id: s.id.or(entity.id),
            group_id: s.group_id,
            name: s.name,
            processor_type: s.processor_type,
            run_status: s.run_status,
            flow_files_in: s.flow_files_in,
            bytes_in: s.bytes_in,
            flow_files_out: s.flow_files_out,
            bytes_out: s.bytes_out,
            bytes_read: s.bytes_read,
            bytes_written: s.bytes_written,
            task_count: s.task_count,
            tasks_duration_nanos: s.tasks_duration_nanos,
            active_thread_count: s.active_thread_count,
        }
    }
}

impl From<PortStatusSnapshotEntity> for PortStatus {
    fn from(entity: PortStatusSnapshotEntity) -> Self {
        let s = entity.port_status_snapshot;
        PortStatus {
            id: s.id.or(entity.id),
            name: s.name,
            run_status: s.run_status,
            flow_files_received: s.flow_files_received,
            bytes_received: s.bytes_received,
            flow_files_sent: s.flow_files_sent,
            bytes_sent: s.bytes_sent,
            active_thread_count: s.active_thread_count,
        }
    }
}

impl From<RemoteProcessGroupStatusSnapshotEntity> for RemoteGroupStatus {
    fn from(entity: RemoteProcessGroupStatusSnapshotEntity) -> Self {
        let s = entity.remote_process_group_status_snapshot;
        RemoteGroupStatus {
            id: s.id.or(entity.id),
            name: s.name,
            target_uri: s.target_uri,
            transmission_status: s.transmission_status,
            flow_files_sent: s.flow_files_sent,
            bytes_sent: s.bytes_sent,
            flow_files_received: s.flow_files_received,
            bytes_received: s.bytes_received,
            active_thread_count: s.active_thread_count,
        }
    }
}

impl From<ChildGroupStatusSnapshotEntity> for ChildGroupStatus {
    fn from(entity: ChildGroupStatusSnapshotEntity) -> Self {
        let s = entity.process_group_status_snapshot;
        ChildGroupStatus {
            id: s.id.or(entity.id),
            name: s.name,
            counters: s.counters.into(),
        }
    }
}

/// Build a snapshot stamped with the current time.
///
/// `requested_id` fills in the group id when NiFi leaves it out of both the
/// wrapper and the aggregate.
pub(crate) fn snapshot_from_entity(
    entity: ProcessGroupStatusEntity,
    requested_id: &str,
) -> StatusSnapshot {
    let status = entity.process_group_status;
    let aggregate = status.aggregate_snapshot;

    StatusSnapshot {
        id: status
            .id
            .or(aggregate.id)
            .unwrap_or_else(|| requested_id.to_owned()),
        name: status.name.or(aggregate.name),
        stats_last_refreshed: status.stats_last_refreshed,
        fetched_at: Utc::now(),
        connections: convert_all(aggregate.connection_status_snapshots),
        processors: convert_all(aggregate.processor_status_snapshots),
        child_groups: convert_all(aggregate.process_group_status_snapshots),
        remote_groups: convert_all(aggregate.remote_process_group_status_snapshots),
        input_ports: convert_all(aggregate.input_port_status_snapshots),
        output_ports: convert_all(aggregate.output_port_status_snapshots),
        totals: aggregate.counters.into(),
    }
}

fn convert_all<A, D: From<A>>(items: Vec<A>) -> Vec<D> {
    items.into_iter().map(D::from).collect()
}
