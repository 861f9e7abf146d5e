// ── Domain model ──
//
// Canonical types built from `nifictl_api` wire models (see `convert.rs`).
// Everything here is a plain value: request-scoped, immutable once built,
// serializable for CLI output.

pub mod analysis;
pub mod process_group;
pub mod resource;
pub mod status;

pub use analysis::{
    ProcessGroupAnalysis, ProcessorStateInfo, ProcessorTimingInfo, ProcessorTransferInfo,
    QueueConnectionInfo, SizeUnit, TransferMetrics,
};
pub use process_group::{ProcessGroup, Processor, RunState};
pub use resource::{Resource, ResourceKind};
pub use status::{
    ChildGroupStatus, ConnectionStatus, GroupCounters, PortStatus, ProcessorStatus,
    RemoteGroupStatus, StatusSnapshot,
};
