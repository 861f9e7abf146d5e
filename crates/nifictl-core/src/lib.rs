// nifictl-core: Domain layer between nifictl-api and consumers (CLI).
//
// Resource catalog with id/name resolution, idempotent run-state control,
// cancellable status streams, and the flow analysis engine.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod control;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{CatalogSnapshot, ResourceCatalog};
pub use config::{ConnectionConfig, Credentials, TlsVerification};
pub use control::ControlService;
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use status::{PollInterval, StatusService, StatusStream, TickFailurePolicy};

pub use model::{
    // Catalog
    Resource, ResourceKind,
    // Components
    ProcessGroup, Processor, RunState,
    // Status
    ConnectionStatus, GroupCounters, PortStatus, ProcessorStatus, StatusSnapshot,
    // Analysis
    ProcessGroupAnalysis, SizeUnit, TransferMetrics,
};

pub use nifictl_api::FieldPolicy;
