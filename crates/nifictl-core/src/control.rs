// ── Run-state control ──
//
// Start/stop transitions for process groups. The target is always resolved
// against a fresh catalog first: an id the listing does not know about
// fails with `NotFound` before any state-change request leaves the client.

use std::sync::Arc;

use tracing::{debug, info};

use nifictl_api::NifiClient;

use crate::catalog::ResourceCatalog;
use crate::error::CoreError;
use crate::model::{ProcessGroup, Processor, RunState};

#[derive(Debug, Clone)]
pub struct ControlService {
    client: Arc<NifiClient>,
    catalog: ResourceCatalog,
}

impl ControlService {
    pub fn new(client: Arc<NifiClient>, catalog: ResourceCatalog) -> Self {
        Self { client, catalog }
    }

    /// Move a process group to `desired`.
    ///
    /// Idempotent: asking for the state the group is already in succeeds
    /// and returns the unchanged entity. Transient failures have been
    /// retried by the transport; other 4xx come back verbatim as
    /// `RemoteClient`.
    pub async fn set_state(
        &self,
        process_group_id: &str,
        desired: RunState,
    ) -> Result<ProcessGroup, CoreError> {
        let Some(resource) = self.catalog.find_process_group(process_group_id).await? else {
            return Err(CoreError::process_group_not_found(process_group_id));
        };
        debug!(
            process_group = process_group_id,
            name = %resource.name,
            state = %desired,
            "resolved process group"
        );

        let entity = self
            .client
            .update_run_status(process_group_id, &desired.to_string())
            .await?;

        info!(
            process_group = process_group_id,
            name = %resource.name,
            state = %desired,
            "run state updated"
        );
        Ok(entity.into())
    }

    pub async fn start(&self, process_group_id: &str) -> Result<ProcessGroup, CoreError> {
        self.set_state(process_group_id, RunState::Running).await
    }

    pub async fn stop(&self, process_group_id: &str) -> Result<ProcessGroup, CoreError> {
        self.set_state(process_group_id, RunState::Stopped).await
    }

    /// Fetch a process group entity. A 404 becomes `NotFound`.
    pub async fn get_process_group(&self, id: &str) -> Result<ProcessGroup, CoreError> {
        match self.client.get_process_group(id).await {
            Ok(entity) => Ok(entity.into()),
            Err(e) if e.is_not_found() => Err(CoreError::process_group_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a processor entity. A 404 becomes `NotFound`.
    pub async fn get_processor(&self, id: &str) -> Result<Processor, CoreError> {
        match self.client.get_processor(id).await {
            Ok(entity) => Ok(entity.into()),
            Err(e) if e.is_not_found() => Err(CoreError::processor_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }
}
