// Process group endpoints

use tracing::debug;

use crate::client::NifiClient;
use crate::error::Error;
use crate::models::{ProcessGroupEntity, RunStatusRequest};

impl NifiClient {
    /// Fetch a single process group entity.
    ///
    /// `GET /process-groups/{id}`
    pub async fn get_process_group(&self, id: &str) -> Result<ProcessGroupEntity, Error> {
        let url = self.url(&["process-groups", id])?;
        self.get(url).await
    }

    /// Schedule or unschedule every component in a process group.
    ///
    /// `PUT /process-groups/{id}/run-status` with `state` set to `RUNNING`
    /// or `STOPPED`. NiFi treats a transition to the current state as a
    /// no-op and answers with the unchanged entity.
    pub async fn update_run_status(
        &self,
        id: &str,
        state: &str,
    ) -> Result<ProcessGroupEntity, Error> {
        let url = self.url(&["process-groups", id, "run-status"])?;
        let body = RunStatusRequest {
            id: id.to_owned(),
            state: state.to_owned(),
            disconnected_node_acknowledged: false,
        };
        debug!(process_group = id, state, "updating run status");
        self.put(url, &body).await
    }
}
