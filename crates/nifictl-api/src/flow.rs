// Flow status endpoints

use crate::client::NifiClient;
use crate::error::Error;
use crate::models::ProcessGroupStatusEntity;

impl NifiClient {
    /// Fetch the aggregate status of a process group.
    ///
    /// `GET /flow/process-groups/{id}/status` -- returns the
    /// `processGroupStatus` wrapper with its `aggregateSnapshot`.
    pub async fn get_process_group_status(
        &self,
        id: &str,
    ) -> Result<ProcessGroupStatusEntity, Error> {
        let url = self.url(&["flow", "process-groups", id, "status"])?;
        self.get(url).await
    }
}
