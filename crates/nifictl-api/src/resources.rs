// Resource listing endpoint

use crate::client::NifiClient;
use crate::error::Error;
use crate::models::{ResourceDto, ResourcesEntity};

impl NifiClient {
    /// List every resource the current user can see.
    ///
    /// `GET /resources` -- a flat list of `{identifier, name}` pairs covering
    /// process groups, processors and every other securable NiFi object.
    pub async fn list_resources(&self) -> Result<Vec<ResourceDto>, Error> {
        let url = self.url(&["resources"])?;
        let entity: ResourcesEntity = self.get(url).await?;
        Ok(entity.resources)
    }
}
