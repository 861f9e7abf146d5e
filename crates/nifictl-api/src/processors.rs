// Processor endpoints

use crate::client::NifiClient;
use crate::error::Error;
use crate::models::ProcessorEntity;

impl NifiClient {
    /// Fetch a single processor entity.
    ///
    /// `GET /processors/{id}`
    pub async fn get_processor(&self, id: &str) -> Result<ProcessorEntity, Error> {
        let url = self.url(&["processors", id])?;
        self.get(url).await
    }
}
