// ── Resource catalog ──
//
// Turns NiFi's flat resource listing into an indexed snapshot. A snapshot is
// rebuilt from scratch on every fetch and never patched; nothing is cached
// between calls, so every resolve below costs one `GET /resources`.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use nifictl_api::NifiClient;

use crate::error::CoreError;
use crate::model::{Resource, ResourceKind};

// ── CatalogSnapshot ──────────────────────────────────────────────────

/// One fetch of the resource listing plus derived indices.
///
/// Lookups that can match several entries (duplicate names, duplicate ids
/// across kinds) return the first one in listing order. That choice is
/// stable for a given snapshot and carries no meaning beyond it.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    resources: Vec<Resource>,
    by_id: IndexMap<String, usize>,
    by_name: IndexMap<String, usize>,
    by_kind: HashMap<ResourceKind, Vec<usize>>,
}

impl CatalogSnapshot {
    /// Build a snapshot, keeping listing order.
    pub fn new(resources: Vec<Resource>) -> Self {
        let mut by_id = IndexMap::new();
        let mut by_name = IndexMap::new();
        let mut by_kind: HashMap<ResourceKind, Vec<usize>> = HashMap::new();

        for (idx, resource) in resources.iter().enumerate() {
            if let Some(id) = &resource.id {
                by_id.entry(id.clone()).or_insert(idx);
            }
            by_name.entry(resource.name.clone()).or_insert(idx);
            by_kind.entry(resource.kind).or_default().push(idx);
        }

        Self {
            resources,
            by_id,
            by_name,
            by_kind,
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// All resources in listing order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }

    /// First resource whose extracted id equals `id`, of any kind.
    pub fn resolve_by_id(&self, id: &str) -> Option<&Resource> {
        self.by_id.get(id).map(|&idx| &self.resources[idx])
    }

    /// First resource named `name`.
    pub fn resolve_by_name(&self, name: &str) -> Option<&Resource> {
        self.by_name.get(name).map(|&idx| &self.resources[idx])
    }

    /// Resource with exactly this identifier path.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.identifier == identifier)
    }

    /// Resources whose identifier contains `/process-groups/{group_id}/`.
    pub fn children_of(&self, group_id: &str) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| r.is_under_group(group_id))
            .collect()
    }

    /// Resources of one kind, in listing order.
    pub fn by_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&idx| &self.resources[idx])
    }

    pub fn process_groups(&self) -> impl Iterator<Item = &Resource> {
        self.by_kind(ResourceKind::ProcessGroup)
    }

    pub fn processors(&self) -> impl Iterator<Item = &Resource> {
        self.by_kind(ResourceKind::Processor)
    }

    /// First process group with this id.
    pub fn process_group(&self, id: &str) -> Option<&Resource> {
        self.process_groups().find(|r| r.id.as_deref() == Some(id))
    }

    /// First resource of `kind` named `name`.
    pub fn find_by_name_and_kind(&self, name: &str, kind: ResourceKind) -> Option<&Resource> {
        self.by_kind(kind).find(|r| r.name == name)
    }
}

// ── ResourceCatalog ──────────────────────────────────────────────────

/// Fetches the resource listing and answers lookups against a fresh
/// snapshot each time.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    client: Arc<NifiClient>,
}

impl ResourceCatalog {
    pub fn new(client: Arc<NifiClient>) -> Self {
        Self { client }
    }

    /// Fetch and index the full resource listing.
    pub async fn fetch_all(&self) -> Result<CatalogSnapshot, CoreError> {
        let dtos = self.client.list_resources().await?;
        let snapshot = CatalogSnapshot::new(dtos.into_iter().map(Resource::from).collect());
        debug!(
            resources = snapshot.len(),
            process_groups = snapshot.process_groups().count(),
            processors = snapshot.processors().count(),
            "resource catalog fetched"
        );
        Ok(snapshot)
    }

    pub async fn resolve_by_id(&self, id: &str) -> Result<Option<Resource>, CoreError> {
        Ok(self.fetch_all().await?.resolve_by_id(id).cloned())
    }

    pub async fn resolve_by_name(&self, name: &str) -> Result<Option<Resource>, CoreError> {
        Ok(self.fetch_all().await?.resolve_by_name(name).cloned())
    }

    pub async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Resource>, CoreError> {
        Ok(self.fetch_all().await?.find_by_identifier(identifier).cloned())
    }

    pub async fn children_of(&self, group_id: &str) -> Result<Vec<Resource>, CoreError> {
        Ok(self
            .fetch_all()
            .await?
            .children_of(group_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// The process group with this id, if the listing contains one.
    pub async fn find_process_group(&self, id: &str) -> Result<Option<Resource>, CoreError> {
        Ok(self.fetch_all().await?.process_group(id).cloned())
    }

    pub async fn find_process_group_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Resource>, CoreError> {
        Ok(self
            .fetch_all()
            .await?
            .find_by_name_and_kind(name, ResourceKind::ProcessGroup)
            .cloned())
    }

    pub async fn find_processor_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Resource>, CoreError> {
        Ok(self
            .fetch_all()
            .await?
            .find_by_name_and_kind(name, ResourceKind::Processor)
            .cloned())
    }

    /// List process groups for background discovery.
    ///
    /// Unlike every other catalog read, this one tolerates a remote that is
    /// temporarily unavailable: transient failures, 5xx after retries, and a
    /// token refresh all yield an empty list ("nothing found now") with a
    /// warning. Authentication, client and parse errors still propagate.
    pub async fn discover_process_groups(&self) -> Result<Vec<Resource>, CoreError> {
        match self.fetch_all().await {
            Ok(snapshot) => Ok(snapshot.process_groups().cloned().collect()),
            Err(
                err @ (CoreError::Transient { .. }
                | CoreError::RemoteServer { .. }
                | CoreError::TokenRefreshed),
            ) => {
                warn!(error = %err, "process group discovery found nothing this round");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
