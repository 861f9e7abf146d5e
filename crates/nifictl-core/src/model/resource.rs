// ── Resource domain types ──
//
// NiFi's `/resources` listing is flat: every securable object appears as an
// `{identifier, name}` pair whose identifier is a path such as
// `/process-groups/{id}` or `/policies/processors/{id}`. The kind, id and
// parent group are all derived from that path.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

const PROCESS_GROUP_PREFIX: &str = "/process-groups/";
const PROCESSOR_PREFIX: &str = "/processors/";

/// Identifier prefixes that never denote a component, even if a component
/// prefix appears further along the path.
const EXCLUDED_PREFIXES: [&str; 4] = ["/data/", "/policies/", "/operation/", "/provenance-data/"];

/// What a resource identifier points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ResourceKind {
    ProcessGroup,
    Processor,
    Other,
}

impl ResourceKind {
    /// Classify an identifier. Total: every string maps to exactly one kind.
    ///
    /// Rules apply in order and the first match wins: process-group prefix,
    /// then processor prefix, otherwise `Other`. Both component rules are
    /// subject to the excluded prefixes.
    pub fn classify(identifier: &str) -> Self {
        if EXCLUDED_PREFIXES.iter().any(|p| identifier.starts_with(p)) {
            return Self::Other;
        }
        if identifier.starts_with(PROCESS_GROUP_PREFIX) {
            Self::ProcessGroup
        } else if identifier.starts_with(PROCESSOR_PREFIX) {
            Self::Processor
        } else {
            Self::Other
        }
    }

    fn prefix(self) -> Option<&'static str> {
        match self {
            Self::ProcessGroup => Some(PROCESS_GROUP_PREFIX),
            Self::Processor => Some(PROCESSOR_PREFIX),
            Self::Other => None,
        }
    }
}

/// One entry of the resource catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub identifier: String,
    pub name: String,
    pub kind: ResourceKind,
    /// Component id for process groups and processors.
    pub id: Option<String>,
    /// Innermost `/process-groups/{id}/` segment that has more path after it.
    pub parent_group_id: Option<String>,
}

impl Resource {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let kind = ResourceKind::classify(&identifier);
        let id = kind
            .prefix()
            .and_then(|prefix| extract_id(&identifier, prefix));
        let parent_group_id = parent_group_id(&identifier);
        Self {
            identifier,
            name: name.into(),
            kind,
            id,
            parent_group_id,
        }
    }

    pub fn is_process_group(&self) -> bool {
        self.kind == ResourceKind::ProcessGroup
    }

    pub fn is_processor(&self) -> bool {
        self.kind == ResourceKind::Processor
    }

    /// Whether the identifier places this resource under `group_id`.
    ///
    /// Plain substring match on `/process-groups/{group_id}/`, not a
    /// structural parent pointer.
    pub fn is_under_group(&self, group_id: &str) -> bool {
        self.identifier
            .contains(&format!("{PROCESS_GROUP_PREFIX}{group_id}/"))
    }
}

/// Segment after `prefix`, up to the next `/`.
fn extract_id(identifier: &str, prefix: &str) -> Option<String> {
    let rest = identifier.strip_prefix(prefix)?;
    let id = rest.split('/').next().unwrap_or(rest);
    (!id.is_empty()).then(|| id.to_owned())
}

fn parent_group_id(identifier: &str) -> Option<String> {
    identifier
        .rmatch_indices(PROCESS_GROUP_PREFIX)
        .find_map(|(idx, _)| {
            let rest = &identifier[idx + PROCESS_GROUP_PREFIX.len()..];
            let (id, tail) = rest.split_once('/')?;
            (!id.is_empty() && !tail.is_empty()).then(|| id.to_owned())
        })
}
