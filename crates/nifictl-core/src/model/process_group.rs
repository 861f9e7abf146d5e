// ── Process group and processor domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Desired scheduling state for a process group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RunState {
    Running,
    Stopped,
}

impl RunState {
    /// Whether a reported run status (any case) names this state.
    pub fn matches(self, run_status: &str) -> bool {
        run_status.eq_ignore_ascii_case(&self.to_string())
    }
}

/// A process group as returned by `GET /process-groups/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessGroup {
    pub id: String,
    pub name: Option<String>,
    pub parent_group_id: Option<String>,
    pub comments: Option<String>,
    pub revision: Option<u64>,
    pub running_count: u32,
    pub stopped_count: u32,
    pub invalid_count: u32,
    pub disabled_count: u32,
}

/// A processor as returned by `GET /processors/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processor {
    pub id: String,
    pub name: Option<String>,
    pub processor_type: Option<String>,
    pub state: Option<String>,
    pub parent_group_id: Option<String>,
    pub revision: Option<u64>,
}
