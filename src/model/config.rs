use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::non_empty;

/// Per-workspace config document (`.baseline/config.json`). Only the
/// lineage pointers are modelled; anything else in the document survives a
/// repair run through `extra`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_snapshot_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_snapshot_id: Option<String>,

    /// Legacy name for the base pointer; migrated away on sight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork_snapshot_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkspaceConfig {
    pub fn base_snapshot(&self) -> Option<&str> {
        non_empty(&self.base_snapshot_id)
    }

    pub fn current_snapshot(&self) -> Option<&str> {
        non_empty(&self.current_snapshot_id)
    }

    pub fn fork_snapshot(&self) -> Option<&str> {
        non_empty(&self.fork_snapshot_id)
    }
}

/// Parent config document at a project root (`baseline.json`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project-level base, inherited by new workspaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_snapshot_id: Option<String>,

    /// Workspace whose store is authoritative for `base_snapshot_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_workspace_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectConfig {
    pub fn base_snapshot(&self) -> Option<&str> {
        non_empty(&self.base_snapshot_id)
    }

    pub fn base_workspace(&self) -> Option<&str> {
        non_empty(&self.base_workspace_id)
    }
}
