use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::non_empty;

/// The global registry document: every known workspace and project. Loaded
/// once per run, mutated in memory, persisted once if anything changed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub workspaces: Vec<WorkspaceEntry>,

    #[serde(default)]
    pub projects: Vec<ProjectEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    #[serde(default)]
    pub workspace_id: String,

    #[serde(default)]
    pub project_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Cached copy of the workspace's local base pointer. The local config
    /// is authoritative; this field is only ever filled in from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_snapshot_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkspaceEntry {
    pub fn root(&self) -> Option<&Path> {
        non_empty(&self.path).map(Path::new)
    }

    pub fn base_snapshot(&self) -> Option<&str> {
        non_empty(&self.base_snapshot_id)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub project_id: String,

    /// Canonical project root, when one exists. Projects without one are
    /// located through their workspaces instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectEntry {
    pub fn root(&self) -> Option<&Path> {
        non_empty(&self.project_path).map(Path::new)
    }
}
