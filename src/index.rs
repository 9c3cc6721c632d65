use std::collections::HashMap;

use crate::model::{ProjectEntry, Registry, WorkspaceEntry};

/// In-memory view of the global registry with derived lookup indices.
///
/// Owns the registry document and indexes workspaces by id and by owning
/// project. Both indices refer to records by position in the registry's own
/// list, so an update made during one pass is seen by every later lookup.
pub struct RegistryIndex {
    registry: Registry,
    by_workspace_id: HashMap<String, usize>,
    by_project_id: HashMap<String, Vec<usize>>,
}

impl RegistryIndex {
    pub fn new(registry: Registry) -> Self {
        let mut by_workspace_id = HashMap::new();
        let mut by_project_id: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, ws) in registry.workspaces.iter().enumerate() {
            if !ws.workspace_id.is_empty() {
                // Ids are expected unique; on a duplicate the later record wins.
                by_workspace_id.insert(ws.workspace_id.clone(), idx);
            }
            if !ws.project_id.is_empty() {
                by_project_id
                    .entry(ws.project_id.clone())
                    .or_default()
                    .push(idx);
            }
        }
        Self {
            registry,
            by_workspace_id,
            by_project_id,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn workspaces(&self) -> &[WorkspaceEntry] {
        &self.registry.workspaces
    }

    pub fn workspace(&self, idx: usize) -> &WorkspaceEntry {
        &self.registry.workspaces[idx]
    }

    pub fn workspace_mut(&mut self, idx: usize) -> &mut WorkspaceEntry {
        &mut self.registry.workspaces[idx]
    }

    pub fn projects(&self) -> &[ProjectEntry] {
        &self.registry.projects
    }

    pub fn workspace_by_id(&self, workspace_id: &str) -> Option<usize> {
        self.by_workspace_id.get(workspace_id).copied()
    }

    /// Indices of the project's workspaces, preserving registry order.
    pub fn project_workspaces(&self, project_id: &str) -> &[usize] {
        self.by_project_id
            .get(project_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
