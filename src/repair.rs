//! Base-link reconciliation over the global registry.
//!
//! Three ordered passes, each read-then-conditionally-write: a pass that
//! finds nothing missing writes nothing, so re-running after an interrupted
//! run converges to the same end state without clobbering anything.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::docstore;
use crate::index::RegistryIndex;
use crate::layout;
use crate::locate;
use crate::model::{ProjectConfig, ProjectEntry, Registry, WorkspaceConfig};
use crate::replicate;
use crate::resolve::{self, Preference};

/// Counts of repairs performed during one reconciliation run. Informational
/// only; a fully consistent tree reports all zeros.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct Summary {
    pub updated_configs: u64,
    pub updated_registry_entries: u64,
    pub updated_parent_configs: u64,
    pub copied_snapshots: u64,
}

/// Runs the full reconciliation against the registry at `registry_path`.
///
/// Returns `None` when no registry document exists there; a machine with no
/// registry has nothing to repair. The registry itself is persisted at most
/// once, and only if the per-workspace pass filled in a cached base pointer.
pub fn reconcile(registry_path: &Path) -> Result<Option<Summary>> {
    let Some(registry) = docstore::load::<Registry>(registry_path)? else {
        return Ok(None);
    };

    let mut index = RegistryIndex::new(registry);
    let mut summary = Summary::default();

    repair_workspace_configs(&mut index, &mut summary)?;
    repair_parent_configs(&index, &mut summary)?;
    if summary.updated_registry_entries > 0 {
        docstore::save(registry_path, index.registry())?;
    }
    replicate::replicate_base_snapshots(&index, &mut summary)?;

    Ok(Some(summary))
}

/// Per-workspace pass: repairs each workspace's local config, then refreshes
/// the registry's cached base pointer from it. The local config is
/// authoritative; the cache is only ever filled in, never cleared.
pub fn repair_workspace_configs(index: &mut RegistryIndex, summary: &mut Summary) -> Result<()> {
    for idx in 0..index.workspaces().len() {
        let Some(root) = index.workspace(idx).root().map(Path::to_path_buf) else {
            continue;
        };
        let cfg_path = layout::config_path(&root);
        let Some(mut cfg) = docstore::load::<WorkspaceConfig>(&cfg_path)? else {
            continue;
        };

        let mut changed = false;

        // Older configs recorded the base under `fork_snapshot_id`.
        if cfg.base_snapshot().is_none() && cfg.fork_snapshot().is_some() {
            cfg.base_snapshot_id = cfg.fork_snapshot_id.take();
            changed = true;
        }

        if cfg.base_snapshot().is_none() {
            // A workspace's true origin is its oldest known snapshot, absent
            // better information.
            let picked =
                resolve::pick_snapshot_id(&layout::snapshots_dir(&root), Preference::Earliest)?;
            if let Some(snapshot_id) = picked {
                // No recorded current state means the workspace sits at its base.
                if cfg.current_snapshot().is_none() {
                    cfg.current_snapshot_id = Some(snapshot_id.clone());
                }
                cfg.base_snapshot_id = Some(snapshot_id);
                changed = true;
            }
        }

        if changed {
            docstore::save(&cfg_path, &cfg)?;
            summary.updated_configs += 1;
        }

        if let Some(base_id) = cfg.base_snapshot()
            && index.workspace(idx).base_snapshot().is_none()
        {
            index.workspace_mut(idx).base_snapshot_id = Some(base_id.to_string());
            summary.updated_registry_entries += 1;
        }
    }
    Ok(())
}

/// Per-project pass: fills in a missing parent-level base pointer. A parent
/// config that already names a base is left untouched.
pub fn repair_parent_configs(index: &RegistryIndex, summary: &mut Summary) -> Result<()> {
    for project in index.projects() {
        if project.project_id.is_empty() {
            continue;
        }
        let Some(root) = project_root(index, project) else {
            continue;
        };
        let marker = layout::marker_path(&root);
        let Some(mut parent) = docstore::load::<ProjectConfig>(&marker)? else {
            continue;
        };
        if parent.base_snapshot().is_some() {
            continue;
        }

        let Some((workspace_idx, snapshot_id)) = select_base(index, project, &parent)? else {
            continue;
        };

        parent.base_snapshot_id = Some(snapshot_id);
        parent.base_workspace_id = Some(index.workspace(workspace_idx).workspace_id.clone());
        docstore::save(&marker, &parent)?;
        summary.updated_parent_configs += 1;
    }
    Ok(())
}

/// Chooses the (workspace, snapshot) pair a parent config should point at.
///
/// A `base_workspace_id` already named by the parent wins when it resolves
/// to a known workspace; there is no fallback to scanning if that workspace
/// yields no snapshot. Otherwise the project's workspaces are scanned in
/// registry order and the first one with any resolvable base is taken.
fn select_base(
    index: &RegistryIndex,
    project: &ProjectEntry,
    parent: &ProjectConfig,
) -> Result<Option<(usize, String)>> {
    if let Some(hint) = parent.base_workspace()
        && let Some(idx) = index.workspace_by_id(hint)
    {
        let ws = index.workspace(idx);
        if let Some(base_id) = ws.base_snapshot() {
            return Ok(Some((idx, base_id.to_string())));
        }
        let picked = match ws.root() {
            Some(root) => {
                resolve::pick_snapshot_id(&layout::snapshots_dir(root), Preference::Earliest)?
            }
            None => None,
        };
        return Ok(picked.map(|id| (idx, id)));
    }

    for &idx in index.project_workspaces(&project.project_id) {
        let ws = index.workspace(idx);
        let Some(root) = ws.root() else {
            continue;
        };
        let base_id = match ws.base_snapshot() {
            Some(id) => Some(id.to_string()),
            None => resolve::pick_snapshot_id(&layout::snapshots_dir(root), Preference::Earliest)?,
        };
        if let Some(id) = base_id {
            // First workspace that resolves wins; registry order is the
            // determinism contract, not "best candidate".
            return Ok(Some((idx, id)));
        }
    }
    Ok(None)
}

/// Resolves a project's root directory: the recorded `project_path` when a
/// marker document exists there, else the first workspace (registry order)
/// whose path leads to a marker by walking upward.
pub(crate) fn project_root(index: &RegistryIndex, project: &ProjectEntry) -> Option<PathBuf> {
    if let Some(path) = project.root()
        && layout::marker_path(path).exists()
    {
        return Some(path.to_path_buf());
    }
    for &idx in index.project_workspaces(&project.project_id) {
        let Some(root) = index.workspace(idx).root() else {
            continue;
        };
        if let Some(found) = locate::find_project_root(root) {
            return Some(found);
        }
    }
    None
}
