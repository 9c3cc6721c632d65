//! Replication of a project's base snapshot into every member workspace.
//!
//! Snapshot artifacts are content-addressed and immutable: a document that
//! already exists at the target is never overwritten, whatever its bytes.

use std::path::Path;

use anyhow::Result;

use crate::docstore;
use crate::index::RegistryIndex;
use crate::layout;
use crate::model::{ProjectConfig, SnapshotMeta};
use crate::repair::{self, Summary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Replication {
    /// Source metadata or manifest unusable; nothing trustworthy to copy.
    SourceUnusable,
    /// Both artifacts already present at the target; no write performed.
    AlreadyPresent,
    /// At least one artifact was freshly written.
    Copied,
}

/// Copies each project's resolved base snapshot (metadata + manifest) from
/// the base workspace's store into every member store that lacks it.
///
/// Runs after parent repair and re-reads each parent config so it sees the
/// just-written base pointers. Projects whose parent config still lacks a
/// base pair, or whose base workspace is unknown or pathless, are skipped.
pub fn replicate_base_snapshots(index: &RegistryIndex, summary: &mut Summary) -> Result<()> {
    for project in index.projects() {
        if project.project_id.is_empty() {
            continue;
        }
        let Some(root) = repair::project_root(index, project) else {
            continue;
        };
        let Some(parent) = docstore::load::<ProjectConfig>(&layout::marker_path(&root))? else {
            continue;
        };
        let (Some(base_id), Some(base_ws_id)) = (parent.base_snapshot(), parent.base_workspace())
        else {
            continue;
        };
        let Some(base_idx) = index.workspace_by_id(base_ws_id) else {
            continue;
        };
        let Some(base_root) = index.workspace(base_idx).root() else {
            continue;
        };

        for &idx in index.project_workspaces(&project.project_id) {
            let Some(target_root) = index.workspace(idx).root() else {
                continue;
            };
            if copy_base_snapshot(base_root, target_root, base_id)? == Replication::Copied {
                summary.copied_snapshots += 1;
            }
        }
    }
    Ok(())
}

/// Copies one snapshot's metadata and manifest from `source_root` into
/// `target_root`, creating store directories as needed. The base workspace
/// replicating onto itself is a harmless no-op. An unusable source (missing
/// metadata, no manifest hash, or no manifest document) is not an error;
/// there is nothing trustworthy to copy, so the target is left alone.
fn copy_base_snapshot(
    source_root: &Path,
    target_root: &Path,
    snapshot_id: &str,
) -> Result<Replication> {
    let Some(meta) =
        docstore::load::<SnapshotMeta>(&layout::snapshot_meta_path(source_root, snapshot_id))?
    else {
        return Ok(Replication::SourceUnusable);
    };
    let Some(manifest_hash) = meta.manifest_hash() else {
        return Ok(Replication::SourceUnusable);
    };
    let Some(manifest_bytes) =
        docstore::read_bytes(&layout::manifest_path(source_root, manifest_hash))?
    else {
        return Ok(Replication::SourceUnusable);
    };

    let mut wrote = false;

    let target_meta = layout::snapshot_meta_path(target_root, snapshot_id);
    if !target_meta.exists() {
        docstore::save(&target_meta, &meta)?;
        wrote = true;
    }

    // Manifests are copied byte-for-byte under their hash.
    let target_manifest = layout::manifest_path(target_root, manifest_hash);
    if docstore::write_bytes_if_absent(&target_manifest, &manifest_bytes)? {
        wrote = true;
    }

    Ok(if wrote {
        Replication::Copied
    } else {
        Replication::AlreadyPresent
    })
}
