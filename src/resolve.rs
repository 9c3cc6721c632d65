use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::docstore;
use crate::layout;
use crate::model::SnapshotMeta;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preference {
    Earliest,
    Latest,
}

/// Picks a snapshot id from a directory of `*.meta.json` records.
///
/// Candidates are ordered by creation time; records whose timestamp is
/// missing or unparseable stay candidates but sort after every dated one.
/// Metadata that fails to parse, or lacks an `id`, is skipped. A missing
/// directory, or one with no usable records, yields `None`; callers treat
/// that as "no repair possible here", not as a failure.
pub fn pick_snapshot_id(snapshots_dir: &Path, prefer: Preference) -> Result<Option<String>> {
    let entries = match fs::read_dir(snapshots_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("read snapshots dir {}", snapshots_dir.display()));
        }
    };

    let mut candidates: Vec<(String, Option<OffsetDateTime>)> = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("read snapshots dir entry in {}", snapshots_dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.ends_with(layout::SNAPSHOT_META_SUFFIX) {
            continue;
        }
        let Some(meta) = docstore::load::<SnapshotMeta>(&entry.path())? else {
            continue;
        };
        let Some(id) = meta.id() else {
            continue;
        };
        let created_at = meta
            .created_at()
            .and_then(|ts| OffsetDateTime::parse(ts, &Rfc3339).ok());
        candidates.push((id.to_string(), created_at));
    }

    if candidates.is_empty() {
        return Ok(None);
    }

    // Stable: undated records keep their relative order after all dated ones.
    candidates.sort_by_key(|(_, ts)| (ts.is_none(), *ts));

    let picked = match prefer {
        Preference::Earliest => candidates.first(),
        Preference::Latest => candidates.last(),
    };
    Ok(picked.map(|(id, _)| id.clone()))
}
