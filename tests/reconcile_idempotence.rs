mod common;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use baseline::repair::reconcile;
use common::{WorkspaceFixture, project_entry_at, workspace_entry, write_json, write_registry};

#[test]
fn second_run_writes_nothing() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let proj_root = tmp.path().join("proj");

    // w1 is fully consistent and holds the base snapshot's content.
    let ws1_root = proj_root.join("ws1");
    let ws1 = WorkspaceFixture::init(&ws1_root)?;
    ws1.write_config(&json!({ "base_snapshot_id": "s1" }))?;
    ws1.write_snapshot_meta("s1", Some("2024-01-01T00:00:00Z"), Some("h1"))?;
    ws1.write_manifest("h1", b"manifest-one")?;

    // w2 still carries the legacy fork pointer.
    let ws2_root = proj_root.join("ws2");
    let ws2 = WorkspaceFixture::init(&ws2_root)?;
    ws2.write_config(&json!({ "fork_snapshot_id": "abc" }))?;

    // w3 has snapshots on disk but an empty config.
    let ws3_root = proj_root.join("ws3");
    let ws3 = WorkspaceFixture::init(&ws3_root)?;
    ws3.write_config(&json!({}))?;
    ws3.write_snapshot_meta("s3", Some("2024-03-01T00:00:00Z"), None)?;

    write_json(&proj_root.join("baseline.json"), &json!({}))?;

    let registry_path = write_registry(
        tmp.path(),
        vec![
            workspace_entry("w1", "p1", &ws1_root),
            workspace_entry("w2", "p1", &ws2_root),
            workspace_entry("w3", "p1", &ws3_root),
        ],
        vec![project_entry_at("p1", &proj_root)],
    )?;

    let first = reconcile(&registry_path)?.context("registry should exist")?;
    assert_eq!(first.updated_configs, 2);
    assert_eq!(first.updated_registry_entries, 3);
    assert_eq!(first.updated_parent_configs, 1);
    assert_eq!(first.copied_snapshots, 2);

    let before = capture_tree(tmp.path())?;

    let second = reconcile(&registry_path)?.context("registry should exist")?;
    assert_eq!(second.updated_configs, 0);
    assert_eq!(second.updated_registry_entries, 0);
    assert_eq!(second.updated_parent_configs, 0);
    assert_eq!(second.copied_snapshots, 0);

    let after = capture_tree(tmp.path())?;
    assert_eq!(before, after);
    Ok(())
}

#[test]
fn workspace_with_no_snapshot_data_gets_no_fabricated_link() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let proj_root = tmp.path().join("proj");

    let ws1_root = proj_root.join("ws1");
    let ws1 = WorkspaceFixture::init(&ws1_root)?;
    ws1.write_config(&json!({ "base_snapshot_id": "s1" }))?;
    ws1.write_snapshot_meta("s1", Some("2024-01-01T00:00:00Z"), Some("h1"))?;
    ws1.write_manifest("h1", b"manifest-one")?;

    // w2 has no base pointer, no legacy pointer, and an empty snapshots dir.
    let ws2_root = proj_root.join("ws2");
    let ws2 = WorkspaceFixture::init(&ws2_root)?;
    ws2.write_config(&json!({}))?;

    write_json(
        &proj_root.join("baseline.json"),
        &json!({ "base_snapshot_id": "s1", "base_workspace_id": "w1" }),
    )?;

    let mut entry1 = workspace_entry("w1", "p1", &ws1_root);
    entry1["base_snapshot_id"] = json!("s1");
    let registry_path = write_registry(
        tmp.path(),
        vec![entry1, workspace_entry("w2", "p1", &ws2_root)],
        vec![project_entry_at("p1", &proj_root)],
    )?;

    let summary = reconcile(&registry_path)?.context("registry should exist")?;
    assert_eq!(summary.updated_configs, 0);
    assert_eq!(summary.updated_registry_entries, 0);
    assert_eq!(summary.updated_parent_configs, 0);

    // Base content is replicated into w2, but no base link is invented.
    assert_eq!(summary.copied_snapshots, 1);
    assert!(ws2.snapshot_meta_path("s1").exists());
    assert_eq!(ws2.config()?, json!({}));
    assert_eq!(ws1.config()?, json!({ "base_snapshot_id": "s1" }));
    Ok(())
}

#[test]
fn missing_registry_is_reported_as_absent() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let outcome = reconcile(&tmp.path().join("registry.json"))?;
    assert!(outcome.is_none());
    Ok(())
}

fn capture_tree(root: &Path) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut out = BTreeMap::new();
    capture_dir(root, Path::new(""), &mut out)?;
    Ok(out)
}

fn capture_dir(root: &Path, rel: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) -> Result<()> {
    let dir = root.join(rel);
    for entry in fs::read_dir(&dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name
            .into_string()
            .map_err(|_| anyhow::anyhow!("non-utf8 filename"))?;
        let child_rel = rel.join(&name);

        if entry.file_type()?.is_dir() {
            capture_dir(root, &child_rel, out)?;
            continue;
        }
        let bytes = fs::read(root.join(&child_rel))?;
        out.insert(child_rel, bytes);
    }
    Ok(())
}
