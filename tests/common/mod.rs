#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Value, json};

/// Writes a JSON document the way the product does: pretty, trailing newline.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut bytes = serde_json::to_vec_pretty(value).context("serialize fixture")?;
    bytes.push(b'\n');
    fs::write(path, &bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

/// A workspace-local store laid out on disk for a test.
pub struct WorkspaceFixture {
    pub root: PathBuf,
}

impl WorkspaceFixture {
    pub fn init(root: &Path) -> Result<Self> {
        fs::create_dir_all(root.join(".baseline/snapshots")).context("create snapshots dir")?;
        fs::create_dir_all(root.join(".baseline/manifests")).context("create manifests dir")?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn write_config(&self, config: &Value) -> Result<()> {
        write_json(&self.root.join(".baseline/config.json"), config)
    }

    pub fn config(&self) -> Result<Value> {
        read_json(&self.root.join(".baseline/config.json"))
    }

    pub fn write_snapshot_meta(
        &self,
        id: &str,
        created_at: Option<&str>,
        manifest_hash: Option<&str>,
    ) -> Result<()> {
        let mut meta = json!({ "id": id });
        if let Some(ts) = created_at {
            meta["created_at"] = json!(ts);
        }
        if let Some(hash) = manifest_hash {
            meta["manifest_hash"] = json!(hash);
        }
        write_json(&self.snapshot_meta_path(id), &meta)
    }

    pub fn write_manifest(&self, hash: &str, bytes: &[u8]) -> Result<()> {
        let path = self.manifest_path(hash);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join(".baseline/snapshots")
    }

    pub fn snapshot_meta_path(&self, id: &str) -> PathBuf {
        self.root.join(format!(".baseline/snapshots/{id}.meta.json"))
    }

    pub fn manifest_path(&self, hash: &str) -> PathBuf {
        self.root.join(format!(".baseline/manifests/{hash}.json"))
    }
}

pub fn workspace_entry(workspace_id: &str, project_id: &str, path: &Path) -> Value {
    json!({
        "workspace_id": workspace_id,
        "project_id": project_id,
        "path": path.to_str().expect("utf-8 path"),
    })
}

pub fn project_entry(project_id: &str) -> Value {
    json!({ "project_id": project_id })
}

pub fn project_entry_at(project_id: &str, project_path: &Path) -> Value {
    json!({
        "project_id": project_id,
        "project_path": project_path.to_str().expect("utf-8 path"),
    })
}

/// Writes a registry document under `dir` and returns its path.
pub fn write_registry(dir: &Path, workspaces: Vec<Value>, projects: Vec<Value>) -> Result<PathBuf> {
    let path = dir.join("registry.json");
    write_json(
        &path,
        &json!({ "workspaces": workspaces, "projects": projects }),
    )?;
    Ok(path)
}
