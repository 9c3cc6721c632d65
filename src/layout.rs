use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

pub const STORE_DIR: &str = ".baseline";
pub const MARKER_FILE: &str = "baseline.json";
pub const CONFIG_FILE: &str = "config.json";
pub const REGISTRY_FILE: &str = "registry.json";
pub const SNAPSHOT_META_SUFFIX: &str = ".meta.json";

pub fn store_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(STORE_DIR)
}

pub fn config_path(workspace_root: &Path) -> PathBuf {
    store_dir(workspace_root).join(CONFIG_FILE)
}

pub fn snapshots_dir(workspace_root: &Path) -> PathBuf {
    store_dir(workspace_root).join("snapshots")
}

pub fn manifests_dir(workspace_root: &Path) -> PathBuf {
    store_dir(workspace_root).join("manifests")
}

pub fn snapshot_meta_path(workspace_root: &Path, snapshot_id: &str) -> PathBuf {
    snapshots_dir(workspace_root).join(format!("{}{}", snapshot_id, SNAPSHOT_META_SUFFIX))
}

pub fn manifest_path(workspace_root: &Path, manifest_hash: &str) -> PathBuf {
    manifests_dir(workspace_root).join(format!("{}.json", manifest_hash))
}

/// Project-root marker document; doubles as the parent config.
pub fn marker_path(project_root: &Path) -> PathBuf {
    project_root.join(MARKER_FILE)
}

/// Global config directory: `$XDG_CONFIG_HOME/baseline`, falling back to
/// `~/.config/baseline`.
pub fn global_config_dir() -> Result<PathBuf> {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);
    let config_home = match config_home {
        Some(dir) => dir,
        None => dirs::home_dir()
            .ok_or_else(|| anyhow!("could not determine home directory"))?
            .join(".config"),
    };
    Ok(config_home.join("baseline"))
}

pub fn registry_path() -> Result<PathBuf> {
    Ok(global_config_dir()?.join(REGISTRY_FILE))
}
