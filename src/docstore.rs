use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Loads a JSON document, returning `None` when the file does not exist or
/// its content does not parse. Repair logic treats an unreadable document as
/// "nothing to repair here"; only real I/O failures surface as errors.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    match serde_json::from_slice(&bytes) {
        Ok(doc) => Ok(Some(doc)),
        Err(_) => Ok(None),
    }
}

/// Writes a JSON document with stable pretty formatting and a trailing
/// newline, creating parent directories on first write into a new store area.
pub fn save<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    let mut bytes =
        serde_json::to_vec_pretty(doc).with_context(|| format!("serialize {}", path.display()))?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

pub fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
    }
}

/// Writes opaque bytes only when nothing exists at `path` yet. Returns
/// whether a write was performed.
pub fn write_bytes_if_absent(path: &Path, bytes: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_atomic(path, bytes)?;
    Ok(true)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
