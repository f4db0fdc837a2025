//! Crash-safe file output for snapshots and config files.
//!
//! Every write is staged in a hidden sibling file, flushed to disk, then
//! renamed over the destination.

use crate::error::Result;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn stage(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;
    let mut staged = tempfile::Builder::new()
        .prefix(".pipesim-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    Ok(staged)
}

/// Write `data` to `path`, replacing any existing file.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    stage(path, data)?.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `data` to `path` unless something is already there.
/// Returns `false` when the existing file was left alone.
pub fn create_file(path: &Path, data: &[u8]) -> Result<bool> {
    match stage(path, data)?.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}

/// Pretty JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    replace_file(path, &data)
}
