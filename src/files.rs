// 💾 File Writes - replace a file in one step
//
// Content goes to a sibling `<name>.tmp` first and is renamed over the
// target, so readers see either the old file or the complete new one.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn temp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Path has no file name: {:?}", path))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path)?;

    fs::write(&tmp_path, bytes)
        .with_context(|| format!("Failed to write temp file: {:?}", tmp_path))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move {:?} into place", path))?;

    Ok(())
}
