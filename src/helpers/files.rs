//! File helpers for assets copied into the public directory

use anyhow::Result;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path};

/// Hash of a file's bytes, used to give copied assets a collision-free directory
pub fn hash_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(hash_bytes(&bytes))
}

/// Hex hash of a byte slice
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Public path of a hashed asset: `<dir>/<hash>/<file name>`
pub fn hashed_asset_path(dir: &str, path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Asset has no file name: {:?}", path))?;
    let hash = hash_file(path)?;
    Ok(format!("{}/{}/{}", dir.trim_matches('/'), hash, file_name))
}

/// Lowercased extension of a path
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// True when a relative path only has plain segments, so joining it stays inside the base
pub fn is_contained(relative: &Path) -> bool {
    relative.components().next().is_some()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Copy a file, creating the destination's parent directories
pub fn copy_into(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)
        .map_err(|e| anyhow::anyhow!("Failed to copy {:?} to {:?}: {}", source, dest, e))?;
    Ok(())
}
