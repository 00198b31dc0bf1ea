use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{KitError, KitResult};

/// Where asset bytes come from.
///
/// Any failure, including denied access, is reported as an error and treated by the loader as a
/// load failure.
pub trait AssetSource: Send + Sync {
    /// Fetch the raw bytes behind `reference`.
    fn fetch(&self, reference: &str) -> KitResult<Vec<u8>>;
}

/// Normalize and validate root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> KitResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(KitError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(KitError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(KitError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(KitError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Reads assets from files below a root directory.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, reference: &str) -> KitResult<Vec<u8>> {
        let norm = normalize_rel_path(reference)?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(KitError::from)
    }
}

/// Serves bytes registered up front; unknown references fail closed.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) `bytes` under `reference`.
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), Arc::new(bytes));
    }

    /// Builder-style [`MemoryAssetSource::insert`].
    pub fn with(mut self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }

    /// Forget `reference`; later fetches fail.
    pub fn remove(&mut self, reference: &str) -> bool {
        self.entries.remove(reference).is_some()
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, reference: &str) -> KitResult<Vec<u8>> {
        self.entries
            .get(reference)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| KitError::asset_load(format!("no asset registered for '{reference}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
