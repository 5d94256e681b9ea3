use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use anyhow::Context as _;
use futures::future::BoxFuture;

use crate::foundation::error::{StripError, StripResult};

/// Source of external image resources (template backgrounds).
///
/// Loading is asynchronous and may fail; callers decide how to fall back.
pub trait ImageLoader: Send + Sync {
    /// Fetch the encoded bytes behind `reference`.
    fn load<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, StripResult<Vec<u8>>>;
}

/// Loads references as paths relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageLoader for FsImageLoader {
    fn load<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, StripResult<Vec<u8>>> {
        Box::pin(async move {
            // Web-style references ("/templates/x.png") are rooted at the assets directory.
            let norm = normalize_rel_path(reference.trim_start_matches('/'))?;
            let path = self.root.join(Path::new(&norm));
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("read image bytes from '{}'", path.display()))?;
            Ok(bytes)
        })
    }
}

/// In-memory reference -> bytes table.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageLoader {
    entries: Arc<RwLock<HashMap<String, Arc<[u8]>>>>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, reference: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(reference.into(), bytes.into());
        }
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, StripResult<Vec<u8>>> {
        Box::pin(async move {
            let entries = self
                .entries
                .read()
                .map_err(|_| StripError::decode("image table lock poisoned"))?;
            entries
                .get(reference)
                .map(|b| b.to_vec())
                .ok_or_else(|| StripError::decode(format!("no image registered for '{reference}'")))
        })
    }
}

/// Normalize and validate a root-relative resource path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> StripResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StripError::validation("resource paths must be relative"));
    }
    if s.is_empty() {
        return Err(StripError::validation("resource path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StripError::validation(
                "resource paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StripError::validation(
            "resource path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
