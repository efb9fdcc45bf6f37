//! Trait for chemical structure image lookup.
//!
//! Fetching structures and converting them to raster images happens outside
//! this crate; a source only reports where an already-cached image lives.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves a prefixed chemical identifier to a local image file.
pub trait StructureImageSource: Send + Sync {
    fn resolve(&self, curie: &str) -> Option<PathBuf>;
}

/// Draws every chemical without a structure image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl StructureImageSource for NoImages {
    fn resolve(&self, _curie: &str) -> Option<PathBuf> {
        None
    }
}

// ── Cache directory ─────────────────────────────────────────────────────────

/// Reads `<dir>/<prefix>_<local id>.png`, e.g. `CHEBI:15702` → `chebi_15702.png`.
#[derive(Debug, Clone)]
pub struct ImageCacheDirectory {
    dir: PathBuf,
    prefix: String,
}

impl ImageCacheDirectory {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self { dir: dir.into(), prefix: prefix.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Expected cache path for `curie`, whether or not the file exists.
    pub fn path_for(&self, curie: &str) -> Option<PathBuf> {
        let local = curie.strip_prefix(self.prefix.as_str())?;
        if local.is_empty() {
            return None;
        }
        let stem = self.prefix.trim_end_matches(':').to_lowercase();
        Some(self.dir.join(format!("{stem}_{local}.png")))
    }
}

impl StructureImageSource for ImageCacheDirectory {
    fn resolve(&self, curie: &str) -> Option<PathBuf> {
        self.path_for(curie).filter(|p| p.is_file())
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

pub struct MockImageSource {
    images: HashMap<String, PathBuf>,
}

impl MockImageSource {
    pub fn new() -> Self {
        Self { images: HashMap::new() }
    }

    pub fn with(mut self, curie: &str, path: impl Into<PathBuf>) -> Self {
        self.images.insert(curie.to_string(), path.into());
        self
    }
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureImageSource for MockImageSource {
    fn resolve(&self, curie: &str) -> Option<PathBuf> {
        self.images.get(curie).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_path_layout() {
        let cache = ImageCacheDirectory::new("/tmp/img", "CHEBI:");
        assert_eq!(cache.path_for("CHEBI:15702"), Some(PathBuf::from("/tmp/img/chebi_15702.png")));
        assert_eq!(cache.path_for("pubchem.compound:1"), None);
        assert_eq!(cache.path_for("CHEBI:"), None);
    }

    #[test]
    fn test_resolve_requires_cached_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chebi_53259.png"), b"png").unwrap();
        let cache = ImageCacheDirectory::new(dir.path(), "CHEBI:");
        assert_eq!(cache.resolve("CHEBI:53259"), Some(dir.path().join("chebi_53259.png")));
        assert_eq!(cache.resolve("CHEBI:15702"), None);
    }

    #[test]
    fn test_no_images() {
        assert_eq!(NoImages.resolve("CHEBI:53259"), None);
    }
}
