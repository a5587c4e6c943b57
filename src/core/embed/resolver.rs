//! Asset resolution
//!
//! The embedder never touches the filesystem directly; it asks an
//! [`AssetResolver`] for the bytes behind a reference. This keeps the
//! engine free of I/O policy and lets tests run without image files.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Supplies the bytes of a locally referenced image
pub trait AssetResolver: Send + Sync {
    /// Reads the asset `reference`, relative to the document directory `base_dir`
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the asset does not exist or cannot be read.
    fn read(&self, base_dir: &Path, reference: &str) -> io::Result<Vec<u8>>;
}

/// Reads assets from disk relative to the document's directory
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetResolver;

impl FsAssetResolver {
    /// Path an asset reference points at
    pub fn asset_path(base_dir: &Path, reference: &str) -> PathBuf {
        base_dir.join(strip_suffix(reference))
    }
}

impl AssetResolver for FsAssetResolver {
    fn read(&self, base_dir: &Path, reference: &str) -> io::Result<Vec<u8>> {
        let path = Self::asset_path(base_dir, reference);
        tracing::trace!(path = %path.display(), "Reading image asset");
        fs::read(path)
    }
}

/// Drops a `?query` or `#fragment` part, which never names a file
pub(crate) fn strip_suffix(reference: &str) -> &str {
    reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference)
}

/// In-memory assets keyed by reference, ignoring `base_dir`
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetResolver {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetResolver {
    /// Creates an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset
    pub fn with_asset(mut self, reference: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.assets.insert(reference.into(), bytes.into());
        self
    }
}

impl AssetResolver for MemoryAssetResolver {
    fn read(&self, _base_dir: &Path, reference: &str) -> io::Result<Vec<u8>> {
        self.assets
            .get(strip_suffix(reference))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "asset not registered"))
    }
}
