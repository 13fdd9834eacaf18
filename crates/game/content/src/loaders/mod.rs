//! Loaders for content modules stored on disk.
//!
//! A module directory carries a `mod.toml` manifest and JSON definition trees;
//! see [`DirectoryModule`] for the layout.

pub mod directory;
pub mod manifest;

pub use directory::DirectoryModule;
pub use manifest::{MANIFEST_FILE, ManifestLoader, ModuleManifest};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
