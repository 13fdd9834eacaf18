//! Data-only content module read from a directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use game_core::ModuleInfo;
use tracing::{debug, info};

use crate::error::ContentError;
use crate::loaders::{LoadResult, ManifestLoader, ModuleManifest};
use crate::module::{ContentModule, ModuleRegistrar};

/// Content module that loads everything from a data directory.
///
/// # Directory Structure
///
/// ```text
/// module_dir/
/// ├── mod.toml
/// ├── items/
/// │   ├── iron_sword.json
/// │   └── potions/
/// │       └── minor_heal.json
/// └── actors/
///     └── goblin.json
/// ```
///
/// Either definition tree may be absent.
#[derive(Debug)]
pub struct DirectoryModule {
    root: PathBuf,
    manifest: ModuleManifest,
    info: ModuleInfo,
}

impl DirectoryModule {
    /// Opens the module rooted at `root`, reading its manifest.
    pub fn open(root: impl Into<PathBuf>) -> LoadResult<Self> {
        let root = root.into();
        let manifest = ManifestLoader::load(&root)?;
        let info = manifest.info();
        Ok(Self {
            root,
            manifest,
            info,
        })
    }

    /// Opens every module directory directly below `mods_dir`, in load order.
    ///
    /// Subdirectories without a manifest are ignored. A missing `mods_dir`
    /// yields no modules.
    pub fn discover(mods_dir: &Path) -> LoadResult<Vec<Self>> {
        if !mods_dir.is_dir() {
            debug!(target: "content", path = %mods_dir.display(), "mods directory does not exist");
            return Ok(Vec::new());
        }

        let mut modules = Vec::new();
        let entries = std::fs::read_dir(mods_dir)
            .with_context(|| format!("Failed to list mods directory {}", mods_dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if !path.join(crate::loaders::MANIFEST_FILE).is_file() {
                continue;
            }
            let module = Self::open(&path)
                .with_context(|| format!("Failed to open module {}", path.display()))?;
            modules.push(module);
        }

        modules.sort_by(|a, b| {
            a.manifest
                .load_order
                .cmp(&b.manifest.load_order)
                .then_with(|| a.root.cmp(&b.root))
        });
        info!(
            target: "content",
            count = modules.len(),
            path = %mods_dir.display(),
            "discovered modules"
        );
        Ok(modules)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    pub fn items_dir(&self) -> PathBuf {
        self.root.join("items")
    }

    pub fn actors_dir(&self) -> PathBuf {
        self.root.join("actors")
    }
}

impl ContentModule for DirectoryModule {
    fn info(&self) -> &ModuleInfo {
        &self.info
    }

    fn register(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<(), ContentError> {
        let items = registrar.items_from_json(self.items_dir())?;
        let actor_types = registrar.actor_types_from_json(self.actors_dir())?;
        debug!(
            target: "content",
            module = %self.info,
            items = items.len(),
            actor_types = actor_types.len(),
            "registered directory module"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mod.toml"), "id = \"m\"\nname = \"M\"\n").unwrap();

        let module = DirectoryModule::open(dir.path()).unwrap();
        assert_eq!(module.root(), dir.path());
        assert_eq!(module.items_dir(), dir.path().join("items"));
        assert_eq!(module.info().id.as_str(), "m");
    }
}
