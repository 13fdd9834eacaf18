//! `mod.toml` manifest loader.

use std::path::Path;

use game_core::ModuleInfo;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::loaders::{LoadResult, read_file};

/// File name of a module manifest inside a module directory.
pub const MANIFEST_FILE: &str = "mod.toml";

/// Module manifest.
///
/// ```toml
/// id = "example.weapons"
/// name = "Weapons Pack"
/// version = "1.2.0"
/// load_order = 10
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    /// Modules load in ascending order; ties break by directory name.
    #[serde(default)]
    pub load_order: i32,
}

fn default_version() -> String {
    "0.0.0".to_owned()
}

impl ModuleManifest {
    pub fn info(&self) -> ModuleInfo {
        ModuleInfo::new(self.id.clone(), self.name.clone(), self.version.clone())
    }
}

/// Loader for module manifests.
pub struct ManifestLoader;

impl ManifestLoader {
    /// Load the manifest of the module rooted at `module_dir`.
    pub fn load(module_dir: &Path) -> LoadResult<ModuleManifest> {
        let path = module_dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ContentError::MissingManifest(module_dir.to_path_buf()).into());
        }

        let content = read_file(&path)?;
        let manifest: ModuleManifest =
            toml::from_str(&content).map_err(|source| ContentError::InvalidManifest {
                path: path.clone(),
                source,
            })?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_manifest_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "id = \"base\"\nname = \"Base\"\n",
        )
        .unwrap();

        let manifest = ManifestLoader::load(dir.path()).unwrap();
        assert_eq!(manifest.id, "base");
        assert_eq!(manifest.version, "0.0.0");
        assert_eq!(manifest.load_order, 0);
        assert_eq!(manifest.info().to_string(), "base v0.0.0");
    }

    #[test]
    fn missing_manifest_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        let err = ManifestLoader::load(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::MissingManifest(_))
        ));
    }
}
