//! Recursive JSON population of a [`DefinitionRegistry`].

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::definition::{Definition, Registration};
use super::error::{DefinitionError, RegistryError};
use super::store::DefinitionRegistry;
use crate::module::ModuleId;

/// A definition that can be built from one JSON document.
pub trait JsonDefinition: Definition {
    /// Parses `text`, read from `path`, into a definition owned by `source`.
    fn from_json(source: &ModuleId, path: &Path, text: &str) -> Result<Self, DefinitionError>;
}

impl<T: JsonDefinition> DefinitionRegistry<T> {
    /// Loads every `*.json` file below `dir` through the merging path.
    ///
    /// Files are visited depth-first in file-name order, so later files (and
    /// later modules) override earlier ones deterministically. A missing
    /// directory registers nothing. The first unreadable or invalid file
    /// aborts the load.
    pub fn register_json(
        &mut self,
        source: &ModuleId,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<Registration>, RegistryError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            debug!(
                target: "registry",
                registry = self.label(),
                path = %dir.display(),
                "no definition directory"
            );
            return Ok(Vec::new());
        }

        let mut registrations = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let text = std::fs::read_to_string(path).map_err(|err| RegistryError::Io {
                path: path.to_path_buf(),
                source: err,
            })?;
            let definition = T::from_json(source, path, &text).map_err(|error| {
                RegistryError::InvalidDefinition {
                    path: path.to_path_buf(),
                    source: error,
                }
            })?;
            registrations.push(self.register_json_definition(definition, source));
        }

        debug!(
            target: "registry",
            registry = self.label(),
            module = %source,
            count = registrations.len(),
            "loaded JSON definitions"
        );
        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde::Deserialize;

    use super::*;
    use crate::registry::NumId;

    #[derive(Debug, Deserialize)]
    struct Rune {
        id: String,
        #[serde(default)]
        power: Option<u32>,
        #[serde(skip)]
        num_id: NumId,
    }

    impl Definition for Rune {
        fn id(&self) -> &str {
            &self.id
        }
        fn num_id(&self) -> NumId {
            self.num_id
        }
        fn set_num_id(&mut self, num_id: NumId) {
            self.num_id = num_id;
        }
        fn replace_with(&mut self, _source: &ModuleId, other: Self) -> Result<(), Self> {
            if other.power.is_some() {
                self.power = other.power;
            }
            Ok(())
        }
    }

    impl JsonDefinition for Rune {
        fn from_json(
            _source: &ModuleId,
            _path: &Path,
            text: &str,
        ) -> Result<Self, DefinitionError> {
            Ok(serde_json::from_str(text)?)
        }
    }

    #[test]
    fn loads_nested_json_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("fire")).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"id": "ice", "power": 2}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"id": "earth"}"#).unwrap();
        fs::write(dir.path().join("fire/ember.json"), r#"{"id": "ember", "power": 5}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a definition").unwrap();

        let mut registry = DefinitionRegistry::<Rune>::new("runes");
        let loaded = registry
            .register_json(&ModuleId::new("core"), dir.path())
            .unwrap();

        assert_eq!(loaded.len(), 3);
        let ids: Vec<_> = registry.iter().map(|rune| rune.id.as_str()).collect();
        assert_eq!(ids, ["earth", "ice", "ember"]);
        assert_eq!(registry.get("ember").unwrap().num_id, NumId(2));
    }

    #[test]
    fn second_module_overrides_through_merge() {
        let base = tempfile::tempdir().unwrap();
        let patch = tempfile::tempdir().unwrap();
        fs::write(base.path().join("ice.json"), r#"{"id": "ice", "power": 2}"#).unwrap();
        fs::write(patch.path().join("ice.json"), r#"{"id": "ice", "power": 9}"#).unwrap();

        let mut registry = DefinitionRegistry::<Rune>::new("runes");
        registry.register_json(&ModuleId::new("base"), base.path()).unwrap();
        let loaded = registry
            .register_json(&ModuleId::new("patch"), patch.path())
            .unwrap();

        assert_eq!(loaded, vec![Registration::Merged(NumId(0))]);
        assert_eq!(registry.get("ice").unwrap().power, Some(9));
    }

    #[test]
    fn invalid_file_aborts_the_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();

        let mut registry = DefinitionRegistry::<Rune>::new("runes");
        let err = registry
            .register_json(&ModuleId::new("core"), dir.path())
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDefinition { .. }));
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DefinitionRegistry::<Rune>::new("runes");
        let loaded = registry
            .register_json(&ModuleId::new("core"), dir.path().join("absent"))
            .unwrap();
        assert!(loaded.is_empty());
    }
}
