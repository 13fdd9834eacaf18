use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info, warn};

use super::definition::{Definition, NumId, Registration};
use crate::module::ModuleId;

/// Closed catalog of definitions of one kind.
///
/// Definitions live in a single dense vector indexed by [`NumId`]; the string
/// map only stores the index, so string and numeric lookups always resolve to
/// the same object. Registration is append-only for the lifetime of the
/// registry.
pub struct DefinitionRegistry<T> {
    label: &'static str,
    definitions: Vec<T>,
    by_id: HashMap<String, NumId>,
}

impl<T: Definition> DefinitionRegistry<T> {
    /// Creates an empty registry. `label` names it in logs (e.g. `"items"`).
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            definitions: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Registers `definition`, replacing any existing entry with the same id.
    ///
    /// A replacement takes over the existing slot and `NumId`, so both lookup
    /// paths keep agreeing.
    pub fn register(&mut self, mut definition: T, source: &ModuleId) -> Registration {
        if let Some(&num_id) = self.by_id.get(definition.id()) {
            warn!(
                target: "registry",
                registry = self.label,
                id = definition.id(),
                %num_id,
                module = %source,
                "definition registered twice, replacing"
            );
            definition.set_num_id(num_id);
            definition.on_register(source);
            self.definitions[num_id.index()] = definition;
            return Registration::Replaced(num_id);
        }
        self.append(definition, source)
    }

    /// Registers `definition`, merging onto an existing entry when it supports it.
    ///
    /// This is how one module overrides content from another: the existing
    /// object keeps its identity and `NumId` and absorbs the new components.
    pub fn register_json_definition(&mut self, definition: T, source: &ModuleId) -> Registration {
        let Some(&num_id) = self.by_id.get(definition.id()) else {
            return self.append(definition, source);
        };

        let id = definition.id().to_owned();
        match self.definitions[num_id.index()].replace_with(source, definition) {
            Ok(()) => {
                info!(
                    target: "registry",
                    registry = self.label,
                    id = %id,
                    %num_id,
                    module = %source,
                    "definition overridden"
                );
                Registration::Merged(num_id)
            }
            Err(definition) => self.register(definition, source),
        }
    }

    /// Default-constructs and registers every definition type a module ships.
    pub fn register_types(
        &mut self,
        constructors: &[fn() -> T],
        source: &ModuleId,
    ) -> Vec<Registration> {
        constructors
            .iter()
            .map(|construct| self.register(construct(), source))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).map(|num_id| &self.definitions[num_id.index()])
    }

    pub fn get_by_num(&self, num_id: NumId) -> Option<&T> {
        self.definitions.get(num_id.index())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let num_id = *self.by_id.get(id)?;
        self.definitions.get_mut(num_id.index())
    }

    pub fn num_id(&self, id: &str) -> Option<NumId> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Definitions in `NumId` order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn append(&mut self, mut definition: T, source: &ModuleId) -> Registration {
        let num_id = NumId(self.definitions.len() as u32);
        definition.set_num_id(num_id);
        definition.on_register(source);
        debug!(
            target: "registry",
            registry = self.label,
            id = definition.id(),
            %num_id,
            module = %source,
            "registered definition"
        );
        self.by_id.insert(definition.id().to_owned(), num_id);
        self.definitions.push(definition);
        Registration::Added(num_id)
    }
}

impl<'a, T: Definition> IntoIterator for &'a DefinitionRegistry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for DefinitionRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionRegistry")
            .field("label", &self.label)
            .field("len", &self.definitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Tile {
        id: String,
        num_id: NumId,
        solid: Option<bool>,
        color: Option<u32>,
        registered_by: Vec<String>,
        mergeable: bool,
    }

    impl Tile {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_owned(),
                mergeable: true,
                ..Default::default()
            }
        }
    }

    impl Definition for Tile {
        fn id(&self) -> &str {
            &self.id
        }
        fn num_id(&self) -> NumId {
            self.num_id
        }
        fn set_num_id(&mut self, num_id: NumId) {
            self.num_id = num_id;
        }
        fn on_register(&mut self, source: &ModuleId) {
            self.registered_by.push(source.to_string());
        }
        fn replace_with(&mut self, _source: &ModuleId, other: Self) -> Result<(), Self> {
            if !self.mergeable {
                return Err(other);
            }
            if other.solid.is_some() {
                self.solid = other.solid;
            }
            if other.color.is_some() {
                self.color = other.color;
            }
            Ok(())
        }
    }

    fn assert_consistent(registry: &DefinitionRegistry<Tile>) {
        for (index, tile) in registry.iter().enumerate() {
            let num_id = registry.num_id(tile.id()).unwrap();
            assert_eq!(num_id.index(), index);
            assert_eq!(tile.num_id(), num_id);
            assert_eq!(registry.get(tile.id()), registry.get_by_num(num_id));
        }
    }

    #[test]
    fn num_ids_are_dense_and_agree_with_string_ids() {
        let core = ModuleId::new("core");
        let mut registry = DefinitionRegistry::new("tiles");
        for id in ["grass", "stone", "water"] {
            assert!(registry.register(Tile::new(id), &core).is_added());
        }

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.num_id("water"), Some(NumId(2)));
        assert!(registry.get("lava").is_none());
        assert!(registry.get_by_num(NumId(3)).is_none());
        assert_eq!(registry.get("grass").unwrap().registered_by, vec!["core"]);
        assert_consistent(&registry);
    }

    #[test]
    fn merge_keeps_identity_and_applies_present_components() {
        let core = ModuleId::new("core");
        let overhaul = ModuleId::new("overhaul");
        let mut registry = DefinitionRegistry::new("tiles");

        let mut stone = Tile::new("stone");
        stone.solid = Some(true);
        stone.color = Some(0x808080);
        registry.register_json_definition(Tile::new("grass"), &core);
        registry.register_json_definition(stone, &core);

        let mut recolor = Tile::new("stone");
        recolor.color = Some(0x404040);
        let outcome = registry.register_json_definition(recolor, &overhaul);

        assert_eq!(outcome, Registration::Merged(NumId(1)));
        assert_eq!(registry.len(), 2);
        let stone = registry.get("stone").unwrap();
        assert_eq!(stone.num_id(), NumId(1));
        assert_eq!(stone.solid, Some(true));
        assert_eq!(stone.color, Some(0x404040));
        // Merging does not re-run the registration hook.
        assert_eq!(stone.registered_by, vec!["core"]);
        assert_consistent(&registry);
    }

    #[test]
    fn duplicate_without_merge_replaces_the_slot() {
        let core = ModuleId::new("core");
        let patch = ModuleId::new("patch");
        let mut registry = DefinitionRegistry::new("tiles");
        registry.register(Tile::new("grass"), &core);
        registry.register(Tile::new("stone"), &core);

        let mut replacement = Tile::new("grass");
        replacement.solid = Some(false);
        let outcome = registry.register(replacement, &patch);

        assert_eq!(outcome, Registration::Replaced(NumId(0)));
        assert_eq!(registry.len(), 2);
        let grass = registry.get_by_num(NumId(0)).unwrap();
        assert_eq!(grass.solid, Some(false));
        assert_eq!(grass.registered_by, vec!["patch"]);
        assert_consistent(&registry);
    }

    #[test]
    fn declined_merge_falls_back_to_replace() {
        let core = ModuleId::new("core");
        let mut registry = DefinitionRegistry::new("tiles");
        let mut grass = Tile::new("grass");
        grass.mergeable = false;
        grass.color = Some(1);
        registry.register_json_definition(grass, &core);

        let outcome = registry.register_json_definition(Tile::new("grass"), &core);
        assert_eq!(outcome, Registration::Replaced(NumId(0)));
        assert_eq!(registry.get("grass").unwrap().color, None);
        assert_consistent(&registry);
    }

    #[test]
    fn register_types_constructs_each() {
        fn grass() -> Tile {
            Tile::new("grass")
        }
        fn sand() -> Tile {
            Tile::new("sand")
        }

        let mut registry = DefinitionRegistry::new("tiles");
        let outcomes = registry.register_types(&[grass, sand], &ModuleId::new("core"));
        assert_eq!(
            outcomes,
            vec![Registration::Added(NumId(0)), Registration::Added(NumId(1))]
        );
        assert!(registry.contains("sand"));
    }

    #[test]
    fn get_mut_edits_shared_storage() {
        let mut registry = DefinitionRegistry::new("tiles");
        registry.register(Tile::new("grass"), &ModuleId::new("core"));
        registry.get_mut("grass").unwrap().color = Some(7);
        assert_eq!(registry.get_by_num(NumId(0)).unwrap().color, Some(7));
    }
}
