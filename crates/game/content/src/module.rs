//! Plugin surface for content modules.

use std::path::Path;

use game_core::{
    DataEntry, DataOwner, DataTypeTable, DefinitionRegistry, ModuleId, ModuleInfo, Registration,
};

use crate::catalog::ContentCatalog;
use crate::definitions::{ActorTypeDefinition, ItemDefinition};
use crate::error::ContentError;

/// An independently loaded unit of content.
///
/// Modules are registered in load order; a later module overrides an earlier
/// one's definitions by registering the same ids.
pub trait ContentModule: Send + Sync {
    fn info(&self) -> &ModuleInfo;

    /// Contributes definitions and data types. Called once per session load.
    fn register(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<(), ContentError>;
}

/// Registration handle given to [`ContentModule::register`].
///
/// Every call made through the registrar is attributed to the module being
/// registered.
pub struct ModuleRegistrar<'a> {
    source: ModuleId,
    catalog: &'a mut ContentCatalog,
    data_types: &'a mut DataTypeTable,
}

impl<'a> ModuleRegistrar<'a> {
    pub fn new(
        source: ModuleId,
        catalog: &'a mut ContentCatalog,
        data_types: &'a mut DataTypeTable,
    ) -> Self {
        Self {
            source,
            catalog,
            data_types,
        }
    }

    pub fn source(&self) -> &ModuleId {
        &self.source
    }

    pub fn items(&mut self) -> &mut DefinitionRegistry<ItemDefinition> {
        &mut self.catalog.items
    }

    pub fn actor_types(&mut self) -> &mut DefinitionRegistry<ActorTypeDefinition> {
        &mut self.catalog.actor_types
    }

    pub fn data_types(&mut self) -> &mut DataTypeTable {
        &mut *self.data_types
    }

    pub fn item_types(&mut self, constructors: &[fn() -> ItemDefinition]) -> Vec<Registration> {
        self.catalog.items.register_types(constructors, &self.source)
    }

    pub fn actor_types_from(
        &mut self,
        constructors: &[fn() -> ActorTypeDefinition],
    ) -> Vec<Registration> {
        self.catalog.actor_types.register_types(constructors, &self.source)
    }

    pub fn items_from_json(
        &mut self,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<Registration>, ContentError> {
        Ok(self.catalog.items.register_json(&self.source, dir)?)
    }

    pub fn actor_types_from_json(
        &mut self,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<Registration>, ContentError> {
        Ok(self.catalog.actor_types.register_json(&self.source, dir)?)
    }

    /// Declares that this module attaches `T` to owners of kind `O`.
    pub fn data_type<O, T>(&mut self)
    where
        O: DataOwner,
        T: DataEntry<O> + Default,
    {
        self.data_types.register::<O, T>(&self.source);
    }
}

/// Module assembled in code, mostly for built-in content and tests.
pub struct StaticModule<F> {
    info: ModuleInfo,
    register: F,
}

impl<F> StaticModule<F>
where
    F: Fn(&mut ModuleRegistrar<'_>) -> Result<(), ContentError> + Send + Sync,
{
    pub fn new(info: ModuleInfo, register: F) -> Self {
        Self { info, register }
    }
}

impl<F> ContentModule for StaticModule<F>
where
    F: Fn(&mut ModuleRegistrar<'_>) -> Result<(), ContentError> + Send + Sync,
{
    fn info(&self) -> &ModuleInfo {
        &self.info
    }

    fn register(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<(), ContentError> {
        (self.register)(registrar)
    }
}

#[cfg(test)]
mod tests {
    use game_core::{Definition, NumId};

    use super::*;

    fn torch() -> ItemDefinition {
        ItemDefinition::new("torch", "Torch").with_stack(10)
    }

    fn rat() -> ActorTypeDefinition {
        ActorTypeDefinition::new("rat", "Rat")
    }

    #[test]
    fn registrar_attributes_to_source_module() {
        let mut catalog = ContentCatalog::new();
        let mut data_types = DataTypeTable::new();
        let module = StaticModule::new(ModuleInfo::new("base", "Base", "1.0.0"), |reg| {
            reg.item_types(&[torch]);
            reg.actor_types_from(&[rat]);
            Ok(())
        });

        let mut registrar =
            ModuleRegistrar::new(module.info().id.clone(), &mut catalog, &mut data_types);
        module.register(&mut registrar).unwrap();

        let torch = catalog.items.get("torch").unwrap();
        assert_eq!(torch.num_id(), NumId(0));
        assert_eq!(torch.source(), Some(&ModuleId::new("base")));
        assert!(catalog.actor_types.contains("rat"));
    }
}
