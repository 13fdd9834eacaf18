//! Explicit data type table.
//!
//! Modules register every data type they may attach at load time. Loading a
//! save resolves frame type names through this table instead of probing
//! loaded code by name.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use tracing::{debug, warn};

use super::entry::{DataEntry, DataOwner};
use crate::module::ModuleId;

/// Constructor for a default instance of a registered data type.
pub type DataFactory<O> = fn() -> Box<dyn DataEntry<O>>;

fn construct<O, T>() -> Box<dyn DataEntry<O>>
where
    O: DataOwner,
    T: DataEntry<O> + Default,
{
    Box::new(T::default())
}

/// A data type known to the table.
pub struct RegisteredDataType {
    name: String,
    module: ModuleId,
    owner_kind: &'static str,
    type_id: TypeId,
    /// Always a `DataFactory<O>` for the owner kind the type was registered with.
    factory: Box<dyn Any + Send + Sync>,
}

impl RegisteredDataType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    pub fn owner_kind(&self) -> &'static str {
        self.owner_kind
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the constructor if this type is a data entry for owner kind `O`.
    pub fn factory<O: DataOwner>(&self) -> Option<DataFactory<O>> {
        self.factory.downcast_ref::<DataFactory<O>>().copied()
    }
}

impl std::fmt::Debug for RegisteredDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredDataType")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("owner_kind", &self.owner_kind)
            .finish()
    }
}

/// Resolves persisted type names to constructible data types.
///
/// Implementations search only the modules that are currently active.
pub trait TypeResolver {
    fn resolve(&self, type_name: &str) -> Option<&RegisteredDataType>;
}

/// Name-keyed table of data types contributed by loaded modules.
#[derive(Debug, Default)]
pub struct DataTypeTable {
    types: HashMap<String, RegisteredDataType>,
    aliases: HashMap<String, String>,
}

impl DataTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` as a data entry for owners of kind `O`.
    ///
    /// The persisted name is taken from `T::type_name()`. Registering a name
    /// that already exists replaces the previous registration.
    pub fn register<O, T>(&mut self, module: &ModuleId) -> &RegisteredDataType
    where
        O: DataOwner,
        T: DataEntry<O> + Default,
    {
        let name = <T as DataEntry<O>>::type_name(&T::default()).to_owned();
        let factory: DataFactory<O> = construct::<O, T>;

        if let Some(previous) = self.types.get(&name) {
            warn!(
                target: "data",
                type_name = %name,
                previous = %previous.module,
                module = %module,
                "data type registered twice, replacing"
            );
        } else {
            debug!(
                target: "data",
                type_name = %name,
                module = %module,
                owner = O::KIND,
                "registered data type"
            );
        }

        let entry = RegisteredDataType {
            name: name.clone(),
            module: module.clone(),
            owner_kind: O::KIND,
            type_id: TypeId::of::<T>(),
            factory: Box::new(factory),
        };
        self.types.insert(name.clone(), entry);
        &self.types[&name]
    }

    /// Makes frames saved under `old_name` load as `current_name`.
    pub fn register_alias(&mut self, old_name: impl Into<String>, current_name: impl Into<String>) {
        self.aliases.insert(old_name.into(), current_name.into());
    }

    /// Removes every type registered by `module`, returning how many were removed.
    pub fn unload_module(&mut self, module: &ModuleId) -> usize {
        let before = self.types.len();
        self.types.retain(|_, ty| &ty.module != module);
        let removed = before - self.types.len();
        if removed > 0 {
            debug!(target: "data", module = %module, removed, "unloaded data types");
        }
        removed
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.resolve(type_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredDataType> {
        self.types.values()
    }
}

impl TypeResolver for DataTypeTable {
    fn resolve(&self, type_name: &str) -> Option<&RegisteredDataType> {
        self.types.get(type_name).or_else(|| {
            self.aliases
                .get(type_name)
                .and_then(|current| self.types.get(current))
        })
    }
}
