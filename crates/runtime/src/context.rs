//! Everything loaded content contributes to a session.

use game_content::{ContentCatalog, ContentError, ContentModule, ModuleRegistrar};
use game_core::{DataTypeTable, ModuleId, ModuleInfo, SaveVersion};
use tracing::{debug, info};

/// Definitions, data types and module list of the running session.
///
/// Built once from the active modules and then passed by reference to
/// whatever needs to resolve content.
#[derive(Debug, Default)]
pub struct GameContext {
    catalog: ContentCatalog,
    data_types: DataTypeTable,
    modules: Vec<ModuleInfo>,
    version: SaveVersion,
}

impl GameContext {
    /// Empty context stamping saves with `version`.
    pub fn new(version: SaveVersion) -> Self {
        Self {
            catalog: ContentCatalog::new(),
            data_types: DataTypeTable::new(),
            modules: Vec::new(),
            version,
        }
    }

    /// Registers `modules` in order. The first failing module aborts the load.
    pub fn load(
        modules: &[Box<dyn ContentModule>],
        version: SaveVersion,
    ) -> Result<Self, ContentError> {
        let mut ctx = Self::new(version);
        for module in modules {
            ctx.register_module(module.as_ref())?;
        }

        info!(
            target: "content",
            modules = ctx.modules.len(),
            items = ctx.catalog.items.len(),
            actor_types = ctx.catalog.actor_types.len(),
            data_types = ctx.data_types.len(),
            "content loaded"
        );
        Ok(ctx)
    }

    /// Registers one more module after those already loaded.
    pub fn register_module(&mut self, module: &dyn ContentModule) -> Result<(), ContentError> {
        let info = module.info();
        if self.modules.iter().any(|loaded| loaded.id == info.id) {
            return Err(ContentError::Module {
                module: info.id.clone(),
                reason: "module already loaded".into(),
            });
        }

        let mut registrar =
            ModuleRegistrar::new(info.id.clone(), &mut self.catalog, &mut self.data_types);
        module.register(&mut registrar)?;

        debug!(target: "content", module = %info, "registered module");
        self.modules.push(info.clone());
        Ok(())
    }

    /// Drops `module` from the active set.
    ///
    /// Its data types stop resolving, so saved data it owns is skipped on the
    /// next load. Definitions it registered stay in the catalog because their
    /// numeric ids are already handed out.
    pub fn unload_module(&mut self, module: &ModuleId) -> bool {
        let Some(idx) = self.modules.iter().position(|loaded| &loaded.id == module) else {
            return false;
        };
        self.modules.remove(idx);
        let removed = self.data_types.unload_module(module);
        info!(target: "content", %module, data_types = removed, "module unloaded");
        true
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn data_types(&self) -> &DataTypeTable {
        &self.data_types
    }

    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    pub fn is_loaded(&self, module: &ModuleId) -> bool {
        self.modules.iter().any(|loaded| &loaded.id == module)
    }

    pub fn version(&self) -> &SaveVersion {
        &self.version
    }
}
