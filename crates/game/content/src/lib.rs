//! Data-driven content definitions and the module plugin surface.
//!
//! This crate defines the content kinds a session catalogs and how modules
//! contribute them:
//! - Item definitions (JSON, component based)
//! - Actor type definitions (JSON, component based)
//! - [`ContentModule`] / [`ModuleRegistrar`]: the registration surface
//! - [`DirectoryModule`]: a module read from a `mod.toml` directory
//!
//! Definitions are stored in `game_core` registries; a later module overrides
//! an earlier one by registering the same id, merging component by component.

pub mod catalog;
pub mod definitions;
pub mod error;
pub mod loaders;
pub mod module;

pub use catalog::ContentCatalog;
pub use definitions::{
    ActorTypeDefinition, BoundsComponent, ConsumableComponent, CustomComponents,
    DefinitionComponent, ItemDefinition, StackComponent, StatsComponent, ValueComponent,
    WeaponComponent,
};
pub use error::ContentError;
pub use loaders::{DirectoryModule, LoadResult, ModuleManifest};
pub use module::{ContentModule, ModuleRegistrar, StaticModule};
