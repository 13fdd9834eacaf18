//! Data backbone shared by the runtime and by content modules.
//!
//! `game-core` holds the pieces every module builds on and that carry the
//! real invariants:
//! - [`registry`]: catalogs mapping string ids to dense numeric ids
//! - [`data`]: typed per-owner instance data with skip-safe persistence
//! - [`codec`]: the self-delimiting binary format both of them write
//!
//! Nothing here touches threads or I/O beyond optional JSON loading; the
//! runtime decides who owns what.
pub mod codec;
pub mod data;
pub mod error;
pub mod module;
pub mod registry;
pub mod state;

pub use codec::{CodecError, Frame, SaveVersion, StateReader, StateWriter};
pub use data::{
    DEFAULT_PRIORITY, DataCollection, DataEntry, DataOwner, DataTypeTable, ReadSummary,
    RegisteredDataType, TypeResolver,
};
pub use error::{ErrorSeverity, GameError};
pub use module::{ModuleId, ModuleInfo};
#[cfg(feature = "json")]
pub use registry::JsonDefinition;
pub use registry::{
    Definition, DefinitionError, DefinitionRegistry, NumId, Registration, RegistryError,
};
pub use state::{Aabb, BoundingSphere, EntityId, Ray, Shape, Vec3, WorldKey};
