//! Definition registries: string id ↔ dense numeric id ↔ definition.
//!
//! Modules populate registries during a single-threaded load phase, either
//! from constructors they ship or from JSON files. After loading, gameplay
//! code resolves definitions by string id or by [`NumId`].
mod definition;
mod error;
#[cfg(feature = "json")]
mod json;
mod store;

pub use definition::{Definition, NumId, Registration};
pub use error::{DefinitionError, RegistryError};
#[cfg(feature = "json")]
pub use json::JsonDefinition;
pub use store::DefinitionRegistry;
