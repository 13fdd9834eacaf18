//! Typed instance data attached to runtime objects.
//!
//! Any module may attach its own state to actors, worlds and the session
//! without the owner knowing the concrete types. Each owner keeps a
//! [`DataCollection`] keyed by Rust type; saving writes one frame per entry so
//! data from modules that are no longer loaded is skipped on the way back in.
mod collection;
mod entry;
mod types;

pub use collection::{DataCollection, ReadSummary};
pub use entry::{AsAny, DEFAULT_PRIORITY, DataEntry, DataOwner};
pub use types::{DataFactory, DataTypeTable, RegisteredDataType, TypeResolver};
