//! Repository layer for dynamic runtime data
//!
//! Repositories handle data that CHANGES during gameplay:
//! - Player data (loaded when a player joins, saved when they leave)
//!
//! Static game content (items, actor types) lives in the content catalog, and
//! the session snapshot is written directly by the runtime.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FilePlayerRepository;
pub use memory::InMemoryPlayerRepository;
pub use traits::PlayerRepository;
