//! Binary codec for persisted instance data.
//!
//! The format is built from self-delimiting frames so that a reader can always
//! step over data it does not understand:
//!
//! ```text
//! frame := [name: var_u32 len + UTF-8][length: i32 LE][payload: length bytes]
//! ```
//!
//! Both data collections and nested owner containers (worlds, players) are
//! laid out as sequences of frames.
mod error;
mod reader;
mod writer;

pub use error::{CodecError, Result};
pub use reader::{Frame, StateReader};
pub use writer::{Placeholder, StateWriter};

/// Version tags handed to every entry reader.
///
/// `game_version` is the host/game build that produced the save and
/// `format_version` the container layout revision. Entries use them to migrate
/// payloads written by older builds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SaveVersion {
    pub game_version: String,
    pub format_version: u32,
}

impl SaveVersion {
    /// Layout revision written by this build.
    pub const CURRENT_FORMAT: u32 = 1;

    pub fn new(game_version: impl Into<String>, format_version: u32) -> Self {
        Self {
            game_version: game_version.into(),
            format_version,
        }
    }

    pub fn current(game_version: impl Into<String>) -> Self {
        Self::new(game_version, Self::CURRENT_FORMAT)
    }
}

impl Default for SaveVersion {
    fn default() -> Self {
        Self::current(env!("CARGO_PKG_VERSION"))
    }
}
