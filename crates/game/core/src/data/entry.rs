use std::any::Any;
use std::fmt;

use crate::codec::{Result, SaveVersion, StateReader, StateWriter};

/// Priority assigned to entries that do not override [`DataEntry::priority`].
pub const DEFAULT_PRIORITY: i32 = 100;

/// Kind of object that carries a [`DataCollection`](super::DataCollection).
///
/// Implemented by zero-sized marker types (actor, world, session). `Key` is
/// the copyable back-reference handed to entries in [`DataEntry::initialize`].
pub trait DataOwner: 'static {
    type Key: Copy + fmt::Debug + Send + 'static;

    /// Short label used in logs.
    const KIND: &'static str;
}

/// Object-safe access to [`Any`] for boxed entries.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Plugin-defined state attached to one owner of kind `O`.
///
/// An owner holds at most one entry per concrete type. Every method has a
/// default so small entries only implement what they need.
pub trait DataEntry<O: DataOwner>: AsAny + Send {
    /// Name written into save frames and used to resolve the type on load.
    ///
    /// Defaults to the fully qualified Rust type path. Override it to keep
    /// saves loadable across module or type renames.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Ordering key for iteration and saving; lower sorts first.
    ///
    /// Must be constant for a given type for the life of a session.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Whether this entry currently has anything worth persisting.
    fn should_save(&self) -> bool {
        false
    }

    /// Binds the entry to its owner. Called on every insert or replace and
    /// after construction during load.
    fn initialize(&mut self, _owner: O::Key) {}

    /// Per-tick hook, invoked in priority order by the owner's update.
    fn update(&mut self, _owner: O::Key) {}

    fn write_state(&self, _writer: &mut StateWriter) -> Result<()> {
        Ok(())
    }

    /// Restores the entry from its frame payload.
    ///
    /// `reader` is bounded to this entry's frame: reading past it yields
    /// [`CodecError::Truncated`](crate::codec::CodecError::Truncated) and
    /// never touches sibling data.
    fn read_state(&mut self, _reader: &mut StateReader<'_>, _version: &SaveVersion) -> Result<()> {
        Ok(())
    }
}
