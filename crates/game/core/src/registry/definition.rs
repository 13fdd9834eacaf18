use std::fmt;

use crate::module::ModuleId;

/// Dense numeric id assigned by a [`DefinitionRegistry`](super::DefinitionRegistry).
///
/// Equal to the definition's index in the registry's backing storage, so it is
/// suitable as a compact array index or network identifier for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NumId(pub u32);

impl NumId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One catalog entry of a [`DefinitionRegistry`](super::DefinitionRegistry).
pub trait Definition: Sized {
    /// Author-supplied id, unique within its registry.
    fn id(&self) -> &str;

    fn num_id(&self) -> NumId;

    /// Called by the registry only; the value must not change afterwards.
    fn set_num_id(&mut self, num_id: NumId);

    /// Hook run each time the definition takes a registry slot.
    fn on_register(&mut self, _source: &ModuleId) {}

    /// Applies `other` onto `self` in place, keeping `self`'s identity.
    ///
    /// Return `Err(other)` to decline; the registry then falls back to
    /// replacing the entry outright. The default declines.
    fn replace_with(&mut self, _source: &ModuleId, other: Self) -> Result<(), Self> {
        Err(other)
    }
}

/// What a registration call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// New id appended at the end of the registry.
    Added(NumId),
    /// Existing id overwritten; the replacement inherited the slot.
    Replaced(NumId),
    /// Existing id updated in place through [`Definition::replace_with`].
    Merged(NumId),
}

impl Registration {
    pub const fn num_id(self) -> NumId {
        match self {
            Self::Added(id) | Self::Replaced(id) | Self::Merged(id) => id,
        }
    }

    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added(_))
    }
}
