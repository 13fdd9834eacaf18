use std::sync::Arc;

use game_core::{Aabb, EntityId};

/// An actor as seen from the host engine.
///
/// The runtime only reads the identity and player flag when deciding what to
/// build; the remaining accessors feed queries and content lookups.
/// Implementations must be cheap to call from the tick thread.
pub trait HostActor: Send + Sync {
    /// Stable identity, unique among live actors.
    fn id(&self) -> EntityId;

    /// True if a connected human controls this actor.
    fn is_player(&self) -> bool;

    /// Account key used to persist player data.
    fn account_id(&self) -> Option<&str> {
        None
    }

    /// Actor type definition id, for NPCs.
    fn actor_type(&self) -> Option<&str> {
        None
    }

    /// Current world-space bounds.
    fn bounds(&self) -> Aabb;
}

/// Shared handle to a host actor.
pub type ActorHandle = Arc<dyn HostActor>;
