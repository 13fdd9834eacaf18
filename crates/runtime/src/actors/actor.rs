use game_content::ContentCatalog;
use game_core::{Aabb, DataCollection, EntityId, NumId};
use tracing::debug;

use super::host::ActorHandle;
use crate::events::ActorKind;
use crate::session::ActorOwner;

/// Wrapper for an actor controlled by a connected player.
pub struct PlayerActor {
    handle: ActorHandle,
    account: String,
    pub data: DataCollection<ActorOwner>,
}

impl PlayerActor {
    pub fn new(handle: ActorHandle) -> Self {
        let id = handle.id();
        let account = handle
            .account_id()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("actor-{}", id.get()));
        Self {
            handle,
            account,
            data: DataCollection::new(id),
        }
    }

    /// Key under which this player's data is persisted.
    pub fn account(&self) -> &str {
        &self.account
    }
}

/// Wrapper for a non-player actor.
pub struct NpcActor {
    handle: ActorHandle,
    actor_type: Option<NumId>,
    pub data: DataCollection<ActorOwner>,
}

impl NpcActor {
    /// Builds the wrapper, resolving the host's actor type against `catalog`.
    pub fn new(handle: ActorHandle, catalog: &ContentCatalog) -> Self {
        let id = handle.id();
        let actor_type = handle.actor_type().and_then(|type_id| {
            let num_id = catalog.actor_types.num_id(type_id);
            if num_id.is_none() {
                debug!(target: "actors", %id, actor_type = type_id, "unknown actor type");
            }
            num_id
        });
        Self {
            handle,
            actor_type,
            data: DataCollection::new(id),
        }
    }

    /// Resolved actor type definition, if the host named a known one.
    pub fn actor_type(&self) -> Option<NumId> {
        self.actor_type
    }
}

/// A live actor tracked by the [`ActorManager`](super::ActorManager).
pub enum Actor {
    Player(PlayerActor),
    Npc(NpcActor),
}

impl Actor {
    /// Wraps `handle` in the kind of wrapper its player flag calls for.
    pub fn from_handle(handle: ActorHandle, catalog: &ContentCatalog) -> Self {
        if handle.is_player() {
            Actor::Player(PlayerActor::new(handle))
        } else {
            Actor::Npc(NpcActor::new(handle, catalog))
        }
    }

    pub fn handle(&self) -> &ActorHandle {
        match self {
            Actor::Player(player) => &player.handle,
            Actor::Npc(npc) => &npc.handle,
        }
    }

    pub fn id(&self) -> EntityId {
        self.handle().id()
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            Actor::Player(_) => ActorKind::Player,
            Actor::Npc(_) => ActorKind::Npc,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Actor::Player(_))
    }

    pub fn bounds(&self) -> Aabb {
        self.handle().bounds()
    }

    pub fn data(&self) -> &DataCollection<ActorOwner> {
        match self {
            Actor::Player(player) => &player.data,
            Actor::Npc(npc) => &npc.data,
        }
    }

    pub fn data_mut(&mut self) -> &mut DataCollection<ActorOwner> {
        match self {
            Actor::Player(player) => &mut player.data,
            Actor::Npc(npc) => &mut npc.data,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerActor> {
        match self {
            Actor::Player(player) => Some(player),
            Actor::Npc(_) => None,
        }
    }

    pub fn as_npc(&self) -> Option<&NpcActor> {
        match self {
            Actor::Npc(npc) => Some(npc),
            Actor::Player(_) => None,
        }
    }

    /// Per-tick update.
    pub fn update(&mut self) {
        self.data_mut().update_all();
    }
}
