use game_core::EntityId;
use tokio::sync::mpsc;
use tracing::trace;

use super::host::ActorHandle;

/// Thread-safe entry point for actor lifecycle requests.
///
/// Cheap to clone and safe to use from any thread or task. Adds and removes
/// travel on independent channels, so neither ever waits on the other. Nothing
/// is applied until the tick thread next calls
/// [`ActorManager::update`](super::ActorManager::update); a queued request
/// cannot be cancelled.
#[derive(Clone, Debug)]
pub struct ActorQueue {
    adds: mpsc::UnboundedSender<ActorHandle>,
    removes: mpsc::UnboundedSender<EntityId>,
}

/// Consumer half, owned by the manager.
pub(crate) struct PendingActors {
    pub(crate) adds: mpsc::UnboundedReceiver<ActorHandle>,
    pub(crate) removes: mpsc::UnboundedReceiver<EntityId>,
}

pub(crate) fn channel() -> (ActorQueue, PendingActors) {
    let (add_tx, add_rx) = mpsc::unbounded_channel();
    let (remove_tx, remove_rx) = mpsc::unbounded_channel();
    (
        ActorQueue {
            adds: add_tx,
            removes: remove_tx,
        },
        PendingActors {
            adds: add_rx,
            removes: remove_rx,
        },
    )
}

impl ActorQueue {
    /// Queues `handle` to join the live set at the next update.
    ///
    /// Returns false only if the manager is gone.
    pub fn add(&self, handle: ActorHandle) -> bool {
        let id = handle.id();
        let accepted = self.adds.send(handle).is_ok();
        trace!(target: "actors", %id, accepted, "queued actor add");
        accepted
    }

    /// Queues the actor behind `handle` to leave the live set.
    pub fn remove(&self, handle: &ActorHandle) -> bool {
        self.remove_id(handle.id())
    }

    pub fn remove_id(&self, id: EntityId) -> bool {
        let accepted = self.removes.send(id).is_ok();
        trace!(target: "actors", %id, accepted, "queued actor remove");
        accepted
    }
}
