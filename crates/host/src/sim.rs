//! Stand-in for the host engine's network layer.
//!
//! Players connect and disconnect and NPCs spawn and despawn on a fixed
//! schedule, all from a task other than the one running ticks.
use std::sync::Arc;
use std::time::Duration;

use game_core::{Aabb, EntityId, Vec3};
use runtime::{ActorHandle, ActorQueue, HostActor};
use tracing::debug;

/// Host-side actor as the network layer would create it.
struct SimActor {
    id: EntityId,
    account: Option<String>,
    actor_type: Option<String>,
    position: Vec3,
}

impl HostActor for SimActor {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_player(&self) -> bool {
        self.account.is_some()
    }

    fn account_id(&self) -> Option<&str> {
        self.account.as_deref()
    }

    fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, Vec3::splat(0.5))
    }
}

/// Feeds `queue` until `steps` steps have passed.
///
/// Every step spawns one actor: each fourth is a player cycling through a
/// small set of accounts, the rest are NPCs drawn from `actor_types`. Actors
/// leave after `lifetime` steps, so returning players pick up their saved data.
pub async fn run(
    queue: ActorQueue,
    actor_types: Vec<String>,
    steps: u64,
    lifetime: usize,
    interval: Duration,
) {
    const ACCOUNTS: [&str; 3] = ["alice", "bob", "carol"];

    let mut live: Vec<ActorHandle> = Vec::new();
    let mut ticker = tokio::time::interval(interval);

    for step in 0..steps {
        ticker.tick().await;

        let id = EntityId(step + 1);
        let position = Vec3::new((step % 16) as f32 * 2.0, 0.0, (step / 16) as f32 * 2.0);
        let actor = if step % 4 == 0 {
            let account = ACCOUNTS[(step / 4) as usize % ACCOUNTS.len()];
            SimActor {
                id,
                account: Some(account.to_owned()),
                actor_type: None,
                position,
            }
        } else {
            SimActor {
                id,
                account: None,
                actor_type: actor_types.get(step as usize % actor_types.len().max(1)).cloned(),
                position,
            }
        };

        let handle: ActorHandle = Arc::new(actor);
        if !queue.add(handle.clone()) {
            debug!(target: "sim", "runtime gone, stopping simulated network");
            return;
        }
        live.push(handle);

        if live.len() > lifetime {
            let leaving = live.remove(0);
            queue.remove(&leaving);
        }
    }
}
