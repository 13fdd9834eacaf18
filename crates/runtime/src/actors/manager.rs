use std::collections::HashMap;
use std::sync::Arc;

use game_core::{Aabb, EntityId, Shape};
use tracing::{debug, trace, warn};

use super::actor::{Actor, PlayerActor};
use super::host::ActorHandle;
use super::queue::{self, ActorQueue, PendingActors};
use crate::context::GameContext;
use crate::events::{ActorEvent, EventBus};
use crate::persistence::PlayerRecord;
use crate::repository::{PlayerRepository, RepositoryError};

/// What one [`ActorManager::update`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub added: usize,
    pub removed: usize,
    /// Adds for an identity that was already live.
    pub duplicate_adds: usize,
    /// Removes for an identity that was not live.
    pub unknown_removes: usize,
    pub updated: usize,
}

/// Canonical set of live actors.
///
/// Any thread may request changes through an [`ActorQueue`]; they are applied
/// by [`update`](Self::update) on the tick thread, which also owns every
/// query. Within one update all adds are applied before all removes, and both
/// before the per-tick pass, so an add and remove queued in the same tick net
/// to "removed" and no actor is updated unless it is fully indexed.
pub struct ActorManager {
    actors: Vec<Actor>,
    index: HashMap<EntityId, usize>,
    pending: PendingActors,
    queue: ActorQueue,
    events: EventBus,
    players: Arc<dyn PlayerRepository>,
}

impl ActorManager {
    pub fn new(events: EventBus, players: Arc<dyn PlayerRepository>) -> Self {
        let (queue, pending) = queue::channel();
        Self {
            actors: Vec::new(),
            index: HashMap::new(),
            pending,
            queue,
            events,
            players,
        }
    }

    /// Returns a producer handle for lifecycle requests.
    pub fn queue(&self) -> ActorQueue {
        self.queue.clone()
    }

    /// Applies queued adds, then queued removes, then updates every live actor once.
    pub fn update(&mut self, ctx: &GameContext) -> TickSummary {
        let mut summary = TickSummary::default();

        // Requests queued while draining wait for the next tick.
        for _ in 0..self.pending.adds.len() {
            let Ok(handle) = self.pending.adds.try_recv() else {
                break;
            };
            self.apply_add(handle, ctx, &mut summary);
        }
        for _ in 0..self.pending.removes.len() {
            let Ok(id) = self.pending.removes.try_recv() else {
                break;
            };
            self.apply_remove(id, ctx, &mut summary);
        }
        for actor in &mut self.actors {
            actor.update();
        }
        summary.updated = self.actors.len();

        if summary.added > 0 || summary.removed > 0 {
            trace!(target: "actors", ?summary, live = self.actors.len(), "applied actor changes");
        }
        summary
    }

    fn apply_add(&mut self, handle: ActorHandle, ctx: &GameContext, summary: &mut TickSummary) {
        let id = handle.id();
        if self.index.contains_key(&id) {
            debug!(target: "actors", %id, "actor already live, ignoring add");
            summary.duplicate_adds += 1;
            return;
        }

        let mut actor = Actor::from_handle(handle, ctx.catalog());
        if let Actor::Player(player) = &mut actor {
            self.load_player(player, ctx);
        }

        let kind = actor.kind();
        self.index.insert(id, self.actors.len());
        self.actors.push(actor);
        summary.added += 1;
        self.events.publish(ActorEvent::Added { id, kind });
    }

    fn apply_remove(&mut self, id: EntityId, ctx: &GameContext, summary: &mut TickSummary) {
        let Some(idx) = self.index.remove(&id) else {
            debug!(target: "actors", %id, "actor not live, ignoring remove");
            summary.unknown_removes += 1;
            return;
        };

        let actor = self.actors.swap_remove(idx);
        if let Some(moved) = self.actors.get(idx) {
            self.index.insert(moved.id(), idx);
        }

        if let Actor::Player(player) = &actor
            && let Err(error) = self.save_player(player, ctx)
        {
            warn!(
                target: "actors",
                %id,
                account = player.account(),
                %error,
                "failed to save player data"
            );
        }

        summary.removed += 1;
        self.events.publish(ActorEvent::Removed {
            id,
            kind: actor.kind(),
        });
    }

    /// Fills a joining player's data. A wrapper for the same account that is
    /// still live (a reconnect whose old actor leaves later) is newer than the
    /// repository, so its data is copied instead.
    fn load_player(&self, player: &mut PlayerActor, ctx: &GameContext) {
        let source = match self.players().find(|live| live.account() == player.account()) {
            Some(live) => {
                let account = player.account();
                debug!(target: "actors", account, "copying data from live player");
                PlayerRecord::encode(&live.data, ctx.version()).map(Some)
            }
            None => self.players.load(player.account()),
        };
        let loaded = source.and_then(|bytes| match bytes {
            Some(bytes) => PlayerRecord::decode_into(&bytes, &mut player.data, ctx.data_types()),
            None => Ok(None),
        });
        match loaded {
            Ok(Some(read)) => {
                debug!(target: "actors", account = player.account(), ?read, "loaded player data")
            }
            Ok(None) => {}
            // The player joins with empty data rather than being refused.
            Err(error) => {
                warn!(
                    target: "actors",
                    account = player.account(),
                    %error,
                    "failed to load player data"
                )
            }
        }
    }

    fn save_player(&self, player: &PlayerActor, ctx: &GameContext) -> Result<(), RepositoryError> {
        let bytes = PlayerRecord::encode(&player.data, ctx.version())?;
        self.players.save(player.account(), &bytes)
    }

    /// Persists every live player's data. Returns how many were saved.
    pub fn save_players(&self, ctx: &GameContext) -> usize {
        let mut saved = 0;
        for player in self.players() {
            match self.save_player(player, ctx) {
                Ok(()) => saved += 1,
                Err(error) => {
                    warn!(
                        target: "actors",
                        account = player.account(),
                        %error,
                        "failed to save player data"
                    )
                }
            }
        }
        saved
    }

    pub fn get(&self, id: EntityId) -> Option<&Actor> {
        self.index.get(&id).map(|&idx| &self.actors[idx])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        let idx = *self.index.get(&id)?;
        self.actors.get_mut(idx)
    }

    pub fn get_by_handle(&self, handle: &ActorHandle) -> Option<&Actor> {
        self.get(handle.id())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerActor> {
        self.actors.iter().filter_map(Actor::as_player)
    }

    /// Clears `out`, then fills it with every actor whose bounds intersect `shape`.
    pub fn query_into<'a>(&'a self, shape: &Shape, out: &mut Vec<&'a Actor>) {
        self.query_into_where(shape, |_| true, out);
    }

    /// Like [`query_into`](Self::query_into), keeping only actors accepted by `filter`.
    pub fn query_into_where<'a, F>(&'a self, shape: &Shape, filter: F, out: &mut Vec<&'a Actor>)
    where
        F: Fn(&Actor) -> bool,
    {
        out.clear();
        out.extend(
            self.actors
                .iter()
                .filter(|actor| shape.intersects(&actor.bounds()) && filter(actor)),
        );
    }

    pub fn query(&self, shape: &Shape) -> Vec<&Actor> {
        let mut out = Vec::new();
        self.query_into(shape, &mut out);
        out
    }

    pub fn query_where<F>(&self, shape: &Shape, filter: F) -> Vec<&Actor>
    where
        F: Fn(&Actor) -> bool,
    {
        let mut out = Vec::new();
        self.query_into_where(shape, filter, &mut out);
        out
    }

    /// Box query, the common case.
    pub fn actors_in_box<'a>(&'a self, area: Aabb, out: &mut Vec<&'a Actor>) {
        self.query_into(&Shape::Box(area), out);
    }
}

#[cfg(test)]
mod tests {
    use game_core::{DataEntry, Vec3};

    use super::*;
    use crate::actors::HostActor;
    use crate::events::{ActorKind, Event, Topic};
    use crate::repository::InMemoryPlayerRepository;
    use crate::session::ActorOwner;

    struct TestActor {
        id: EntityId,
        player: bool,
        at: Vec3,
    }

    impl HostActor for TestActor {
        fn id(&self) -> EntityId {
            self.id
        }
        fn is_player(&self) -> bool {
            self.player
        }
        fn bounds(&self) -> Aabb {
            Aabb::from_center(self.at, Vec3::splat(0.5))
        }
    }

    fn npc(id: u64, x: f32) -> ActorHandle {
        Arc::new(TestActor {
            id: EntityId(id),
            player: false,
            at: Vec3::new(x, 0.0, 0.0),
        })
    }

    #[derive(Default)]
    struct Ticks(u32);

    impl DataEntry<ActorOwner> for Ticks {
        fn update(&mut self, _owner: EntityId) {
            self.0 += 1;
        }
    }

    fn manager() -> (ActorManager, GameContext, EventBus) {
        let events = EventBus::with_capacity(16);
        let players = Arc::new(InMemoryPlayerRepository::new());
        let manager = ActorManager::new(events.clone(), players);
        (manager, GameContext::default(), events)
    }

    #[test]
    fn nothing_applies_before_update() {
        let (mut manager, ctx, _) = manager();
        manager.queue().add(npc(1, 0.0));
        assert!(manager.is_empty());

        let summary = manager.update(&ctx);
        assert_eq!(summary.added, 1);
        assert!(manager.contains(EntityId(1)));
    }

    #[test]
    fn add_then_remove_in_one_tick_nets_to_removed() {
        let (mut manager, ctx, events) = manager();
        let mut rx = events.subscribe(Topic::Actors);
        let queue = manager.queue();
        let handle = npc(7, 0.0);

        queue.add(handle.clone());
        queue.remove(&handle);
        let summary = manager.update(&ctx);

        assert_eq!((summary.added, summary.removed, summary.updated), (1, 1, 0));
        assert!(manager.get(EntityId(7)).is_none());
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::Actor(ActorEvent::Added {
                id: EntityId(7),
                kind: ActorKind::Npc
            })
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            Event::Actor(ActorEvent::Removed { .. })
        ));
    }

    #[test]
    fn duplicate_add_and_unknown_remove_are_ignored() {
        let (mut manager, ctx, _) = manager();
        let queue = manager.queue();
        queue.add(npc(1, 0.0));
        queue.add(npc(1, 5.0));
        queue.remove_id(EntityId(99));

        let summary = manager.update(&ctx);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.duplicate_adds, 1);
        assert_eq!(summary.unknown_removes, 1);
        // The first add wins.
        assert_eq!(manager.get(EntityId(1)).unwrap().bounds().center().x, 0.0);
    }

    #[test]
    fn requests_queued_during_update_wait_for_next_tick() {
        let (mut manager, ctx, _) = manager();
        let queue = manager.queue();
        queue.add(npc(1, 0.0));
        queue.add(npc(2, 0.0));
        let summary = manager.update(&ctx);
        assert_eq!(summary.added, 2);

        queue.add(npc(3, 0.0));
        queue.remove_id(EntityId(1));
        let summary = manager.update(&ctx);
        assert_eq!((summary.added, summary.removed), (1, 1));
        assert_eq!(manager.len(), 2);

        let summary = manager.update(&ctx);
        assert_eq!((summary.added, summary.removed, summary.updated), (0, 0, 2));
    }

    #[test]
    fn removal_keeps_index_consistent() {
        let (mut manager, ctx, _) = manager();
        let queue = manager.queue();
        for id in 1..=4 {
            queue.add(npc(id, id as f32));
        }
        manager.update(&ctx);

        queue.remove_id(EntityId(1));
        manager.update(&ctx);

        assert_eq!(manager.len(), 3);
        for id in 2..=4 {
            assert_eq!(manager.get(EntityId(id)).unwrap().id(), EntityId(id));
        }
    }

    #[test]
    fn each_live_actor_updates_once_per_tick() {
        let (mut manager, ctx, _) = manager();
        manager.queue().add(npc(1, 0.0));
        manager.update(&ctx);
        manager
            .get_mut(EntityId(1))
            .unwrap()
            .data_mut()
            .set(Ticks::default());

        manager.queue().add(npc(2, 0.0));
        let summary = manager.update(&ctx);
        assert_eq!(summary.updated, 2);
        manager.update(&ctx);

        let ticks = manager.get(EntityId(1)).unwrap().data().get::<Ticks>().unwrap();
        assert_eq!(ticks.0, 2);
    }

    #[test]
    fn box_query_clears_output_first() {
        let (mut manager, ctx, _) = manager();
        let queue = manager.queue();
        queue.add(npc(1, 0.0));
        queue.add(npc(2, 10.0));
        queue.add(npc(3, 11.0));
        manager.update(&ctx);

        let stale = manager.get(EntityId(1)).unwrap();
        let mut out = vec![stale, stale];

        let far = Aabb::new(Vec3::splat(-50.0), Vec3::new(-40.0, 1.0, 1.0));
        manager.actors_in_box(far, &mut out);
        assert!(out.is_empty());

        manager.actors_in_box(Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)), &mut out);
        assert_eq!(out.iter().map(|a| a.id()).collect::<Vec<_>>(), vec![EntityId(1)]);

        let right = Aabb::new(Vec3::new(9.0, -1.0, -1.0), Vec3::new(12.0, 1.0, 1.0));
        manager.actors_in_box(right, &mut out);
        let mut ids: Vec<_> = out.iter().map(|a| a.id()).collect();
        ids.sort();
        assert_eq!(ids, vec![EntityId(2), EntityId(3)]);
    }

    #[test]
    fn filtered_queries_allocate_fresh_results() {
        let (mut manager, ctx, _) = manager();
        let queue = manager.queue();
        queue.add(npc(1, 0.0));
        queue.add(npc(2, 0.2));
        manager.update(&ctx);

        let everywhere = Shape::Box(Aabb::new(Vec3::splat(-5.0), Vec3::splat(5.0)));
        assert_eq!(manager.query(&everywhere).len(), 2);
        let odd = manager.query_where(&everywhere, |actor| actor.id().get() % 2 == 1);
        assert_eq!(odd.len(), 1);
        assert!(manager.query_where(&everywhere, |actor| actor.is_player()).is_empty());
    }
}
