use std::sync::Arc;
use std::thread;

use game_content::StaticModule;
use game_core::{
    Aabb, CodecError, DataEntry, EntityId, ModuleInfo, SaveVersion, StateReader, StateWriter,
    Vec3,
};
use runtime::{
    ActorEvent, ActorKind, ActorOwner, Event, HostActor, InMemoryPlayerRepository,
    PlayerRepository, Runtime, Topic,
};

struct Host {
    id: EntityId,
    account: Option<&'static str>,
    at: Vec3,
}

impl HostActor for Host {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_player(&self) -> bool {
        self.account.is_some()
    }

    fn account_id(&self) -> Option<&str> {
        self.account
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.at, Vec3::splat(0.5))
    }
}

fn npc(id: u64) -> Arc<dyn HostActor> {
    Arc::new(Host {
        id: EntityId(id),
        account: None,
        at: Vec3::new(id as f32, 0.0, 0.0),
    })
}

fn player(id: u64, account: &'static str) -> Arc<dyn HostActor> {
    Arc::new(Host {
        id: EntityId(id),
        account: Some(account),
        at: Vec3::splat(0.0),
    })
}

#[derive(Default)]
struct Gold(u32);

impl DataEntry<ActorOwner> for Gold {
    fn type_name(&self) -> &'static str {
        "gold"
    }

    fn should_save(&self) -> bool {
        self.0 > 0
    }

    fn write_state(&self, writer: &mut StateWriter) -> Result<(), CodecError> {
        writer.write_u32(self.0);
        Ok(())
    }

    fn read_state(
        &mut self,
        reader: &mut StateReader<'_>,
        _version: &SaveVersion,
    ) -> Result<(), CodecError> {
        self.0 = reader.read_u32()?;
        Ok(())
    }
}

fn runtime_with(players: Arc<dyn PlayerRepository>) -> Runtime {
    Runtime::builder()
        .module(StaticModule::new(ModuleInfo::new("economy", "Economy", "1.0.0"), |r| {
            r.data_type::<ActorOwner, Gold>();
            Ok(())
        }))
        .player_repository(players)
        .build()
        .unwrap()
}

#[test]
fn three_concurrent_adds_are_all_live_after_one_tick() {
    let mut runtime = runtime_with(Arc::new(InMemoryPlayerRepository::new()));
    let queue = runtime.queue();

    thread::scope(|scope| {
        for id in [10, 20, 30] {
            let queue = queue.clone();
            scope.spawn(move || queue.add(npc(id)));
        }
    });
    runtime.tick();

    assert_eq!(runtime.actors().len(), 3);
    for id in [10, 20, 30] {
        assert_eq!(runtime.actors().get(EntityId(id)).unwrap().id(), EntityId(id));
    }
}

#[test]
fn requests_from_many_threads_apply_on_next_tick() {
    let mut runtime = runtime_with(Arc::new(InMemoryPlayerRepository::new()));
    let queue = runtime.queue();

    thread::scope(|scope| {
        for worker in 0..4u64 {
            let queue = queue.clone();
            scope.spawn(move || {
                for n in 0..25 {
                    let handle = npc(worker * 100 + n);
                    assert!(queue.add(handle.clone()));
                    if n % 5 == 0 {
                        assert!(queue.remove(&handle));
                    }
                }
            });
        }
    });

    assert!(runtime.actors().is_empty());
    let summary = runtime.tick();

    assert_eq!(summary.added, 100);
    assert_eq!(summary.removed, 20);
    assert_eq!(summary.updated, 80);
    assert_eq!(runtime.actors().len(), 80);
    assert!(runtime.actors().get(EntityId(0)).is_none());
    assert!(runtime.actors().get(EntityId(301)).is_some());
}

#[test]
fn player_data_survives_leaving_and_rejoining() {
    let players = Arc::new(InMemoryPlayerRepository::new());
    let mut runtime = runtime_with(players.clone());
    let queue = runtime.queue();

    let first = player(1, "alice");
    queue.add(first.clone());
    runtime.tick();
    runtime
        .actors_mut()
        .get_mut(EntityId(1))
        .unwrap()
        .data_mut()
        .set(Gold(42));

    queue.remove(&first);
    runtime.tick();
    assert!(players.exists("alice"));

    // A new host actor for the same account, as after a reconnect.
    queue.add(player(2, "alice"));
    runtime.tick();

    let actor = runtime.actors().get(EntityId(2)).unwrap();
    assert!(actor.is_player());
    assert_eq!(actor.data().get::<Gold>().unwrap().0, 42);
    assert_eq!(runtime.actors().players().count(), 1);
}

#[test]
fn reconnect_in_the_same_tick_keeps_current_player_data() {
    let players = Arc::new(InMemoryPlayerRepository::new());
    let mut runtime = runtime_with(players.clone());
    let queue = runtime.queue();

    let first = player(1, "alice");
    queue.add(first.clone());
    runtime.tick();
    runtime
        .actors_mut()
        .get_mut(EntityId(1))
        .unwrap()
        .data_mut()
        .set(Gold(42));

    // Nothing saved yet; the old actor leaves in the tick the new one joins.
    assert!(!players.exists("alice"));
    queue.add(player(2, "alice"));
    queue.remove(&first);
    runtime.tick();

    let rejoined = runtime.actors().get(EntityId(2)).unwrap();
    assert_eq!(rejoined.data().get::<Gold>().map(|gold| gold.0), Some(42));
    assert!(runtime.actors().get(EntityId(1)).is_none());

    queue.remove_id(EntityId(2));
    runtime.tick();
    queue.add(player(3, "alice"));
    runtime.tick();
    let again = runtime.actors().get(EntityId(3)).unwrap();
    assert_eq!(again.data().get::<Gold>().map(|gold| gold.0), Some(42));
}

#[test]
fn corrupt_player_record_still_admits_the_player() {
    let players = Arc::new(InMemoryPlayerRepository::new());
    players.save("mallory", b"not a player record").unwrap();
    let mut runtime = runtime_with(players);

    runtime.queue().add(player(9, "mallory"));
    let summary = runtime.tick();

    assert_eq!(summary.added, 1);
    assert!(runtime.actors().get(EntityId(9)).unwrap().data().is_empty());
}

#[test]
fn lifecycle_changes_are_published() {
    let mut runtime = runtime_with(Arc::new(InMemoryPlayerRepository::new()));
    let mut events = runtime.events().subscribe(Topic::Actors);
    let queue = runtime.queue();

    queue.add(player(1, "bob"));
    queue.add(npc(2));
    runtime.tick();
    queue.remove_id(EntityId(2));
    runtime.tick();

    let received: Vec<_> = std::iter::from_fn(|| events.try_recv().ok()).collect();
    assert_eq!(
        received,
        vec![
            Event::Actor(ActorEvent::Added {
                id: EntityId(1),
                kind: ActorKind::Player
            }),
            Event::Actor(ActorEvent::Added {
                id: EntityId(2),
                kind: ActorKind::Npc
            }),
            Event::Actor(ActorEvent::Removed {
                id: EntityId(2),
                kind: ActorKind::Npc
            }),
        ]
    );
}
