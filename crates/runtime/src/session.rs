//! Session-level owners of instance data.

use game_core::{DataCollection, DataOwner, EntityId, WorldKey};

/// Owner kind for data attached to actors.
pub struct ActorOwner;

impl DataOwner for ActorOwner {
    type Key = EntityId;
    const KIND: &'static str = "actor";
}

/// Owner kind for data attached to a world.
pub struct WorldOwner;

impl DataOwner for WorldOwner {
    type Key = WorldKey;
    const KIND: &'static str = "world";
}

/// Owner kind for data attached to the session as a whole.
pub struct SessionOwner;

impl DataOwner for SessionOwner {
    type Key = ();
    const KIND: &'static str = "session";
}

/// A named world (level, map) and the data modules attached to it.
#[derive(Debug)]
pub struct World {
    key: WorldKey,
    name: String,
    pub data: DataCollection<WorldOwner>,
}

impl World {
    pub fn new(key: WorldKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            data: DataCollection::new(key),
        }
    }

    pub fn key(&self) -> WorldKey {
        self.key
    }

    /// Persistent identity of the world; saves refer to worlds by name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Root container for everything saved with a session except actors.
#[derive(Debug)]
pub struct GameSession {
    pub data: DataCollection<SessionOwner>,
    worlds: Vec<World>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            data: DataCollection::new(()),
            worlds: Vec::new(),
        }
    }

    pub fn world(&self, name: &str) -> Option<&World> {
        self.worlds.iter().find(|world| world.name == name)
    }

    pub fn world_mut(&mut self, name: &str) -> Option<&mut World> {
        self.worlds.iter_mut().find(|world| world.name == name)
    }

    pub fn world_by_key(&self, key: WorldKey) -> Option<&World> {
        self.worlds.get(key.0 as usize)
    }

    /// Returns the world called `name`, creating it if needed.
    pub fn create_world(&mut self, name: &str) -> &mut World {
        let idx = match self.worlds.iter().position(|world| world.name == name) {
            Some(idx) => idx,
            None => {
                let key = WorldKey(self.worlds.len() as u32);
                self.worlds.push(World::new(key, name));
                self.worlds.len() - 1
            }
        };
        &mut self.worlds[idx]
    }

    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.iter()
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Runs the per-tick hooks of session and world data.
    pub fn update(&mut self) {
        self.data.update_all();
        for world in &mut self.worlds {
            world.data.update_all();
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
