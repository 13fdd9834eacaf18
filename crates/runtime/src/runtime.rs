//! High-level runtime orchestrator.
//!
//! The runtime owns the loaded content, the session and the live actor set,
//! and exposes a builder-based API for a host to drive ticks and saves.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use game_content::ContentModule;
use tracing::{debug, info};

use crate::actors::{ActorManager, ActorQueue, TickSummary};
use crate::config::RuntimeConfig;
use crate::context::GameContext;
use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, SessionEvent};
use crate::persistence::{SessionSnapshot, SnapshotSummary};
use crate::repository::{FilePlayerRepository, PlayerRepository};
use crate::session::GameSession;

/// Main runtime that owns one game session.
///
/// All canonical state is mutated through `&mut self` on the thread that
/// calls [`tick`](Self::tick). Other threads reach the actor set only through
/// the cloneable [`ActorQueue`].
pub struct Runtime {
    config: RuntimeConfig,
    context: GameContext,
    session: GameSession,
    actors: ActorManager,
    events: EventBus,
    ticks: u64,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Producer handle for actor add/remove requests.
    pub fn queue(&self) -> ActorQueue {
        self.actors.queue()
    }

    /// Advances the session by one tick.
    ///
    /// Pending actor changes are applied first, then actors, the session and
    /// every world run their per-tick hooks.
    pub fn tick(&mut self) -> TickSummary {
        let summary = self.actors.update(&self.context);
        self.session.update();
        self.ticks += 1;
        summary
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Writes the session to `path` and every live player to the player
    /// repository. Returns the size of the session save.
    pub fn save_session(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = SessionSnapshot::encode(&self.session, self.context.version())?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| save_file_error(parent, source))?;
        }
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &bytes).map_err(|source| save_file_error(&temp_path, source))?;
        fs::rename(&temp_path, path).map_err(|source| save_file_error(path, source))?;

        let players = self.actors.save_players(&self.context);
        info!(
            target: "persistence",
            path = %path.display(),
            bytes = bytes.len(),
            players,
            "session saved"
        );
        self.events.publish(SessionEvent::Saved {
            path: path.to_path_buf(),
            bytes: bytes.len(),
            players,
        });
        Ok(bytes.len())
    }

    /// Restores the session saved at `path` into the current session.
    ///
    /// Returns `Ok(None)` when there is no save yet. Data whose type no active
    /// module provides is skipped.
    pub fn load_session(&mut self, path: impl AsRef<Path>) -> Result<Option<SnapshotSummary>> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(target: "persistence", path = %path.display(), "no session save");
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(|source| save_file_error(path, source))?;
        let summary =
            SessionSnapshot::decode_into(&bytes, &mut self.session, self.context.data_types())?;

        info!(
            target: "persistence",
            path = %path.display(),
            game_version = %summary.version.game_version,
            worlds = summary.worlds.loaded,
            skipped_worlds = summary.worlds.skipped,
            "session loaded"
        );
        self.events.publish(SessionEvent::Loaded {
            path: path.to_path_buf(),
            game_version: summary.version.game_version.clone(),
            worlds: summary.worlds.loaded,
        });
        Ok(Some(summary))
    }

    /// Saves to the configured session path.
    pub fn save(&self) -> Result<usize> {
        self.save_session(self.config.session_path())
    }

    /// Loads from the configured session path.
    pub fn load(&mut self) -> Result<Option<SnapshotSummary>> {
        let path = self.config.session_path();
        self.load_session(path)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.context
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn actors(&self) -> &ActorManager {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut ActorManager {
        &mut self.actors
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

fn save_file_error(path: &Path, source: std::io::Error) -> RuntimeError {
    RuntimeError::SaveFile {
        path: PathBuf::from(path),
        source,
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    modules: Vec<Box<dyn ContentModule>>,
    players: Option<Arc<dyn PlayerRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            modules: Vec::new(),
            players: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends a content module; modules load in the order they are added.
    pub fn module(mut self, module: impl ContentModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn modules(mut self, modules: impl IntoIterator<Item = Box<dyn ContentModule>>) -> Self {
        self.modules.extend(modules);
        self
    }

    /// Set the player repository.
    ///
    /// Defaults to a [`FilePlayerRepository`] under the configured save
    /// directory.
    pub fn player_repository(mut self, players: Arc<dyn PlayerRepository>) -> Self {
        self.players = Some(players);
        self
    }

    /// Loads every module and assembles the runtime.
    pub fn build(self) -> Result<Runtime> {
        let Self {
            config,
            modules,
            players,
        } = self;

        let context = GameContext::load(&modules, config.save_version())?;
        let players: Arc<dyn PlayerRepository> = match players {
            Some(players) => players,
            None => Arc::new(FilePlayerRepository::new(config.players_dir())?),
        };
        let events = EventBus::with_capacity(config.event_buffer_size);
        let actors = ActorManager::new(events.clone(), players);

        Ok(Runtime {
            config,
            context,
            session: GameSession::new(),
            actors,
            events,
            ticks: 0,
        })
    }
}
