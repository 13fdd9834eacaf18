//! Runtime for a moddable game session.
//!
//! This crate wires loaded content, per-owner instance data, persistence and
//! the live actor set into a single [`Runtime`] a host engine drives tick by
//! tick.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`context`] holds what loaded modules contributed
//! - [`actors`] owns live actors and the queue that feeds them
//! - [`session`] defines the data owners (actor, world, session)
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`persistence`] and [`repository`] encode and store saves
pub mod actors;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod persistence;
pub mod repository;
pub mod runtime;
pub mod session;

pub use actors::{
    Actor, ActorHandle, ActorManager, ActorQueue, HostActor, NpcActor, PlayerActor, TickSummary,
};
pub use config::RuntimeConfig;
pub use context::GameContext;
pub use error::{Result, RuntimeError};
pub use events::{ActorEvent, ActorKind, Event, EventBus, SessionEvent, Topic};
pub use persistence::{PlayerRecord, SessionSnapshot, SnapshotSummary};
pub use repository::{
    FilePlayerRepository, InMemoryPlayerRepository, PlayerRepository, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use session::{ActorOwner, GameSession, SessionOwner, World, WorldOwner};
