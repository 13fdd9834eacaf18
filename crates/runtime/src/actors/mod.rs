//! Live actor set and its thread-safe change queue.
//!
//! Host actors enter and leave through an [`ActorQueue`], which any thread may
//! hold. The [`ActorManager`] applies queued changes once per tick and owns
//! the wrappers ([`PlayerActor`], [`NpcActor`]) for as long as they are live.

mod actor;
mod host;
mod manager;
mod queue;

pub use actor::{Actor, NpcActor, PlayerActor};
pub use host::{ActorHandle, HostActor};
pub use manager::{ActorManager, TickSummary};
pub use queue::ActorQueue;
