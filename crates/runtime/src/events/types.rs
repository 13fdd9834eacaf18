//! Event types for different topics.

use std::path::PathBuf;

use game_core::EntityId;
use serde::{Deserialize, Serialize};

/// Wrapper kind chosen for a host actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActorKind {
    Player,
    Npc,
}

/// Events related to the live actor set.
///
/// Raised only from the tick thread while pending mutations are drained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorEvent {
    /// The actor is now indexed and will receive per-tick updates.
    Added { id: EntityId, kind: ActorKind },

    /// The actor left the index; it receives no further updates.
    Removed { id: EntityId, kind: ActorKind },
}

/// Events related to session persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Saved {
        path: PathBuf,
        bytes: usize,
        players: usize,
    },

    Loaded {
        path: PathBuf,
        game_version: String,
        worlds: usize,
    },
}
