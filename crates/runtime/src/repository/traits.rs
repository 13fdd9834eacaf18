//! Repository contracts for saving and loading per-player state.

use crate::repository::Result;

/// Repository for persisted player data.
///
/// Players carry their data across sessions and worlds, so it is stored per
/// account rather than inside the session snapshot. Values are opaque
/// encoded blobs (see [`crate::persistence::PlayerRecord`]).
pub trait PlayerRepository: Send + Sync {
    /// Save a player's encoded data under `account`
    fn save(&self, account: &str, bytes: &[u8]) -> Result<()>;

    /// Load a player's encoded data, if any was saved
    fn load(&self, account: &str) -> Result<Option<Vec<u8>>>;

    /// Check if data exists for `account`
    fn exists(&self, account: &str) -> bool;

    /// Delete a player's data
    fn delete(&self, account: &str) -> Result<()>;

    /// List all accounts with saved data
    fn list_accounts(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
