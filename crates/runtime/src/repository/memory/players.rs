//! In-memory PlayerRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::repository::{PlayerRepository, RepositoryError, Result};

/// In-memory implementation of PlayerRepository.
///
/// Stores encoded player data keyed by account for testing and local
/// development.
pub struct InMemoryPlayerRepository {
    players: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryPlayerRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerRepository for InMemoryPlayerRepository {
    fn save(&self, account: &str, bytes: &[u8]) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        players.insert(account.to_owned(), bytes.to_vec());
        Ok(())
    }

    fn load(&self, account: &str) -> Result<Option<Vec<u8>>> {
        let players = self
            .players
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(players.get(account).cloned())
    }

    fn exists(&self, account: &str) -> bool {
        self.players
            .read()
            .map(|players| players.contains_key(account))
            .unwrap_or(false)
    }

    fn delete(&self, account: &str) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        players.remove(account);
        Ok(())
    }

    fn list_accounts(&self) -> Result<Vec<String>> {
        let players = self
            .players
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut accounts: Vec<String> = players.keys().cloned().collect();
        accounts.sort_unstable();
        Ok(accounts)
    }
}
