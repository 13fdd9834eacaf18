//! File-based PlayerRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{PlayerRepository, RepositoryError, Result};

const EXTENSION: &str = "player";

/// File-based implementation of PlayerRepository.
///
/// Stores each player's data as an individual file named after the account.
///
/// # File Format
///
/// Players are stored as `{account}.player`, each holding one encoded
/// [`PlayerRecord`](crate::persistence::PlayerRecord). Writes go to a
/// temporary file first and are renamed into place, so a crash never leaves a
/// half-written record behind.
pub struct FilePlayerRepository {
    base_dir: PathBuf,
}

impl FilePlayerRepository {
    /// Create a new file-based player repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a player file.
    fn player_path(&self, account: &str) -> Result<PathBuf> {
        let valid = !account.is_empty()
            && account
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !account.starts_with('.');
        if !valid {
            return Err(RepositoryError::InvalidKey(account.to_owned()));
        }
        Ok(self.base_dir.join(format!("{account}.{EXTENSION}")))
    }
}

impl PlayerRepository for FilePlayerRepository {
    fn save(&self, account: &str, bytes: &[u8]) -> Result<()> {
        let path = self.player_path(account)?;
        let temp_path = path.with_extension("player.tmp");

        // Write to temp file
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(target: "persistence", account, path = %path.display(), "saved player");

        Ok(())
    }

    fn load(&self, account: &str) -> Result<Option<Vec<u8>>> {
        let path = self.player_path(account)?;

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;

        tracing::debug!(target: "persistence", account, bytes = bytes.len(), "loaded player");

        Ok(Some(bytes))
    }

    fn exists(&self, account: &str) -> bool {
        self.player_path(account)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    fn delete(&self, account: &str) -> Result<()> {
        let path = self.player_path(account)?;

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!(target: "persistence", account, "deleted player");
        }

        Ok(())
    }

    fn list_accounts(&self) -> Result<Vec<String>> {
        let mut accounts = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == EXTENSION)
                && let Some(account) = path.file_stem().and_then(|s| s.to_str())
            {
                accounts.push(account.to_owned());
            }
        }

        accounts.sort_unstable();
        Ok(accounts)
    }
}
