//! Runtime configuration and its environment loader.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_core::SaveVersion;

use crate::events::DEFAULT_EVENT_CAPACITY;

/// Configuration shared by the runtime and the host binary.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Per-topic event channel capacity.
    pub event_buffer_size: usize,
    /// Root of session saves and per-player records.
    pub save_dir: PathBuf,
    /// Directory whose subdirectories are loaded as content modules.
    pub mods_dir: PathBuf,
    /// Game version stamped into every save.
    pub game_version: String,
    pub tick_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: DEFAULT_EVENT_CAPACITY,
            save_dir: default_save_dir(),
            mods_dir: PathBuf::from("./mods"),
            game_version: env!("CARGO_PKG_VERSION").to_owned(),
            tick_interval: Duration::from_millis(50),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `EVENT_BUFFER_SIZE` - Per-topic event capacity (default: 100)
    /// - `SAVE_DATA_DIR` - Directory for saves (default: platform-specific)
    /// - `MODS_DIR` - Directory of content modules (default: `./mods`)
    /// - `GAME_VERSION` - Version written into saves (default: crate version)
    /// - `TICK_INTERVAL_MS` - Milliseconds between ticks (default: 50)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("EVENT_BUFFER_SIZE") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(dir) = read_env::<PathBuf>("SAVE_DATA_DIR") {
            config.save_dir = dir;
        }
        if let Some(dir) = read_env::<PathBuf>("MODS_DIR") {
            config.mods_dir = dir;
        }
        if let Ok(version) = env::var("GAME_VERSION")
            && !version.is_empty()
        {
            config.game_version = version;
        }
        if let Some(millis) = read_env::<u64>("TICK_INTERVAL_MS") {
            config.tick_interval = Duration::from_millis(millis.max(1));
        }

        config
    }

    /// Version stamp for saves written with this configuration.
    pub fn save_version(&self) -> SaveVersion {
        SaveVersion::current(self.game_version.clone())
    }

    pub fn session_path(&self) -> PathBuf {
        self.save_dir.join("session.sav")
    }

    pub fn players_dir(&self) -> PathBuf {
        self.save_dir.join("players")
    }
}

/// Platform data directory, falling back to `./save_data`.
fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "modhost")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_paths_live_under_save_dir() {
        let config = RuntimeConfig {
            save_dir: PathBuf::from("/tmp/saves"),
            ..RuntimeConfig::default()
        };
        assert_eq!(config.session_path(), PathBuf::from("/tmp/saves/session.sav"));
        assert_eq!(config.players_dir(), PathBuf::from("/tmp/saves/players"));
    }

    #[test]
    fn save_version_uses_current_format() {
        let config = RuntimeConfig {
            game_version: "2.0.0".into(),
            ..RuntimeConfig::default()
        };
        let version = config.save_version();
        assert_eq!(version.game_version, "2.0.0");
        assert_eq!(version.format_version, SaveVersion::CURRENT_FORMAT);
    }
}
