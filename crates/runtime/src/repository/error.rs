//! Error types raised by repository implementations.

use game_core::{CodecError, ErrorSeverity, GameError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("not a save file (magic {found:02x?})")]
    BadMagic { found: Vec<u8> },

    #[error("save format {found} is newer than supported format {supported}")]
    UnsupportedFormat { found: u32, supported: u32 },

    #[error("invalid repository key {0:?}")]
    InvalidKey(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl GameError for RepositoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Codec(err) => err.severity(),
            Self::InvalidKey(_) => ErrorSeverity::Validation,
            Self::BadMagic { .. } | Self::UnsupportedFormat { .. } | Self::CorruptedData(_) => {
                ErrorSeverity::Fatal
            }
            Self::LockPoisoned | Self::Io(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "REPOSITORY_LOCK_POISONED",
            Self::Io(_) => "REPOSITORY_IO",
            Self::Codec(err) => err.error_code(),
            Self::BadMagic { .. } => "REPOSITORY_BAD_MAGIC",
            Self::UnsupportedFormat { .. } => "REPOSITORY_UNSUPPORTED_FORMAT",
            Self::InvalidKey(_) => "REPOSITORY_INVALID_KEY",
            Self::CorruptedData(_) => "REPOSITORY_CORRUPTED_DATA",
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
