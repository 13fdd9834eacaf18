//! Unified error type surfaced by the runtime.
use std::path::PathBuf;

use game_content::ContentError;
use game_core::{CodecError, ErrorSeverity, GameError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("failed to access save file {path}")]
    SaveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Content(err) => err.severity(),
            Self::Repository(err) => err.severity(),
            Self::Codec(err) => err.severity(),
            Self::SaveFile { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Content(err) => err.error_code(),
            Self::Repository(err) => err.error_code(),
            Self::Codec(err) => err.error_code(),
            Self::SaveFile { .. } => "RUNTIME_SAVE_FILE",
        }
    }
}
