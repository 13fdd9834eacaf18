use std::path::PathBuf;

use game_core::{ErrorSeverity, GameError, ModuleId, RegistryError};
use thiserror::Error;

/// Failure while loading a content module.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("module directory {0} has no mod.toml")]
    MissingManifest(PathBuf),

    #[error("invalid manifest {path}: {source}")]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("module {module} failed to register: {reason}")]
    Module { module: ModuleId, reason: String },
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Registry(err) => err.severity(),
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingManifest(_) => "CONTENT_MISSING_MANIFEST",
            Self::InvalidManifest { .. } => "CONTENT_INVALID_MANIFEST",
            Self::Registry(err) => err.error_code(),
            Self::Module { .. } => "CONTENT_MODULE",
        }
    }
}
