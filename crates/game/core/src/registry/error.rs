use std::path::PathBuf;

use thiserror::Error;

use crate::error::{ErrorSeverity, GameError};

/// A single definition could not be built from its source.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("definition is missing required component `{component}`")]
    MissingComponent { component: &'static str },

    #[cfg(feature = "json")]
    #[error("invalid definition JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid definition `{id}`: {reason}")]
    Invalid { id: String, reason: String },
}

impl DefinitionError {
    pub fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl GameError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingComponent { .. } => "DEFINITION_MISSING_COMPONENT",
            #[cfg(feature = "json")]
            Self::Json(_) => "DEFINITION_JSON",
            Self::Invalid { .. } => "DEFINITION_INVALID",
        }
    }
}

/// Bulk registration from disk failed.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load definition {path}: {source}")]
    InvalidDefinition {
        path: PathBuf,
        #[source]
        source: DefinitionError,
    },

    #[cfg(feature = "json")]
    #[error("failed to walk definition directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidDefinition { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "REGISTRY_IO",
            Self::InvalidDefinition { .. } => "REGISTRY_INVALID_DEFINITION",
            #[cfg(feature = "json")]
            Self::Walk(_) => "REGISTRY_WALK",
        }
    }
}
