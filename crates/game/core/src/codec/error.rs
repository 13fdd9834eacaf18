//! Error types raised by the state codec.

use thiserror::Error;

use crate::error::{ErrorSeverity, GameError};

/// Errors surfaced while encoding or decoding persisted state.
///
/// Running out of input is reported as [`CodecError::Truncated`] so callers can
/// treat a short frame as an ordinary, recoverable outcome.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid length prefix {0}")]
    InvalidLength(i64),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl CodecError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Returns true if the error means the input simply ended early.
    pub const fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

impl GameError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Truncated { .. } => ErrorSeverity::Recoverable,
            Self::InvalidLength(_) | Self::InvalidUtf8 | Self::InvalidBool(_) => {
                ErrorSeverity::Validation
            }
            Self::Malformed(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "CODEC_TRUNCATED",
            Self::InvalidLength(_) => "CODEC_INVALID_LENGTH",
            Self::InvalidUtf8 => "CODEC_INVALID_UTF8",
            Self::InvalidBool(_) => "CODEC_INVALID_BOOL",
            Self::Malformed(_) => "CODEC_MALFORMED",
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
