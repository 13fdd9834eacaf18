//! Common error infrastructure for game-core.
//!
//! Domain errors (`CodecError`, `DefinitionError`, `RegistryError`) live next to
//! the code that raises them. This module holds the shared classification used
//! by callers to decide whether a failure is isolated, rejected, or fatal.
//!
//! # Design Principles
//!
//! - **Isolation first**: most persistence and registration problems affect a
//!   single frame or definition and are logged, not propagated
//! - **Explicit truncation**: running out of bytes is a value, never a panic
//! - **Severity Classification**: errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: isolated to one unit (frame, definition, queued mutation)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: content or stream that cannot be used at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - the surrounding operation continues.
    ///
    /// Examples: unresolvable data type, truncated entry payload
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: malformed JSON definition, negative frame length
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the load cannot continue.
    ///
    /// Examples: definition missing its mandatory identity component
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics and for asserting on error kinds in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
