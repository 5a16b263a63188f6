//! Common error infrastructure for hexwar-core.
//!
//! Domain errors (`StoreError`, `TurnError`, `ConfigError`) live next to the
//! code that raises them and implement [`GameError`] so callers can decide how
//! to react without matching on every variant.
//!
//! Business-rule failures of player requests (wrong turn, army already moved)
//! are not errors at all: they are answered with a failed reply and leave the
//! state untouched. Everything that does surface as an error aborts the
//! current tick.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; rerunning the whole tick may succeed.
    ///
    /// Examples: store backend unavailable.
    Recoverable,

    /// Invalid input that must be fixed before retrying.
    ///
    /// Examples: malformed configuration.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    ///
    /// Examples: turn points at a seat no player occupies.
    Internal,

    /// State cannot be trusted any longer.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all hexwar-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, stable across releases.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
