//! Error type raised by component store implementations.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ComponentKind, EntityId};

/// Failures of create/get/set/search calls. Always fatal to the current tick.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoreError {
    #[error("entity {0} not found")]
    NotFound(EntityId),

    #[error("entity {id} holds a {found} record, expected {expected}")]
    KindMismatch {
        id: EntityId,
        expected: ComponentKind,
        found: ComponentKind,
    },

    #[error("entity id space exhausted")]
    IdOverflow,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record encoding failed: {0}")]
    Encoding(String),
}

impl GameError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StoreError::Unavailable(_) => ErrorSeverity::Recoverable,
            StoreError::NotFound(_)
            | StoreError::KindMismatch { .. }
            | StoreError::Encoding(_) => ErrorSeverity::Internal,
            StoreError::IdOverflow => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "STORE_NOT_FOUND",
            StoreError::KindMismatch { .. } => "STORE_KIND_MISMATCH",
            StoreError::IdOverflow => "STORE_ID_OVERFLOW",
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
            StoreError::Encoding(_) => "STORE_ENCODING",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
