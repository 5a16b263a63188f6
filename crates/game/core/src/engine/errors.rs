//! Error types for the turn engine.

use crate::error::{ErrorSeverity, GameError};
use crate::state::PlayerId;
use crate::store::StoreError;

/// Cross-entity invariants the engine found broken.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    #[error("turn record has not been initialized")]
    TurnMissing,

    #[error("no player sits in seat {0}")]
    PlayerNotFound(PlayerId),

    #[error("player rotation is empty")]
    NoPlayers,
}

/// Errors that abort the current tick.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::Store(error) => error.severity(),
            TurnError::Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::Store(error) => error.error_code(),
            TurnError::Invariant(InvariantViolation::TurnMissing) => "TURN_MISSING",
            TurnError::Invariant(InvariantViolation::PlayerNotFound(_)) => "TURN_PLAYER_NOT_FOUND",
            TurnError::Invariant(InvariantViolation::NoPlayers) => "TURN_NO_PLAYERS",
        }
    }
}
