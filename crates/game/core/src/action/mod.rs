//! Player requests and their replies.
//!
//! Every request implements [`RequestTransition`] and runs through
//! [`TurnEngine::execute`]. A request that breaks a game rule is answered
//! with a failed [`Reply`]; it is never an error. Errors are reserved for
//! store failures and broken invariants, and those abort the tick.

mod end_turn;
mod move_army;

pub use end_turn::{EndTurn, handle_end_turn};
pub use move_army::{MoveArmy, handle_move_army};

use crate::engine::{InvariantViolation, TurnEngine, TurnError};
use crate::store::{ComponentStore, StoreError};

/// Answer sent back to the player who submitted a request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reply {
    pub success: bool,
    pub message: String,
}

pub type EndTurnReply = Reply;
pub type MoveArmyReply = Reply;

impl Reply {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            success: false,
            message: rejection.to_string(),
        }
    }
}

/// Rule violations. These become the `message` of a failed [`Reply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("It's not your turn")]
    NotYourTurn,

    #[error("Army not found")]
    ArmyNotFound,

    #[error("Army has already moved this turn")]
    ArmyAlreadyMoved,

    #[error("Destination is off the map")]
    OffMap,

    #[error("Destination is out of range")]
    OutOfRange { distance: u32, range: u32 },
}

/// Result of [`RequestTransition::pre_validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("request rejected: {0}")]
    Rejected(Rejection),

    #[error(transparent)]
    Fatal(TurnError),
}

impl From<Rejection> for RequestError {
    fn from(rejection: Rejection) -> Self {
        RequestError::Rejected(rejection)
    }
}

impl From<TurnError> for RequestError {
    fn from(error: TurnError) -> Self {
        RequestError::Fatal(error)
    }
}

impl From<StoreError> for RequestError {
    fn from(error: StoreError) -> Self {
        RequestError::Fatal(error.into())
    }
}

impl From<InvariantViolation> for RequestError {
    fn from(error: InvariantViolation) -> Self {
        RequestError::Fatal(error.into())
    }
}

/// Defines how a player request is checked and then applied.
///
/// `pre_validate` sees the state before mutation and must not write. `apply`
/// may assume `pre_validate` passed.
pub trait RequestTransition {
    /// Message of the successful reply.
    fn success_message(&self) -> &'static str;

    fn pre_validate<S>(&self, engine: &TurnEngine<'_, S>) -> Result<(), RequestError>
    where
        S: ComponentStore + ?Sized;

    fn apply<S>(&self, engine: &mut TurnEngine<'_, S>) -> Result<(), TurnError>
    where
        S: ComponentStore + ?Sized;
}
