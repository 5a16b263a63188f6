//! Turn progression and request execution.
//!
//! The [`TurnEngine`] is the only writer of the turn singleton. It borrows the
//! simulation state, the component store and the game config for the
//! duration of one stage and exposes the turn state machine
//! ([`turns`](self)) plus the request pipeline ([`TurnEngine::execute`]).

mod errors;
pub mod movement;
mod turns;

pub use errors::{InvariantViolation, TurnError};
pub use turns::{Activation, Evaluation, next_player};

use crate::action::{Reply, RequestError, RequestTransition};
use crate::config::GameConfig;
use crate::state::{SimulationState, Turn};
use crate::store::ComponentStore;

/// Borrowing façade over state, store and config for one pipeline stage.
///
/// Requests flow through a two-step pipeline:
/// pre_validate → apply
///
/// A rejection in `pre_validate` becomes a failed [`Reply`] and leaves every
/// record untouched. Store or invariant failures in either step surface as
/// [`TurnError`] and abort the tick.
pub struct TurnEngine<'a, S: ComponentStore + ?Sized> {
    state: &'a mut SimulationState,
    store: &'a mut S,
    config: &'a GameConfig,
}

impl<'a, S: ComponentStore + ?Sized> TurnEngine<'a, S> {
    pub fn new(state: &'a mut SimulationState, store: &'a mut S, config: &'a GameConfig) -> Self {
        Self {
            state,
            store,
            config,
        }
    }

    /// Validates and applies a player request.
    pub fn execute<R: RequestTransition>(&mut self, request: &R) -> Result<Reply, TurnError> {
        match request.pre_validate(self) {
            Ok(()) => {}
            Err(RequestError::Rejected(rejection)) => return Ok(Reply::rejected(rejection)),
            Err(RequestError::Fatal(error)) => return Err(error),
        }

        request.apply(self)?;

        Ok(Reply::success(request.success_message()))
    }

    pub fn state(&self) -> &SimulationState {
        &*self.state
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    pub fn config(&self) -> &GameConfig {
        self.config
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut *self.store
    }

    /// Mutable access to the committed turn, for in-turn bookkeeping only.
    pub(crate) fn turn_mut(&mut self) -> Result<&mut Turn, TurnError> {
        self.state
            .turn
            .as_mut()
            .ok_or(TurnError::Invariant(InvariantViolation::TurnMissing))
    }
}
