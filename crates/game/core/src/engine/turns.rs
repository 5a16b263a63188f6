use std::collections::BTreeMap;

use crate::state::{ComponentKind, EntityId, Player, PlayerId, Turn};
use crate::store::{self, ComponentStore, Filter};

use super::errors::{InvariantViolation, TurnError};
use super::{TurnEngine, movement};

/// Seat that follows `current` in a rotation of `count` players.
///
/// Always lands in `[1, count]`. An empty rotation yields seat 1.
pub fn next_player(current: PlayerId, count: u32) -> PlayerId {
    current
        .0
        .checked_rem(count)
        .map_or(PlayerId::FIRST, |rest| PlayerId(rest + 1))
}

/// What [`TurnEngine::activate_current_player`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activation {
    /// True when the active player's flag went from unset to set.
    pub newly_active: bool,
    /// Players whose stale active flag was cleared.
    pub deactivated: usize,
    /// Armies of the active player whose moved flag was reset.
    pub armies_reset: usize,
}

impl Activation {
    pub fn changed_anything(&self) -> bool {
        self.newly_active || self.deactivated > 0 || self.armies_reset > 0
    }
}

/// Outcome of one [`TurnEngine::evaluate_active_player_turn`] pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Evaluation {
    /// The active player's flag is not set yet; nothing was evaluated.
    Inactive,
    /// Some armies still have a move left.
    Waiting { moved: usize, total: usize },
    /// Every army moved and the turn passed on.
    Advanced { turn_id: u64, active_player: PlayerId },
}

impl<'a, S: ComponentStore + ?Sized> TurnEngine<'a, S> {
    /// The committed turn.
    pub fn turn(&self) -> Result<&Turn, TurnError> {
        self.state
            .turn
            .as_ref()
            .ok_or(TurnError::Invariant(InvariantViolation::TurnMissing))
    }

    /// Number of seats in the rotation, fixed by the configuration.
    pub fn player_count(&self) -> Result<u32, TurnError> {
        match self.config().player_count() {
            0 => Err(InvariantViolation::NoPlayers.into()),
            count => Ok(count),
        }
    }

    /// Loads the player sitting in `seat`. See [`store::seated_player`].
    pub fn resolve_player(&self, seat: PlayerId) -> Result<(EntityId, Player), TurnError> {
        store::seated_player(self.store(), seat)?
            .ok_or_else(|| InvariantViolation::PlayerNotFound(seat).into())
    }

    /// Creates the opening turn unless one is already committed.
    ///
    /// Returns true when a turn was created.
    pub fn initialize_if_absent(&mut self) -> Result<bool, TurnError> {
        if self.state.turn.is_some() {
            return Ok(false);
        }

        self.player_count()?;
        self.resolve_player(PlayerId::FIRST)?;
        self.state.turn = Some(Turn::first());
        Ok(true)
    }

    /// Brings the player flags in line with the committed turn.
    pub fn activate_current_player(&mut self) -> Result<Activation, TurnError> {
        let active = self.turn()?.active_player;
        self.activate_seat(active)
    }

    /// Raises the flag of `seat` and clears every other one.
    ///
    /// When the flag was unset, the incoming player's armies get their moved
    /// flag reset before the flag is written. Stale flags are cleared last.
    /// Only changed records are written, so repeating the call after a
    /// failure finishes the job.
    fn activate_seat(&mut self, seat: PlayerId) -> Result<Activation, TurnError> {
        let (incoming, mut player) = self.resolve_player(seat)?;
        let mut activation = Activation::default();

        if !player.is_active_turn {
            activation.armies_reset = movement::reset_moved(self.store_mut(), incoming)?;
            player.is_active_turn = true;
            store::set_component(self.store_mut(), incoming, player)?;
            activation.newly_active = true;
        }

        let players: Vec<(EntityId, Player)> =
            store::load_all(self.store(), Filter::Kind(ComponentKind::Player))?;
        for (entity, mut player) in players {
            if entity != incoming && player.is_active_turn {
                player.is_active_turn = false;
                store::set_component(self.store_mut(), entity, player)?;
                activation.deactivated += 1;
            }
        }

        Ok(activation)
    }

    /// Passes the turn on once the active player has moved every army.
    ///
    /// The turn's `moved_armies` map is refreshed from the army records on
    /// every pass. A player without armies is done immediately.
    pub fn evaluate_active_player_turn(&mut self) -> Result<Evaluation, TurnError> {
        let active = self.turn()?.active_player;
        let (entity, player) = self.resolve_player(active)?;
        if !player.is_active_turn {
            return Ok(Evaluation::Inactive);
        }

        let armies = movement::armies_of(self.store(), entity)?;
        let turn = self.turn_mut()?;
        movement::sync_moved_armies(turn, &armies);
        let moved = turn.moved_count();

        if movement::all_moved(&armies) {
            let turn = self.advance_to_next_player()?;
            return Ok(Evaluation::Advanced {
                turn_id: turn.turn_id,
                active_player: turn.active_player,
            });
        }

        Ok(Evaluation::Waiting {
            moved,
            total: armies.len(),
        })
    }

    /// Hands the turn to the next seat and activates it.
    ///
    /// The new turn is committed only after activation succeeded. On failure
    /// the old turn stays in place and the next
    /// [`activate_current_player`](Self::activate_current_player) hands the
    /// flag back to its player.
    pub fn advance_to_next_player(&mut self) -> Result<Turn, TurnError> {
        let count = self.player_count()?;
        let current = self.turn()?;

        let next = Turn {
            turn_id: current.turn_id + 1,
            active_player: next_player(current.active_player, count),
            moved_armies: BTreeMap::new(),
        };

        self.activate_seat(next.active_player)?;
        self.state.turn = Some(next.clone());
        Ok(next)
    }
}
