use crate::config::GameConfig;
use crate::engine::{TurnEngine, TurnError};
use crate::state::{PlayerId, SimulationState};
use crate::store::ComponentStore;

use super::{EndTurnReply, Rejection, RequestError, RequestTransition};

/// A player gives up the rest of its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurn {
    pub player: PlayerId,
}

impl EndTurn {
    pub fn new(player: PlayerId) -> Self {
        Self { player }
    }
}

impl RequestTransition for EndTurn {
    fn success_message(&self) -> &'static str {
        "Turn ended successfully"
    }

    fn pre_validate<S>(&self, engine: &TurnEngine<'_, S>) -> Result<(), RequestError>
    where
        S: ComponentStore + ?Sized,
    {
        if engine.turn()?.active_player != self.player {
            return Err(Rejection::NotYourTurn.into());
        }
        Ok(())
    }

    fn apply<S>(&self, engine: &mut TurnEngine<'_, S>) -> Result<(), TurnError>
    where
        S: ComponentStore + ?Sized,
    {
        engine.advance_to_next_player()?;
        Ok(())
    }
}

pub fn handle_end_turn<S>(
    state: &mut SimulationState,
    store: &mut S,
    config: &GameConfig,
    request: &EndTurn,
) -> Result<EndTurnReply, TurnError>
where
    S: ComponentStore + ?Sized,
{
    TurnEngine::new(state, store, config).execute(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::testing::started_game;
    use crate::engine::InvariantViolation;
    use crate::store::{FaultyStore, InMemoryStore};

    #[test]
    fn active_player_hands_over_and_cannot_end_twice() {
        let config = GameConfig::default();
        let (mut state, mut store) = started_game(&config);

        let request = EndTurn::new(PlayerId(1));
        let reply = handle_end_turn(&mut state, &mut store, &config, &request).unwrap();
        assert!(reply.success);
        assert_eq!(reply.message, "Turn ended successfully");
        assert_eq!(state.active_player(), Some(PlayerId(2)));

        let request = EndTurn::new(PlayerId(1));
        let reply = handle_end_turn(&mut state, &mut store, &config, &request).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message, "It's not your turn");
        assert_eq!(state.active_player(), Some(PlayerId(2)));
    }

    #[test]
    fn rejection_leaves_everything_untouched() {
        let config = GameConfig::default();
        let (mut state, mut store) = started_game(&config);
        let state_before = state.clone();
        let store_before = store.clone();

        let request = EndTurn::new(PlayerId(3));
        let reply = handle_end_turn(&mut state, &mut store, &config, &request).unwrap();
        assert_eq!(
            reply,
            EndTurnReply {
                success: false,
                message: "It's not your turn".into()
            }
        );
        assert_eq!(state, state_before);
        assert_eq!(store, store_before);
    }

    #[test]
    fn requests_in_seat_order_cycle_the_table() {
        let config = GameConfig::default();
        let (mut state, mut store) = started_game(&config);

        for seat in [1, 2, 3, 4, 1] {
            let request = EndTurn::new(PlayerId(seat));
            let reply = handle_end_turn(&mut state, &mut store, &config, &request).unwrap();
            assert!(reply.success, "seat {seat} should be active");
        }
        assert_eq!(state.active_player(), Some(PlayerId(2)));
        assert_eq!(state.turn.as_ref().map(|turn| turn.turn_id), Some(6));
    }

    #[test]
    fn missing_turn_is_fatal() {
        let config = GameConfig::default();
        let mut state = SimulationState::new();
        let mut store = InMemoryStore::new();

        assert_eq!(
            handle_end_turn(&mut state, &mut store, &config, &EndTurn::new(PlayerId(1))),
            Err(TurnError::Invariant(InvariantViolation::TurnMissing))
        );
    }

    #[test]
    fn failed_hand_over_keeps_the_turn_and_can_be_retried() {
        let config = GameConfig::default();
        let (mut state, store) = started_game(&config);
        let turn_before = state.turn.clone();
        let mut store = FaultyStore::new(store);

        let request = EndTurn::new(PlayerId(1));
        store.fail_after_writes(1);
        let result = handle_end_turn(&mut state, &mut store, &config, &request);
        assert!(matches!(result, Err(TurnError::Store(_))));
        assert_eq!(state.turn, turn_before);

        store.heal();
        let reply = handle_end_turn(&mut state, &mut store, &config, &request).unwrap();
        assert_eq!(reply, EndTurnReply::success("Turn ended successfully"));
        assert_eq!(state.active_player(), Some(PlayerId(2)));
    }
}
