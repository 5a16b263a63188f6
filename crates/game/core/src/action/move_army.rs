use crate::config::GameConfig;
use crate::engine::{TurnEngine, TurnError, movement};
use crate::state::{Army, EntityId, Hex, SimulationState};
use crate::store::{self, ComponentStore, StoreError};

use super::{MoveArmyReply, Rejection, RequestError, RequestTransition};

/// Moves one army of the active player to `(q, r)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveArmy {
    pub army: EntityId,
    pub q: i32,
    pub r: i32,
}

impl MoveArmy {
    pub fn new(army: EntityId, destination: Hex) -> Self {
        Self {
            army,
            q: destination.q(),
            r: destination.r(),
        }
    }

    pub fn destination(&self) -> Hex {
        Hex::new(self.q, self.r)
    }
}

impl RequestTransition for MoveArmy {
    fn success_message(&self) -> &'static str {
        "Army moved"
    }

    fn pre_validate<S>(&self, engine: &TurnEngine<'_, S>) -> Result<(), RequestError>
    where
        S: ComponentStore + ?Sized,
    {
        let active = engine.turn()?.active_player;

        let army: Army = match store::get_component(engine.store(), self.army) {
            Ok(army) => army,
            Err(StoreError::NotFound(_) | StoreError::KindMismatch { .. }) => {
                return Err(Rejection::ArmyNotFound.into());
            }
            Err(error) => return Err(error.into()),
        };

        let (active_entity, player) = engine.resolve_player(active)?;
        if army.owner != active_entity || !player.is_active_turn {
            return Err(Rejection::NotYourTurn.into());
        }

        if army.has_moved {
            return Err(Rejection::ArmyAlreadyMoved.into());
        }

        let destination = self.destination();
        if !engine.config().contains(destination) {
            return Err(Rejection::OffMap.into());
        }

        let distance = army.position.distance(destination);
        if distance > army.movement_range {
            return Err(Rejection::OutOfRange {
                distance,
                range: army.movement_range,
            }
            .into());
        }

        Ok(())
    }

    fn apply<S>(&self, engine: &mut TurnEngine<'_, S>) -> Result<(), TurnError>
    where
        S: ComponentStore + ?Sized,
    {
        movement::mark_moved(engine.store_mut(), self.army, self.destination())?;
        engine.turn_mut()?.moved_armies.insert(self.army, true);
        Ok(())
    }
}

pub fn handle_move_army<S>(
    state: &mut SimulationState,
    store: &mut S,
    config: &GameConfig,
    request: &MoveArmy,
) -> Result<MoveArmyReply, TurnError>
where
    S: ComponentStore + ?Sized,
{
    TurnEngine::new(state, store, config).execute(request)
}
