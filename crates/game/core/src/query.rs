//! Read-only views for clients.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Army, ArmyId, CityId, EntityId, Hex, PlayerId};
use crate::store::{self, ComponentStore, Filter, StoreError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryError {
    #[error("no player sits in seat {0}")]
    PlayerNotFound(PlayerId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError for QueryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            QueryError::PlayerNotFound(_) => ErrorSeverity::Validation,
            QueryError::Store(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            QueryError::PlayerNotFound(_) => "QUERY_PLAYER_NOT_FOUND",
            QueryError::Store(error) => error.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmyStatus {
    /// Store handle, used to address the army in a move request.
    pub entity: EntityId,
    pub army_id: ArmyId,
    pub strength: u32,
    pub position: Hex,
    pub has_moved: bool,
}

impl ArmyStatus {
    pub fn new(entity: EntityId, army: &Army) -> Self {
        Self {
            entity,
            army_id: army.id,
            strength: army.strength,
            position: army.position,
            has_moved: army.has_moved,
        }
    }
}

/// What a player sees about itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStatus {
    pub seat: PlayerId,
    pub nickname: String,
    pub resources: i64,
    pub is_active_turn: bool,
    pub capital_city: CityId,
    pub armies: Vec<ArmyStatus>,
}

pub fn player_status(
    store: &dyn ComponentStore,
    seat: PlayerId,
) -> Result<PlayerStatus, QueryError> {
    let (entity, player) =
        store::seated_player(store, seat)?.ok_or(QueryError::PlayerNotFound(seat))?;
    let armies: Vec<(EntityId, Army)> = store::load_all(store, Filter::ArmiesOwnedBy(entity))?;

    Ok(PlayerStatus {
        seat,
        nickname: player.nickname,
        resources: player.resources,
        is_active_turn: player.is_active_turn,
        capital_city: player.capital_city,
        armies: armies
            .iter()
            .map(|(id, army)| ArmyStatus::new(*id, army))
            .collect(),
    })
}
