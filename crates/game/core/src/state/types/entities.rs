use super::{ArmyId, CityId, EntityId, Hex, PlayerId};

/// A participant in the rotation, owner of one capital and its armies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    /// Seat in the turn rotation.
    pub seat: PlayerId,
    /// Store handle of this record. Back-filled once the store has minted it;
    /// `None` only while the player is still a draft.
    pub entity: Option<EntityId>,
    pub nickname: String,
    pub capital_city: CityId,
    /// Spendable resources (gold, army points).
    pub resources: i64,
    /// Set while it is this player's turn. At most one player has it at rest.
    pub is_active_turn: bool,
}

impl Player {
    pub fn new(seat: PlayerId, nickname: impl Into<String>, capital_city: CityId) -> Self {
        Self {
            seat,
            entity: None,
            nickname: nickname.into(),
            capital_city,
            resources: 0,
            is_active_turn: false,
        }
    }

    pub fn with_resources(mut self, resources: i64) -> Self {
        self.resources = resources;
        self
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CityKind {
    /// Seat of a player; exactly one per player.
    Capital,
    Regular,
}

/// A city placed on the map at generation time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub id: CityId,
    pub kind: CityKind,
    /// Owning player's entity. `None` for unowned cities.
    pub owner: Option<EntityId>,
    pub production_rate: u32,
    pub defenses: u32,
    pub position: Hex,
}

/// A player's army. Moves at most once per turn of its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Army {
    pub id: ArmyId,
    /// Owning player's entity.
    pub owner: EntityId,
    pub strength: u32,
    pub position: Hex,
    /// Maximum hex distance covered by a single move.
    pub movement_range: u32,
    pub has_moved: bool,
}

/// Static map cell. Carries no owner and never changes once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexTile {
    pub hex: Hex,
}

/// Marker whose presence means world generation finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapInitialized;
