//! Authoritative game state representation.
//!
//! Entity records (hexes, cities, players, armies) live in a
//! [`ComponentStore`](crate::store::ComponentStore). The turn singleton is not
//! a store record: it is carried explicitly in [`SimulationState`] and passed
//! to every system that needs it, so initialization order stays visible.
pub mod types;

pub use types::{
    Army, ArmyId, City, CityId, CityKind, Component, ComponentKind, EntityId, Hex, HexTile,
    MapInitialized, Player, PlayerId, Record, Turn,
};

/// Simulation-wide state that lives outside the component store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationState {
    /// The turn singleton. `None` until the first tick initializes it.
    pub turn: Option<Turn>,

    /// Number of ticks that ran to completion.
    pub tick: u64,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat currently allowed to act, if the turn has been initialized.
    pub fn active_player(&self) -> Option<PlayerId> {
        self.turn.as_ref().map(|turn| turn.active_player)
    }
}
