use std::collections::BTreeMap;

use super::{EntityId, PlayerId};

/// Singleton turn record driving the player rotation.
///
/// Only the turn engine replaces it, and only with a fully computed value,
/// so an aborted tick leaves the last committed turn in place.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Turn {
    /// Starts at 1 and grows by one on every hand-over. Never repeats.
    pub turn_id: u64,

    /// Seat whose turn it is.
    pub active_player: PlayerId,

    /// Moved flag per army of the active player, mirrored from the army
    /// records. Cleared whenever the turn passes to the next seat.
    pub moved_armies: BTreeMap<EntityId, bool>,
}

impl Turn {
    /// The opening turn: seat 1 acts, nothing has moved yet.
    pub fn first() -> Self {
        Self {
            turn_id: 1,
            active_player: PlayerId::FIRST,
            moved_armies: BTreeMap::new(),
        }
    }

    /// Number of armies recorded as moved in this turn.
    pub fn moved_count(&self) -> usize {
        self.moved_armies.values().filter(|moved| **moved).count()
    }
}
