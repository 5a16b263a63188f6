//! Per-army "moved this turn" tracking.
//!
//! The army record is the source of truth; the turn's `moved_armies` map is a
//! mirror for the active player only and is rebuilt from the records.

use crate::state::{Army, EntityId, Hex, Turn};
use crate::store::{self, ComponentStore, Filter, StoreError};

/// Armies owned by `owner`, in entity-id order.
pub fn armies_of<S>(store: &S, owner: EntityId) -> Result<Vec<(EntityId, Army)>, StoreError>
where
    S: ComponentStore + ?Sized,
{
    store::load_all(store, Filter::ArmiesOwnedBy(owner))
}

/// True iff every listed army has moved. Vacuously true for no armies.
pub fn all_moved(armies: &[(EntityId, Army)]) -> bool {
    armies.iter().all(|(_, army)| army.has_moved)
}

/// True iff every army owned by `owner` has moved.
///
/// A player without armies has nothing left to do, so this returns true for
/// an empty roster and the turn passes on.
pub fn all_armies_moved<S>(store: &S, owner: EntityId) -> Result<bool, StoreError>
where
    S: ComponentStore + ?Sized,
{
    Ok(all_moved(&armies_of(store, owner)?))
}

/// Records a completed move: new position and the moved flag.
pub fn mark_moved<S>(
    store: &mut S,
    army_entity: EntityId,
    destination: Hex,
) -> Result<Army, StoreError>
where
    S: ComponentStore + ?Sized,
{
    let mut army: Army = store::get_component(&*store, army_entity)?;
    army.position = destination;
    army.has_moved = true;
    store::set_component(store, army_entity, army.clone())?;
    Ok(army)
}

/// Clears the moved flag on every army of `owner`. Returns how many changed.
pub fn reset_moved<S>(store: &mut S, owner: EntityId) -> Result<usize, StoreError>
where
    S: ComponentStore + ?Sized,
{
    let mut cleared = 0;
    for (id, mut army) in armies_of(&*store, owner)? {
        if army.has_moved {
            army.has_moved = false;
            store::set_component(store, id, army)?;
            cleared += 1;
        }
    }
    Ok(cleared)
}

/// Mirrors the armies' flags into the turn's bookkeeping map.
pub fn sync_moved_armies(turn: &mut Turn, armies: &[(EntityId, Army)]) {
    turn.moved_armies = armies
        .iter()
        .map(|(id, army)| (*id, army.has_moved))
        .collect();
}
