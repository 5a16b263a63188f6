//! Component store seam.
//!
//! The store owns every entity record (hexes, cities, players, armies, the
//! generation marker) keyed by an opaque [`EntityId`]. The core only talks to
//! it through [`ComponentStore`]; [`InMemoryStore`] is the reference backend
//! used by the runtime and tests, and [`FaultyStore`] wraps any backend to
//! inject failures.
//!
//! The trait is record-oriented so it stays object safe. The free functions
//! below add the typed view (`get_component::<Army>`) on top of it.

#[cfg(feature = "serde")]
mod digest;
mod error;
mod faulty;
mod memory;

use std::ops::ControlFlow;

#[cfg(feature = "serde")]
pub use digest::digest;
pub use error::{Result, StoreError};
pub use faulty::FaultyStore;
pub use memory::InMemoryStore;

use crate::state::{Component, ComponentKind, EntityId, Player, PlayerId, Record};

/// Signature used to select records in [`ComponentStore::search`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Every record of the given kind.
    Kind(ComponentKind),
    /// Armies whose owner equals the given player entity.
    ArmiesOwnedBy(EntityId),
    /// The player sitting in the given seat.
    PlayerInSeat(PlayerId),
}

impl Filter {
    pub fn matches(&self, record: &Record) -> bool {
        match (self, record) {
            (Filter::Kind(kind), record) => record.kind() == *kind,
            (Filter::ArmiesOwnedBy(owner), Record::Army(army)) => army.owner == *owner,
            (Filter::PlayerInSeat(seat), Record::Player(player)) => player.seat == *seat,
            _ => false,
        }
    }
}

/// Typed record storage keyed by entity id.
///
/// Implementations must be linearizable for the duration of a tick and must
/// visit search results in ascending entity-id order so every consumer sees
/// the same sequence.
pub trait ComponentStore: Send {
    /// Stores a new record and returns the freshly minted id.
    fn create(&mut self, record: Record) -> Result<EntityId>;

    /// Returns a copy of the record held by `id`.
    fn get(&self, id: EntityId) -> Result<Record>;

    /// Replaces the record held by `id`. The entity must exist.
    fn set(&mut self, id: EntityId, record: Record) -> Result<()>;

    /// Visits matching ids in ascending order until the visitor breaks.
    fn search(
        &self,
        filter: &Filter,
        visit: &mut dyn FnMut(EntityId) -> ControlFlow<()>,
    ) -> Result<()>;
}

pub fn create_component<S, T>(store: &mut S, value: T) -> Result<EntityId>
where
    S: ComponentStore + ?Sized,
    T: Component,
{
    store.create(value.into_record())
}

pub fn get_component<S, T>(store: &S, id: EntityId) -> Result<T>
where
    S: ComponentStore + ?Sized,
    T: Component,
{
    let record = store.get(id)?;
    let found = record.kind();
    T::from_record(record).ok_or(StoreError::KindMismatch {
        id,
        expected: T::KIND,
        found,
    })
}

pub fn set_component<S, T>(store: &mut S, id: EntityId, value: T) -> Result<()>
where
    S: ComponentStore + ?Sized,
    T: Component,
{
    store.set(id, value.into_record())
}

/// Collects every matching id. Use when the caller mutates while iterating.
pub fn search_ids<S>(store: &S, filter: Filter) -> Result<Vec<EntityId>>
where
    S: ComponentStore + ?Sized,
{
    let mut ids = Vec::new();
    store.search(&filter, &mut |id| {
        ids.push(id);
        ControlFlow::Continue(())
    })?;
    Ok(ids)
}

/// First matching id, stopping the search at the first hit.
pub fn find_first<S>(store: &S, filter: Filter) -> Result<Option<EntityId>>
where
    S: ComponentStore + ?Sized,
{
    let mut found = None;
    store.search(&filter, &mut |id| {
        found = Some(id);
        ControlFlow::Break(())
    })?;
    Ok(found)
}

/// The player record that holds `seat`.
///
/// An interrupted world generation can leave extra records for the same seat.
/// Only finalized records (`entity` points back at the record) qualify, and
/// the newest one wins, so every caller resolves a seat to the same entity.
pub fn seated_player<S>(store: &S, seat: PlayerId) -> Result<Option<(EntityId, Player)>>
where
    S: ComponentStore + ?Sized,
{
    let candidates: Vec<(EntityId, Player)> = load_all(store, Filter::PlayerInSeat(seat))?;
    Ok(candidates
        .into_iter()
        .filter(|(id, player)| player.entity == Some(*id))
        .max_by_key(|(id, _)| *id))
}

/// Loads every matching record as `T`, paired with its id.
pub fn load_all<S, T>(store: &S, filter: Filter) -> Result<Vec<(EntityId, T)>>
where
    S: ComponentStore + ?Sized,
    T: Component,
{
    search_ids(store, filter)?
        .into_iter()
        .map(|id| get_component::<S, T>(store, id).map(|value| (id, value)))
        .collect()
}

pub fn count<S>(store: &S, filter: Filter) -> Result<usize>
where
    S: ComponentStore + ?Sized,
{
    let mut total = 0;
    store.search(&filter, &mut |_| {
        total += 1;
        ControlFlow::Continue(())
    })?;
    Ok(total)
}

/// Every record in the store, in id order.
pub fn snapshot<S>(store: &S) -> Result<Vec<(EntityId, Record)>>
where
    S: ComponentStore + ?Sized,
{
    let mut ids = Vec::new();
    for kind in ComponentKind::ALL {
        ids.extend(search_ids(store, Filter::Kind(kind))?);
    }
    ids.sort_unstable();

    ids.into_iter()
        .map(|id| store.get(id).map(|record| (id, record)))
        .collect()
}
