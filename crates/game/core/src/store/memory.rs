//! In-memory ComponentStore implementation for tests and local runs.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use super::{ComponentStore, Filter, Result, StoreError};
use crate::state::{EntityId, Record};

/// Ordered map of records with a monotonically increasing id allocator.
///
/// Ids start at [`EntityId::FIRST`] and are never reused, so two stores fed
/// the same sequence of calls hand out the same ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemoryStore {
    records: BTreeMap<EntityId, Record>,
    next_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: EntityId::FIRST.0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in id order.
    pub fn records(&self) -> impl Iterator<Item = (EntityId, &Record)> + '_ {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// SHA-256 over every record (id order) followed by the turn singleton.
    ///
    /// Two replays of the same inputs must produce the same digest.
    #[cfg(feature = "serde")]
    pub fn digest(&self, turn: Option<&crate::state::Turn>) -> Result<[u8; 32]> {
        super::digest::digest_records(self.records(), turn)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore for InMemoryStore {
    fn create(&mut self, record: Record) -> Result<EntityId> {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(StoreError::IdOverflow)?;
        self.records.insert(id, record);
        Ok(id)
    }

    fn get(&self, id: EntityId) -> Result<Record> {
        self.records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn set(&mut self, id: EntityId, record: Record) -> Result<()> {
        let slot = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = record;
        Ok(())
    }

    fn search(
        &self,
        filter: &Filter,
        visit: &mut dyn FnMut(EntityId) -> ControlFlow<()>,
    ) -> Result<()> {
        for (id, record) in &self.records {
            if filter.matches(record) && visit(*id).is_break() {
                break;
            }
        }
        Ok(())
    }
}
