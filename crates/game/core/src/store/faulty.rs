//! Failure-injecting wrapper around another store.

use std::ops::ControlFlow;

use super::{ComponentStore, Filter, Result, StoreError};
use crate::state::{EntityId, Record};

/// Delegates to `inner` until the configured write budget is spent, then
/// fails every write with [`StoreError::Unavailable`]. Reads keep working
/// unless `fail_reads` is set.
#[derive(Clone, Debug)]
pub struct FaultyStore<S> {
    inner: S,
    writes_left: Option<usize>,
    fail_reads: bool,
}

impl<S: ComponentStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes_left: None,
            fail_reads: false,
        }
    }

    /// Allows `writes` more successful create/set calls, then fails.
    pub fn fail_after_writes(&mut self, writes: usize) {
        self.writes_left = Some(writes);
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Removes every injected failure.
    pub fn heal(&mut self) {
        self.writes_left = None;
        self.fail_reads = false;
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn spend_write(&mut self) -> Result<()> {
        match self.writes_left.as_mut() {
            Some(0) => Err(StoreError::Unavailable("injected write failure".into())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(())
    }
}

impl<S: ComponentStore> ComponentStore for FaultyStore<S> {
    fn create(&mut self, record: Record) -> Result<EntityId> {
        self.spend_write()?;
        self.inner.create(record)
    }

    fn get(&self, id: EntityId) -> Result<Record> {
        self.check_read()?;
        self.inner.get(id)
    }

    fn set(&mut self, id: EntityId, record: Record) -> Result<()> {
        self.spend_write()?;
        self.inner.set(id, record)
    }

    fn search(
        &self,
        filter: &Filter,
        visit: &mut dyn FnMut(EntityId) -> ControlFlow<()>,
    ) -> Result<()> {
        self.check_read()?;
        self.inner.search(filter, visit)
    }
}
