use crate::state::{Component, EntityId};
use crate::store::{self, ComponentStore};

/// A record that already lives in the store but still needs fields that
/// depend on ids minted after it (the owner of a capital, a player's own id).
///
/// Creation and patching are separate calls so the two-phase contract is
/// visible at the call site: nothing is rewritten until [`Draft::finalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a draft must be finalized to persist its patched fields"]
pub struct Draft<T> {
    id: EntityId,
    record: T,
}

impl<T: Component> Draft<T> {
    /// Phase one: store the record as-is and keep a local copy to patch.
    pub fn create<S>(store: &mut S, record: T) -> store::Result<Self>
    where
        S: ComponentStore + ?Sized,
    {
        let id = store::create_component(store, record.clone())?;
        Ok(Self { id, record })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn patch(mut self, apply: impl FnOnce(&mut T)) -> Self {
        apply(&mut self.record);
        self
    }

    /// Phase two: write the patched record back under the same id.
    pub fn finalize<S>(self, store: &mut S) -> store::Result<(EntityId, T)>
    where
        S: ComponentStore + ?Sized,
    {
        store::set_component(store, self.id, self.record.clone())?;
        Ok((self.id, self.record))
    }
}
