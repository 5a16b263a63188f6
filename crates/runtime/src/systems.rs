//! Pluggable per-tick systems.
//!
//! Combat resolution and regeneration are owned by other teams; the tick only
//! reserves their slots. [`NoopSystem`] fills a slot nobody claimed.

use hexwar_core::{ComponentStore, GameConfig, SimulationState, StoreError};

/// A system that runs once per tick in its own stage.
///
/// Systems may read the turn but must never replace it; only the turn engine
/// does that. A returned error aborts the tick.
pub trait TickSystem: Send {
    fn name(&self) -> &'static str;

    fn run(
        &mut self,
        state: &SimulationState,
        store: &mut dyn ComponentStore,
        config: &GameConfig,
    ) -> Result<(), StoreError>;
}

/// Does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSystem;

impl TickSystem for NoopSystem {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn run(
        &mut self,
        _state: &SimulationState,
        _store: &mut dyn ComponentStore,
        _config: &GameConfig,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}
