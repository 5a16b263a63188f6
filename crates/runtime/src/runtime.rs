//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use hexwar_core::{ComponentStore, GameConfig, InMemoryStore};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, GameEvent};
use crate::orchestrator::TickOrchestrator;
use crate::systems::{NoopSystem, TickSystem};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Tick automatically at this period. `None` ticks only on request.
    pub tick_interval: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            tick_interval: None,
        }
    }
}

/// Main runtime that drives the game simulation.
///
/// Runtime owns the worker task; [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to game events
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.handle.subscribe_events()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once this and every cloned handle are dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Box<dyn ComponentStore>>,
    attack: Box<dyn TickSystem>,
    regen: Box<dyn TickSystem>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            attack: Box::new(NoopSystem),
            regen: Box::new(NoopSystem),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the game rules.
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    /// Store backend. Defaults to an empty [`InMemoryStore`].
    pub fn store(mut self, store: impl ComponentStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn attack_system(mut self, system: impl TickSystem + 'static) -> Self {
        self.attack = Box::new(system);
        self
    }

    pub fn regen_system(mut self, system: impl TickSystem + 'static) -> Self {
        self.regen = Box::new(system);
        self
    }

    /// Tick automatically at `period`.
    pub fn tick_interval(mut self, period: Duration) -> Self {
        self.config.tick_interval = Some(period);
        self
    }

    /// Build the runtime and spawn its worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        self.config
            .game_config
            .validate()
            .map_err(RuntimeError::InvalidConfig)?;

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let orchestrator = TickOrchestrator::new(self.config.game_config)
            .with_attack_system(self.attack)
            .with_regen_system(self.regen);
        let store = self
            .store
            .unwrap_or_else(|| Box::new(InMemoryStore::new()) as Box<dyn ComponentStore>);

        let sim_worker = SimulationWorker::new(
            store,
            orchestrator,
            command_rx,
            event_bus,
            self.config.tick_interval,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
