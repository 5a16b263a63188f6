//! Runtime orchestration for the hex-grid strategy simulation.
//!
//! This crate drives `hexwar-core` one tick at a time. Consumers embed
//! [`Runtime`] to submit player requests, tick the simulation, subscribe to
//! events and query state through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the builder and the worker lifecycle
//! - [`api`] exposes the types downstream clients interact with
//! - [`orchestrator`] runs the fixed stage pipeline of a tick
//! - [`systems`] holds the pluggable per-tick systems
//! - [`events`] publishes what each tick did
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod orchestrator;
pub mod runtime;
pub mod systems;

mod workers;

pub use api::{PendingReply, Result, RuntimeError, RuntimeHandle, StageError};
pub use events::{EventBus, GameEvent};
pub use orchestrator::{RequestInbox, Stage, Ticket, TickOrchestrator, TickReport, TurnChange};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use systems::{NoopSystem, TickSystem};
