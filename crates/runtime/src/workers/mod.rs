//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single owner of the simulation state, the
//! component store and the request inbox.

mod simulation;

pub use simulation::{Command, SimulationWorker};
