//! Deterministic rules of a turn-based hex-grid strategy game.
//!
//! `hexwar-core` owns the data model (hexes, cities, players, armies, the
//! turn singleton), the component store seam, world generation, the turn
//! state machine and the player requests. It performs no I/O and no logging;
//! the runtime crate drives it one tick at a time.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod query;
pub mod state;
pub mod store;
pub mod world;

pub use action::{
    EndTurn, EndTurnReply, MoveArmy, MoveArmyReply, Rejection, Reply, RequestError,
    RequestTransition, handle_end_turn, handle_move_army,
};
pub use config::{ConfigError, GameConfig};
pub use engine::{Activation, Evaluation, InvariantViolation, TurnEngine, TurnError, next_player};
pub use error::{ErrorSeverity, GameError};
pub use query::{ArmyStatus, PlayerStatus, QueryError, player_status};
pub use state::{
    Army, ArmyId, City, CityId, CityKind, Component, ComponentKind, EntityId, Hex, HexTile,
    MapInitialized, Player, PlayerId, Record, SimulationState, Turn,
};
pub use store::{ComponentStore, FaultyStore, Filter, InMemoryStore, StoreError};
pub use world::{GenerationError, GenerationOutcome, GenerationReport, generate_world_if_absent};
