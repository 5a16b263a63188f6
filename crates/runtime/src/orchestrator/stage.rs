use serde::{Deserialize, Serialize};

/// One step of a tick.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Populates the world on the first tick.
    GenerateWorld,
    Attack,
    Regen,
    /// Creates the turn singleton and reconciles the active flags.
    InitializeTurn,
    /// Drains queued army moves.
    ApplyMoves,
    /// Passes the turn on once the active player has moved every army.
    EvaluateTurn,
    /// Drains queued end-turn requests.
    EndTurn,
}

impl Stage {
    /// Execution order within a tick.
    ///
    /// Generation precedes everything that reads entities, and the turn is
    /// initialized before any stage that reads it.
    pub const ORDER: [Stage; 7] = [
        Stage::GenerateWorld,
        Stage::Attack,
        Stage::Regen,
        Stage::InitializeTurn,
        Stage::ApplyMoves,
        Stage::EvaluateTurn,
        Stage::EndTurn,
    ];
}
