//! Fixed-order tick pipeline.
//!
//! Every tick runs [`Stage::ORDER`] against the store, the simulation state
//! and the request inbox. The first failing stage aborts the tick: later
//! stages are skipped, `state.tick` is not advanced, and unanswered requests
//! stay queued for the next tick.

mod inbox;
mod stage;

pub use inbox::{RequestInbox, Ticket};
pub use stage::Stage;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use hexwar_core::{
    Activation, ComponentStore, Evaluation, GameConfig, GenerationOutcome, GenerationReport,
    PlayerId, Reply, SimulationState, Turn, TurnEngine, generate_world_if_absent,
};

use crate::api::{Result, RuntimeError, StageError};
use crate::systems::{NoopSystem, TickSystem};

/// A completed hand-over to the next seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnChange {
    pub turn_id: u64,
    pub active_player: PlayerId,
}

impl From<&Turn> for TurnChange {
    fn from(turn: &Turn) -> Self {
        Self {
            turn_id: turn.turn_id,
            active_player: turn.active_player,
        }
    }
}

/// What one completed tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number; the first tick is 1.
    pub tick: u64,
    pub stages: Vec<Stage>,
    pub generation: Option<GenerationReport>,
    pub turn_initialized: bool,
    pub activation: Option<Activation>,
    pub evaluation: Option<Evaluation>,
    /// Move replies in submission order.
    pub move_replies: Vec<(Ticket, Reply)>,
    /// End-turn replies in submission order.
    pub end_turn_replies: Vec<(Ticket, Reply)>,
    /// Every hand-over this tick, oldest first.
    pub turn_changes: Vec<TurnChange>,
    /// Turn id once the tick finished.
    pub turn_id: Option<u64>,
    pub active_player: Option<PlayerId>,
}

/// Runs the stage pipeline.
pub struct TickOrchestrator {
    config: GameConfig,
    attack: Box<dyn TickSystem>,
    regen: Box<dyn TickSystem>,
}

impl TickOrchestrator {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            attack: Box::new(NoopSystem),
            regen: Box::new(NoopSystem),
        }
    }

    pub fn with_attack_system(mut self, system: Box<dyn TickSystem>) -> Self {
        self.attack = system;
        self
    }

    pub fn with_regen_system(mut self, system: Box<dyn TickSystem>) -> Self {
        self.regen = system;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Runs one tick.
    pub fn tick(
        &mut self,
        state: &mut SimulationState,
        store: &mut dyn ComponentStore,
        inbox: &mut RequestInbox,
    ) -> Result<TickReport> {
        let mut report = TickReport::default();
        self.tick_into(state, store, inbox, &mut report)?;
        Ok(report)
    }

    /// Runs one tick, recording progress in `report`.
    ///
    /// When a stage fails, `report` still holds what the earlier stages
    /// committed: the world generation, the answered requests and every
    /// hand-over.
    pub fn tick_into(
        &mut self,
        state: &mut SimulationState,
        store: &mut dyn ComponentStore,
        inbox: &mut RequestInbox,
        report: &mut TickReport,
    ) -> Result<()> {
        let tick = state.tick + 1;
        *report = TickReport {
            tick,
            ..TickReport::default()
        };

        for stage in Stage::ORDER {
            debug!(target: "runtime::tick", tick, %stage, "running stage");

            if let Err(source) = self.run_stage(stage, state, store, inbox, report) {
                error!(
                    target: "runtime::tick",
                    tick,
                    %stage,
                    error = %source,
                    "stage failed, tick aborted"
                );
                return Err(RuntimeError::Stage { stage, source });
            }
            report.stages.push(stage);
        }

        state.tick = tick;
        report.turn_id = state.turn.as_ref().map(|turn| turn.turn_id);
        report.active_player = state.active_player();

        debug!(
            target: "runtime::tick",
            tick,
            turn_id = ?report.turn_id,
            active_player = ?report.active_player,
            "tick completed"
        );
        Ok(())
    }

    fn run_stage(
        &mut self,
        stage: Stage,
        state: &mut SimulationState,
        store: &mut dyn ComponentStore,
        inbox: &mut RequestInbox,
        report: &mut TickReport,
    ) -> std::result::Result<(), StageError> {
        match stage {
            Stage::GenerateWorld => {
                if let GenerationOutcome::Generated(generated) =
                    generate_world_if_absent(store, &self.config)?
                {
                    info!(
                        target: "runtime::tick",
                        hexes = generated.hexes,
                        players = generated.players,
                        regular_cities = generated.regular_cities,
                        skipped_draws = generated.skipped_draws,
                        "world generated"
                    );
                    report.generation = Some(generated);
                }
            }
            Stage::Attack => run_system(self.attack.as_mut(), state, store, &self.config)?,
            Stage::Regen => run_system(self.regen.as_mut(), state, store, &self.config)?,
            Stage::InitializeTurn => {
                let mut engine = TurnEngine::new(state, store, &self.config);
                report.turn_initialized = engine.initialize_if_absent()?;
                let activation = engine.activate_current_player()?;
                if activation.changed_anything() {
                    debug!(target: "runtime::turn", ?activation, "player flags reconciled");
                }
                report.activation = Some(activation);
            }
            Stage::ApplyMoves => {
                let mut engine = TurnEngine::new(state, store, &self.config);
                while let Some((ticket, request)) = inbox.front_move() {
                    let reply = engine.execute(&request)?;
                    debug!(
                        target: "runtime::turn",
                        %ticket,
                        army = %request.army,
                        success = reply.success,
                        message = %reply.message,
                        "move processed"
                    );
                    inbox.answer_move(ticket, reply.clone());
                    report.move_replies.push((ticket, reply));
                }
            }
            Stage::EvaluateTurn => {
                let mut engine = TurnEngine::new(state, store, &self.config);
                let evaluation = engine.evaluate_active_player_turn()?;
                if let Evaluation::Advanced {
                    turn_id,
                    active_player,
                } = evaluation
                {
                    info!(
                        target: "runtime::turn",
                        turn_id,
                        %active_player,
                        "all armies moved, turn advanced"
                    );
                    report.turn_changes.push(TurnChange {
                        turn_id,
                        active_player,
                    });
                }
                report.evaluation = Some(evaluation);
            }
            Stage::EndTurn => {
                let mut engine = TurnEngine::new(state, store, &self.config);
                while let Some((ticket, request)) = inbox.front_end_turn() {
                    let reply = engine.execute(&request)?;
                    if reply.success {
                        let change = TurnChange::from(engine.turn()?);
                        info!(
                            target: "runtime::turn",
                            %ticket,
                            player = %request.player,
                            turn_id = change.turn_id,
                            next = %change.active_player,
                            "turn ended"
                        );
                        report.turn_changes.push(change);
                    } else {
                        debug!(
                            target: "runtime::turn",
                            %ticket,
                            player = %request.player,
                            message = %reply.message,
                            "end turn rejected"
                        );
                    }
                    inbox.answer_end_turn(ticket, reply.clone());
                    report.end_turn_replies.push((ticket, reply));
                }
            }
        }
        Ok(())
    }
}

fn run_system(
    system: &mut dyn TickSystem,
    state: &SimulationState,
    store: &mut dyn ComponentStore,
    config: &GameConfig,
) -> std::result::Result<(), StageError> {
    system
        .run(state, store, config)
        .map_err(|source| StageError::System {
            system: system.name(),
            source,
        })
}
