//! Simulation worker that owns the authoritative state.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs ticks
//! through the [`TickOrchestrator`], routes request replies back to their
//! callers and publishes events to the [`EventBus`].

use std::collections::HashMap;
use std::error::Error;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use hexwar_core::{
    ComponentStore, EndTurn, MoveArmy, PlayerId, PlayerStatus, Reply, SimulationState, Turn,
    player_status, store,
};

use crate::api::{Result, RuntimeError};
use crate::events::{EventBus, GameEvent};
use crate::orchestrator::{RequestInbox, Ticket, TickOrchestrator, TickReport};

/// Commands that can be sent to the simulation worker.
pub enum Command {
    /// Queue an end-turn request. The reply is sent once a tick processed it.
    SubmitEndTurn {
        request: EndTurn,
        reply: oneshot::Sender<Reply>,
    },
    /// Queue an army move. The reply is sent once a tick processed it.
    SubmitMoveArmy {
        request: MoveArmy,
        reply: oneshot::Sender<Reply>,
    },
    /// Run one tick now.
    Tick {
        reply: oneshot::Sender<Result<TickReport>>,
    },
    QueryPlayer {
        seat: PlayerId,
        reply: oneshot::Sender<Result<PlayerStatus>>,
    },
    QueryTurn {
        reply: oneshot::Sender<Option<Turn>>,
    },
    /// Replay fingerprint of the store plus the turn.
    Digest {
        reply: oneshot::Sender<Result<[u8; 32]>>,
    },
}

/// Background task that processes commands and runs ticks.
pub struct SimulationWorker {
    state: SimulationState,
    store: Box<dyn ComponentStore>,
    inbox: RequestInbox,
    waiting: HashMap<Ticket, oneshot::Sender<Reply>>,
    orchestrator: TickOrchestrator,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_interval: Option<Duration>,
}

impl SimulationWorker {
    pub fn new(
        store: Box<dyn ComponentStore>,
        orchestrator: TickOrchestrator,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_interval: Option<Duration>,
    ) -> Self {
        Self {
            state: SimulationState::new(),
            store,
            inbox: RequestInbox::new(),
            waiting: HashMap::new(),
            orchestrator,
            command_rx,
            event_bus,
            tick_interval,
        }
    }

    /// Main worker loop. Ends once every command sender is dropped.
    pub async fn run(mut self) {
        info!(
            target: "runtime::worker",
            tick_interval = ?self.tick_interval,
            "simulation worker started"
        );

        let mut ticker = self.tick_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = next_tick(&mut ticker) => {
                    // failures are already logged and published
                    let _ = self.run_tick();
                }
            }
        }

        info!(
            target: "runtime::worker",
            ticks = self.state.tick,
            unanswered = self.waiting.len(),
            "simulation worker stopped"
        );
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SubmitEndTurn { request, reply } => {
                let ticket = self.inbox.push_end_turn(request);
                debug!(
                    target: "runtime::worker",
                    %ticket,
                    player = %request.player,
                    "end turn queued"
                );
                self.waiting.insert(ticket, reply);
            }
            Command::SubmitMoveArmy { request, reply } => {
                let ticket = self.inbox.push_move(request);
                debug!(target: "runtime::worker", %ticket, army = %request.army, "move queued");
                self.waiting.insert(ticket, reply);
            }
            Command::Tick { reply } => {
                let result = self.run_tick();
                if reply.send(result).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "Tick reply channel closed (caller dropped)"
                    );
                }
            }
            Command::QueryPlayer { seat, reply } => {
                let result = player_status(&*self.store, seat).map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "QueryPlayer reply channel closed (caller dropped)"
                    );
                }
            }
            Command::QueryTurn { reply } => {
                if reply.send(self.state.turn.clone()).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "QueryTurn reply channel closed (caller dropped)"
                    );
                }
            }
            Command::Digest { reply } => {
                let result = store::digest(&*self.store, self.state.turn.as_ref())
                    .map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "Digest reply channel closed (caller dropped)"
                    );
                }
            }
        }
    }

    fn run_tick(&mut self) -> Result<TickReport> {
        let mut report = TickReport::default();
        let result = self.orchestrator.tick_into(
            &mut self.state,
            &mut *self.store,
            &mut self.inbox,
            &mut report,
        );

        // Replies and hand-overs from stages before a failure are committed.
        self.deliver_replies();
        self.publish_changes(&report);

        match result {
            Ok(()) => {
                self.event_bus.publish(GameEvent::TickCompleted {
                    tick: report.tick,
                    turn_id: report.turn_id,
                });
                Ok(report)
            }
            Err(error) => {
                error!(
                    target: "runtime::worker",
                    tick = report.tick,
                    error = %error,
                    pending_moves = self.inbox.pending_moves(),
                    pending_end_turns = self.inbox.pending_end_turns(),
                    "tick failed, pending requests kept for retry"
                );
                self.event_bus.publish(GameEvent::TickFailed {
                    tick: report.tick,
                    stage: error.stage(),
                    error: error_chain(&error),
                });
                Err(error)
            }
        }
    }

    fn deliver_replies(&mut self) {
        for (ticket, reply) in self.inbox.take_replies() {
            match self.waiting.remove(&ticket) {
                Some(sender) => {
                    if sender.send(reply).is_err() {
                        debug!(
                            target: "runtime::worker",
                            %ticket,
                            "reply channel closed (caller dropped)"
                        );
                    }
                }
                None => warn!(target: "runtime::worker", %ticket, "reply without a waiting caller"),
            }
        }
    }

    fn publish_changes(&self, report: &TickReport) {
        if let Some(generation) = &report.generation {
            self.event_bus
                .publish(GameEvent::WorldGenerated(generation.clone()));
        }
        for change in &report.turn_changes {
            self.event_bus.publish(GameEvent::TurnAdvanced(*change));
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Error message including every `source`, outermost first.
fn error_chain(error: &RuntimeError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
