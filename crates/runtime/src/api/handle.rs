//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting player requests, ticking the simulation and reading state.
use tokio::sync::{broadcast, mpsc, oneshot};

use hexwar_core::{EndTurn, EntityId, Hex, MoveArmy, PlayerId, PlayerStatus, Reply, Turn};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, GameEvent};
use crate::orchestrator::TickReport;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

/// Reply of a queued request, available once a tick has processed it.
#[must_use = "the reply only arrives after a tick; await it with `wait`"]
pub struct PendingReply {
    reply_rx: oneshot::Receiver<Reply>,
}

impl PendingReply {
    pub async fn wait(self) -> Result<Reply> {
        self.reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Queue an end-turn request for `player`.
    pub async fn submit_end_turn(&self, player: PlayerId) -> Result<PendingReply> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::SubmitEndTurn {
            request: EndTurn::new(player),
            reply: reply_tx,
        })
        .await?;

        Ok(PendingReply { reply_rx })
    }

    /// Queue a move of `army` to `destination`.
    pub async fn submit_move_army(&self, army: EntityId, destination: Hex) -> Result<PendingReply> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::SubmitMoveArmy {
            request: MoveArmy::new(army, destination),
            reply: reply_tx,
        })
        .await?;

        Ok(PendingReply { reply_rx })
    }

    /// Run one tick and return its report.
    pub async fn tick(&self) -> Result<TickReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Tick { reply: reply_tx }).await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn query_player(&self, seat: PlayerId) -> Result<PlayerStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::QueryPlayer {
            seat,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// The committed turn, `None` before the first tick.
    pub async fn query_turn(&self) -> Result<Option<Turn>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::QueryTurn { reply: reply_tx }).await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// SHA-256 over the store content and the turn.
    pub async fn digest(&self) -> Result<[u8; 32]> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Digest { reply: reply_tx }).await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.event_bus.subscribe()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
