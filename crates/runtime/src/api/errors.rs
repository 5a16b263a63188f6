//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, tick stages, and store queries so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use hexwar_core::{ConfigError, GenerationError, QueryError, StoreError, TurnError};

use crate::orchestrator::Stage;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("invalid game configuration")]
    InvalidConfig(#[source] ConfigError),

    #[error("tick aborted in stage {stage}")]
    Stage {
        stage: Stage,
        #[source]
        source: StageError,
    },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RuntimeError {
    /// Stage that aborted the tick, if this error came from one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RuntimeError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Failure raised inside a single tick stage.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StageError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("system `{system}` failed")]
    System {
        system: &'static str,
        #[source]
        source: StoreError,
    },
}
