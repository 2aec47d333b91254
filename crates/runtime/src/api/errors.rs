//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, battle setup and rejected
//! commands so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{CommandError, GameError, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a battle to be configured before building")]
    MissingBattle,

    #[error("failed to build the battle state")]
    InitialState(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl RuntimeError {
    /// True when the battle rejected the request and nothing changed.
    pub fn is_rejection(&self) -> bool {
        match self {
            RuntimeError::Command(err) => !err.severity().is_internal(),
            RuntimeError::Turn(_) => true,
            _ => false,
        }
    }
}
