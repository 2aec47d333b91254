//! Scheduler errors.

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("combat has already started")]
    AlreadyStarted,

    #[error("combat has not started")]
    NotStarted,

    #[error("combat is over")]
    CombatOver,

    #[error("no unit holds the turn")]
    NoActiveUnit,
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CombatOver => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyStarted => "TURN_ALREADY_STARTED",
            Self::NotStarted => "TURN_NOT_STARTED",
            Self::CombatOver => "TURN_COMBAT_OVER",
            Self::NoActiveUnit => "TURN_NO_ACTIVE_UNIT",
        }
    }
}
