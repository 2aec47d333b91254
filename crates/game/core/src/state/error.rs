use crate::error::{ErrorSeverity, GameError};
use crate::grid::GridError;

use super::RegistryError;

/// Errors raised while assembling a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("units cannot join after combat has started")]
    CombatStarted,
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Registry(_) => "SETUP_REGISTRY",
            Self::Grid(_) => "SETUP_GRID",
            Self::CombatStarted => "SETUP_COMBAT_STARTED",
        }
    }
}
