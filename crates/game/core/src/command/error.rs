use crate::error::{ErrorSeverity, GameError};
use crate::grid::GridError;
use crate::momentum::MomentumError;
use crate::state::{EntityId, Position, TurnPhase};

/// Why a staged command or input action was rejected.
///
/// A rejected command never leaves partial state behind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("no command is pending")]
    NothingPending,

    #[error("no unit is selected")]
    NoSelection,

    #[error("combat is over")]
    CombatOver,

    #[error("commands are not accepted during {0}")]
    NotUnitTurn(TurnPhase),

    #[error("unit {unit} does not hold the turn")]
    NotActingUnit { unit: EntityId },

    #[error("unit {0} is still animating")]
    Animating(EntityId),

    #[error("unit {0} is not registered")]
    UnknownUnit(EntityId),

    #[error("unit {0} is not on the grid")]
    NotPlaced(EntityId),

    #[error("path is empty")]
    EmptyPath,

    #[error("path does not start next to {from}: first step {at}")]
    PathDetached { from: Position, at: Position },

    #[error("path step {at} is not adjacent to the previous cell")]
    PathDiscontinuous { at: Position },

    #[error("path step {at} cannot be entered")]
    PathBlocked { at: Position },

    #[error("path ends at {end} instead of {destination}")]
    PathMismatch { destination: Position, end: Position },

    #[error("path costs {cost} but the unit can move {max}")]
    PathTooLong { cost: u32, max: u32 },

    #[error("no path to {0}")]
    Unreachable(Position),

    #[error("no unit at {0}")]
    NoTarget(Position),

    #[error("unit {0} cannot be targeted by its own team")]
    FriendlyTarget(EntityId),

    #[error("unit {0} is already dead")]
    TargetDead(EntityId),

    #[error("target is {distance} away but range is {range}")]
    OutOfRange { distance: u32, range: u32 },

    #[error(transparent)]
    Momentum(#[from] MomentumError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Momentum(inner) => inner.severity(),
            Self::Animating(_) => ErrorSeverity::Recoverable,
            Self::UnknownUnit(_) | Self::NotPlaced(_) | Self::Grid(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NothingPending => "COMMAND_NOTHING_PENDING",
            Self::NoSelection => "COMMAND_NO_SELECTION",
            Self::CombatOver => "COMMAND_COMBAT_OVER",
            Self::NotUnitTurn(_) => "COMMAND_NOT_UNIT_TURN",
            Self::NotActingUnit { .. } => "COMMAND_NOT_ACTING_UNIT",
            Self::Animating(_) => "COMMAND_ANIMATING",
            Self::UnknownUnit(_) => "COMMAND_UNKNOWN_UNIT",
            Self::NotPlaced(_) => "COMMAND_NOT_PLACED",
            Self::EmptyPath => "COMMAND_EMPTY_PATH",
            Self::PathDetached { .. } => "COMMAND_PATH_DETACHED",
            Self::PathDiscontinuous { .. } => "COMMAND_PATH_DISCONTINUOUS",
            Self::PathBlocked { .. } => "COMMAND_PATH_BLOCKED",
            Self::PathMismatch { .. } => "COMMAND_PATH_MISMATCH",
            Self::PathTooLong { .. } => "COMMAND_PATH_TOO_LONG",
            Self::Unreachable(_) => "COMMAND_UNREACHABLE",
            Self::NoTarget(_) => "COMMAND_NO_TARGET",
            Self::FriendlyTarget(_) => "COMMAND_FRIENDLY_TARGET",
            Self::TargetDead(_) => "COMMAND_TARGET_DEAD",
            Self::OutOfRange { .. } => "COMMAND_OUT_OF_RANGE",
            Self::Momentum(inner) => inner.error_code(),
            Self::Grid(_) => "COMMAND_GRID",
        }
    }
}
