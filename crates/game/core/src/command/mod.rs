//! Staged Move/Attack commands and their validation.
//!
//! At most one command is pending. The engine takes it out of the
//! [`CommandExecutor`] before validating, so a rejected command is cleared
//! just like an executed one.
mod error;
mod input;
mod validate;

pub use error::CommandError;
pub use input::{CommandInput, CommandMode};
pub use validate::{validate_path, validate_target};

use crate::combat::AttackResult;
use crate::pathfinding::Path;
use crate::state::{EntityId, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move {
        unit: EntityId,
        destination: Position,
        path: Path,
    },
    Attack {
        unit: EntityId,
        destination: Position,
        target: Option<EntityId>,
    },
}

impl Command {
    pub fn unit(&self) -> EntityId {
        match self {
            Command::Move { unit, .. } | Command::Attack { unit, .. } => *unit,
        }
    }

    pub fn destination(&self) -> Position {
        match self {
            Command::Move { destination, .. } | Command::Attack { destination, .. } => *destination,
        }
    }
}

/// What an executed command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Moved {
        unit: EntityId,
        from: Position,
        to: Position,
        steps: usize,
    },
    Attacked {
        unit: EntityId,
        target: EntityId,
        result: AttackResult,
        killed: bool,
    },
}

/// Holder of the single pending command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandExecutor {
    pending: Option<Command>,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a move, replacing any pending command.
    pub fn queue_move(&mut self, unit: EntityId, destination: Position, path: Path) {
        self.pending = Some(Command::Move {
            unit,
            destination,
            path,
        });
    }

    /// Stages an attack, replacing any pending command.
    pub fn queue_attack(&mut self, unit: EntityId, destination: Position, target: Option<EntityId>) {
        self.pending = Some(Command::Attack {
            unit,
            destination,
            target,
        });
    }

    pub fn pending(&self) -> Option<&Command> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take(&mut self) -> Option<Command> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
