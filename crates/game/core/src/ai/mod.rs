//! Enemy decision making.
//!
//! The controller is a small state machine run for whichever enemy holds the
//! turn. It chooses between moving, attacking and seeking cover, and acts
//! through the same command pipeline as a player. After every action it parks
//! in [`AiState::Waiting`] until the action animation finishes.
mod decision;
mod scoring;

pub use decision::{EnemyView, evaluate, nearest};
pub use scoring::{MoveScorer, pick_target, score_tile};

use strum::Display;

use crate::state::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiState {
    Idle,
    Evaluate,
    Moving,
    Attacking,
    SeekingCover,
    Waiting,
    EndTurn,
}

/// Action the controller issued before suspending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiAction {
    Moved { to: crate::state::Position },
    Attacked { target: EntityId },
}

/// Result of one [`crate::engine::BattleEngine::drive_ai`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiStep {
    /// No enemy decision loop is running.
    Inactive,
    /// Still suspended on an earlier action.
    Waiting,
    /// Issued an action and suspended until it finishes.
    Suspended(AiAction),
    /// Asked the scheduler to end the turn.
    TurnEnded,
}

/// Decision loop of the enemy currently holding the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiRun {
    pub unit: EntityId,
    pub state: AiState,
    /// States entered this turn, in order.
    pub trace: Vec<AiState>,
}

impl AiRun {
    fn new(unit: EntityId) -> Self {
        Self {
            unit,
            state: AiState::Evaluate,
            trace: vec![AiState::Evaluate],
        }
    }

    pub(crate) fn enter(&mut self, state: AiState) {
        tracing::debug!(unit = %self.unit, from = %self.state, to = %state, "ai transition");
        self.state = state;
        self.trace.push(state);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiController {
    run: Option<AiRun>,
}

impl AiController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh decision loop for `unit` at [`AiState::Evaluate`].
    pub fn begin(&mut self, unit: EntityId) {
        self.run = Some(AiRun::new(unit));
    }

    /// Drops the running loop and any pending continuation.
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            tracing::debug!(unit = %run.unit, state = %run.state, "ai loop cancelled");
        }
    }

    pub fn run(&self) -> Option<&AiRun> {
        self.run.as_ref()
    }

    pub(crate) fn run_mut(&mut self) -> Option<&mut AiRun> {
        self.run.as_mut()
    }

    pub fn unit(&self) -> Option<EntityId> {
        self.run.as_ref().map(|run| run.unit)
    }

    pub fn state(&self) -> Option<AiState> {
        self.run.as_ref().map(|run| run.state)
    }

    /// True when the loop has work to do on the next drive.
    pub fn is_ready(&self) -> bool {
        self.state().is_some_and(|state| state != AiState::Waiting)
    }

    /// Resumes a suspended loop at [`AiState::Evaluate`].
    pub(crate) fn resume(&mut self) -> bool {
        match self.run.as_mut() {
            Some(run) if run.state == AiState::Waiting => {
                run.enter(AiState::Evaluate);
                true
            }
            _ => false,
        }
    }
}
