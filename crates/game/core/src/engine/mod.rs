//! Battle orchestration.
//!
//! [`BattleEngine`] is the only writer of [`BattleState`]. Its methods are
//! split by concern across this module: scheduling in `turns`, command
//! execution in `commands`, pointer input in `input` and the enemy decision
//! loop in `ai`. Every public operation leaves the state consistent, records
//! what happened in the state's outbox and finishes by settling any requested
//! end of turn.
mod ai;
mod commands;
mod errors;
mod input;
mod turns;

pub use errors::TurnError;
pub use input::InputOutcome;

use crate::combat::RollContext;
use crate::config::GameConfig;
use crate::env::{BattleEnv, compute_seed};
use crate::event::TurnEvent;
use crate::state::{BattleState, EntityId, TurnPhase};

/// Applies turn, command, input and AI operations to a [`BattleState`].
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    env: BattleEnv<'a>,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, env: BattleEnv<'a>) -> Self {
        Self { state, env }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn env(&self) -> BattleEnv<'a> {
        self.env
    }

    fn config(&self) -> &'a GameConfig {
        self.env.config()
    }

    /// Seed for a roll made by `unit` at the current nonce.
    fn roll_seed(&self, unit: EntityId, context: RollContext) -> u64 {
        compute_seed(self.state.seed, self.state.nonce, unit.0, context.tag())
    }

    fn set_phase(&mut self, to: TurnPhase) {
        let from = self.state.turn.phase;
        if from == to {
            return;
        }
        self.state.turn.phase = to;
        tracing::trace!(%from, %to, "turn phase changed");
        self.state.emit(TurnEvent::PhaseChanged { from, to });
    }
}
