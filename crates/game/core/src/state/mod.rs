//! Authoritative battle state.
//!
//! [`BattleState`] owns every subsystem of a battle: the grid, the unit
//! registry, the momentum ledger, turn bookkeeping, the pending command, the
//! selection, the enemy decision loop and the event outbox. Runtime layers
//! read it freely but mutate it only through [`crate::engine::BattleEngine`].
mod error;
pub mod types;

pub use error::SetupError;
pub use types::{
    Character, EntityId, Position, RegistryError, ResourceMeter, Rosters, Team, TurnPhase,
    TurnState, UnitRegistry,
};

use crate::ai::AiController;
use crate::command::{CommandExecutor, CommandInput};
use crate::config::GameConfig;
use crate::event::BattleEvent;
use crate::grid::Grid;
use crate::momentum::MomentumLedger;

/// Kind of presentation an action is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationKind {
    Move,
    Attack,
}

/// An action whose presentation has started but not finished.
///
/// While one is in flight no further command is accepted and a requested end
/// of turn is deferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    pub unit: EntityId,
    pub kind: AnimationKind,
}

#[derive(Clone, Debug)]
pub struct BattleState {
    /// Battle seed, fixed at setup and mixed into every roll.
    pub seed: u64,
    /// Roll counter; advanced once per resolved attack and per initiative pass.
    pub nonce: u64,
    pub grid: Grid,
    pub units: UnitRegistry,
    pub momentum: MomentumLedger,
    pub turn: TurnState,
    pub commands: CommandExecutor,
    pub input: CommandInput,
    pub ai: AiController,
    pub animation: Option<Animation>,
    outbox: Vec<BattleEvent>,
}

impl BattleState {
    pub fn new(grid: Grid, config: &GameConfig) -> Self {
        Self {
            seed: 0,
            nonce: 0,
            grid,
            units: UnitRegistry::new(),
            momentum: MomentumLedger::from_config(config),
            turn: TurnState::default(),
            commands: CommandExecutor::new(),
            input: CommandInput::default(),
            ai: AiController::new(),
            animation: None,
            outbox: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Registers a unit and places it on the grid at `position`.
    ///
    /// Only allowed before combat starts. On failure nothing is registered.
    pub fn register_unit(&mut self, unit: Character, position: Position) -> Result<(), SetupError> {
        if self.turn.phase != TurnPhase::Setup {
            return Err(SetupError::CombatStarted);
        }
        if self.units.contains(unit.id) {
            return Err(RegistryError::AlreadyRegistered(unit.id).into());
        }

        let id = unit.id;
        self.grid.place(position, id)?;
        self.units.register(unit)?;
        self.momentum.register(id);
        tracing::debug!(unit = %id, %position, "unit registered");
        Ok(())
    }

    pub fn position_of(&self, unit: EntityId) -> Option<Position> {
        self.grid.position_of(unit)
    }

    pub fn unit_at(&self, position: Position) -> Option<&Character> {
        self.grid
            .occupant_at(position)
            .and_then(|id| self.units.get(id))
    }

    /// Unit currently holding the turn.
    pub fn active_unit(&self) -> Option<&Character> {
        self.turn.current.and_then(|id| self.units.get(id))
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub(crate) fn emit(&mut self, event: impl Into<BattleEvent>) {
        self.outbox.push(event.into());
    }

    /// Events emitted since the last drain, oldest first.
    pub fn events(&self) -> &[BattleEvent] {
        &self.outbox
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapDimensions;
    use crate::grid::GridError;

    fn open_state() -> BattleState {
        let grid = Grid::build(MapDimensions::new(4, 4), 1.0, |_| false, |_| 0.0);
        BattleState::new(grid, &GameConfig::default())
    }

    #[test]
    fn registration_places_unit_and_opens_ledger() {
        let mut state = open_state();
        let hero = Character::new(EntityId(1), "Hero", Team::Player);
        state.register_unit(hero, Position::new(1, 2)).unwrap();

        assert_eq!(state.position_of(EntityId(1)), Some(Position::new(1, 2)));
        assert_eq!(state.unit_at(Position::new(1, 2)).map(|u| u.id), Some(EntityId(1)));
        assert!(state.momentum.entry(EntityId(1)).is_some());
    }

    #[test]
    fn occupied_cell_rejects_without_registering() {
        let mut state = open_state();
        state
            .register_unit(Character::new(EntityId(1), "A", Team::Player), Position::ORIGIN)
            .unwrap();
        let err = state
            .register_unit(Character::new(EntityId(2), "B", Team::Enemy), Position::ORIGIN)
            .unwrap_err();

        assert!(matches!(err, SetupError::Grid(GridError::Occupied { .. })));
        assert!(!state.units.contains(EntityId(2)));
        assert!(state.momentum.entry(EntityId(2)).is_none());
    }

    #[test]
    fn duplicate_id_leaves_grid_untouched() {
        let mut state = open_state();
        state
            .register_unit(Character::new(EntityId(1), "A", Team::Player), Position::ORIGIN)
            .unwrap();
        let err = state
            .register_unit(
                Character::new(EntityId(1), "A again", Team::Player),
                Position::new(3, 3),
            )
            .unwrap_err();

        assert_eq!(err, SetupError::Registry(RegistryError::AlreadyRegistered(EntityId(1))));
        assert_eq!(state.position_of(EntityId(1)), Some(Position::ORIGIN));
        assert!(!state.grid.is_occupied(Position::new(3, 3)));
    }
}
