use crate::command::{CommandError, CommandMode, CommandOutcome};
use crate::event::{HighlightKind, PresentationEvent};
use crate::pathfinding::{Path, PathSettings, Pathfinder, Unoccupied};
use crate::state::{AnimationKind, EntityId, Position};

use super::BattleEngine;

/// What a pointer action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// The click had no effect.
    Ignored,
    /// Selection changed; `None` when an empty cell was clicked.
    Selected(Option<EntityId>),
    Executed(CommandOutcome),
}

/// Pointer-driven input methods for BattleEngine.
impl BattleEngine<'_> {
    /// Handles a primary click on `position` according to the current mode.
    pub fn primary_select(&mut self, position: Position) -> Result<InputOutcome, CommandError> {
        match self.state.input.mode {
            CommandMode::Default => {
                let hovered = self.state.grid.occupant_at(position);
                self.state.input.selected = hovered;
                Ok(InputOutcome::Selected(hovered))
            }
            CommandMode::MoveTo => self.move_selected(position),
            CommandMode::Attack => self.attack_selected(position),
        }
    }

    /// Clears the selection, the pending command and every highlight.
    pub fn secondary_select(&mut self) {
        self.state.input.deselect();
        self.state.commands.clear();
        self.state.emit(PresentationEvent::HideHighlights);
    }

    /// Switches the command mode of the selected unit and highlights its options.
    pub fn select_mode(&mut self, mode: CommandMode) -> Result<(), CommandError> {
        let unit = self.state.input.selected.ok_or(CommandError::NoSelection)?;
        self.state.input.mode = mode;
        self.state.emit(PresentationEvent::HideHighlights);

        match mode {
            CommandMode::Default => {}
            CommandMode::MoveTo => {
                let tiles = self.movement_area(unit);
                self.state.emit(PresentationEvent::Highlight {
                    kind: HighlightKind::Movement,
                    tiles,
                });
            }
            CommandMode::Attack => {
                let tiles = self.attack_area(unit);
                self.state.emit(PresentationEvent::Highlight {
                    kind: HighlightKind::Attack,
                    tiles,
                });
            }
        }
        Ok(())
    }

    /// Cells `unit` could move to this turn, its own cell excluded.
    pub fn movement_area(&self, unit: EntityId) -> Vec<Position> {
        let Some(origin) = self.state.grid.position_of(unit) else {
            return Vec::new();
        };
        let Some(range) = self.state.units.get(unit).map(|u| u.movement_range) else {
            return Vec::new();
        };
        let policy = Unoccupied::new(unit);
        let settings = PathSettings::movement(range, &policy).with_heuristic(false);
        Pathfinder::new(&self.state.grid)
            .reachable_set(origin, &settings)
            .destinations()
            .collect()
    }

    /// Cells within `unit`'s Manhattan attack range.
    pub fn attack_area(&self, unit: EntityId) -> Vec<Position> {
        match (
            self.state.grid.position_of(unit),
            self.state.units.get(unit),
        ) {
            (Some(origin), Some(character)) => {
                self.state.grid.cells_within(origin, character.attack_range)
            }
            _ => Vec::new(),
        }
    }

    /// Shortest legal path for `unit` to `destination` within its movement range.
    pub fn plan_path(&self, unit: EntityId, destination: Position) -> Option<Path> {
        let start = self.state.grid.position_of(unit)?;
        let range = self.state.units.get(unit)?.movement_range;
        let policy = Unoccupied::new(unit);
        let settings = PathSettings::movement(range, &policy);
        Pathfinder::new(&self.state.grid).find_path(start, destination, &settings)
    }

    /// Signals that the presentation of the last action has finished.
    ///
    /// Resumes a suspended enemy decision loop unless the turn is ending, then
    /// carries out any deferred end of turn.
    pub fn action_finished(&mut self) {
        let Some(animation) = self.state.animation.take() else {
            return;
        };
        if animation.kind == AnimationKind::Move {
            self.state.emit(PresentationEvent::StopMove {
                unit: animation.unit,
            });
        }

        if self.state.turn.ending || self.state.turn.is_over() {
            self.state.ai.cancel();
        } else {
            self.state.ai.resume();
        }
        self.settle();
    }

    fn move_selected(&mut self, destination: Position) -> Result<InputOutcome, CommandError> {
        let unit = self.state.input.selected.ok_or(CommandError::NoSelection)?;
        let Some(path) = self.plan_path(unit, destination) else {
            self.state.input.mode = CommandMode::Default;
            return Err(CommandError::Unreachable(destination));
        };

        self.state.commands.queue_move(unit, destination, path);
        let result = self.execute_command();
        self.state.input.mode = CommandMode::Default;
        result.map(InputOutcome::Executed)
    }

    fn attack_selected(&mut self, position: Position) -> Result<InputOutcome, CommandError> {
        let unit = self.state.input.selected.ok_or(CommandError::NoSelection)?;
        let Some(target) = self.state.grid.occupant_at(position) else {
            return Ok(InputOutcome::Ignored);
        };

        self.state.commands.queue_attack(unit, position, Some(target));
        let result = self.execute_command();
        self.state.input.mode = CommandMode::Default;
        result.map(InputOutcome::Executed)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::env::{BattleEnv, MapDimensions, ScriptedRng};
    use crate::event::BattleEvent;
    use crate::grid::Grid;
    use crate::state::{BattleState, Character, Team};

    use super::*;

    const HERO: EntityId = EntityId(1);
    const OGRE: EntityId = EntityId(2);

    fn skirmish(rng: &ScriptedRng) -> BattleState {
        let grid = Grid::build(MapDimensions::new(8, 8), 1.0, |_| false, |_| 0.0);
        let mut state = BattleState::new(grid, &GameConfig::default());
        state
            .register_unit(
                Character::new(HERO, "Hero", Team::Player).with_movement_range(2),
                Position::new(2, 2),
            )
            .unwrap();
        state
            .register_unit(Character::new(OGRE, "Ogre", Team::Enemy), Position::new(6, 6))
            .unwrap();
        rng.push([20, 1]);
        state
    }

    #[test]
    fn move_mode_highlights_reachable_cells() {
        let rng = ScriptedRng::new([]);
        let mut state = skirmish(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();
        engine.state.drain_events();

        assert_eq!(
            engine.select_mode(CommandMode::MoveTo),
            Err(CommandError::NoSelection)
        );
        engine.primary_select(Position::new(2, 2)).unwrap();
        engine.select_mode(CommandMode::MoveTo).unwrap();

        let highlighted = engine.state.drain_events().into_iter().find_map(|event| match event {
            BattleEvent::Presentation(PresentationEvent::Highlight { kind, tiles }) => {
                Some((kind, tiles))
            }
            _ => None,
        });
        let (kind, tiles) = highlighted.unwrap();
        assert_eq!(kind, HighlightKind::Movement);
        assert_eq!(tiles.len(), 12);
        assert!(!tiles.contains(&Position::new(2, 2)));
    }

    #[test]
    fn click_to_move_resets_mode() {
        let rng = ScriptedRng::new([]);
        let mut state = skirmish(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.primary_select(Position::new(2, 2)).unwrap();
        engine.select_mode(CommandMode::MoveTo).unwrap();
        let outcome = engine.primary_select(Position::new(2, 4)).unwrap();

        assert!(matches!(
            outcome,
            InputOutcome::Executed(CommandOutcome::Moved { steps: 2, .. })
        ));
        assert_eq!(engine.state().input.mode, CommandMode::Default);
        assert_eq!(engine.state().position_of(HERO), Some(Position::new(2, 4)));
        assert_eq!(engine.state().momentum.current(HERO), 2);
    }

    #[test]
    fn unreachable_destination_resets_mode() {
        let rng = ScriptedRng::new([]);
        let mut state = skirmish(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.primary_select(Position::new(2, 2)).unwrap();
        engine.select_mode(CommandMode::MoveTo).unwrap();
        assert_eq!(
            engine.primary_select(Position::new(7, 7)),
            Err(CommandError::Unreachable(Position::new(7, 7)))
        );
        assert_eq!(engine.state().input.mode, CommandMode::Default);
        assert_eq!(engine.state().position_of(HERO), Some(Position::new(2, 2)));
    }

    #[test]
    fn attack_on_empty_cell_keeps_mode() {
        let rng = ScriptedRng::new([]);
        let mut state = skirmish(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.primary_select(Position::new(2, 2)).unwrap();
        engine.select_mode(CommandMode::Attack).unwrap();
        assert_eq!(
            engine.primary_select(Position::new(3, 3)),
            Ok(InputOutcome::Ignored)
        );
        assert_eq!(engine.state().input.mode, CommandMode::Attack);
    }

    #[test]
    fn secondary_select_clears_everything() {
        let rng = ScriptedRng::new([]);
        let mut state = skirmish(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.primary_select(Position::new(2, 2)).unwrap();
        engine.select_mode(CommandMode::Attack).unwrap();
        engine.secondary_select();

        assert_eq!(engine.state().input.selected, None);
        assert_eq!(engine.state().input.mode, CommandMode::Default);
        assert!(matches!(
            engine.state().events().last(),
            Some(BattleEvent::Presentation(PresentationEvent::HideHighlights))
        ));
    }

    #[test]
    fn exhaustion_defers_turn_end_until_animation_finishes() {
        let rng = ScriptedRng::new([]);
        let mut state = skirmish(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        for destination in [Position::new(2, 3), Position::new(2, 4)] {
            engine.primary_select(engine.state().position_of(HERO).unwrap()).unwrap();
            engine.select_mode(CommandMode::MoveTo).unwrap();
            engine.primary_select(destination).unwrap();
            if destination == Position::new(2, 3) {
                engine.action_finished();
            }
        }

        assert_eq!(engine.state().momentum.current(HERO), 0);
        assert!(engine.state().turn.ending);
        assert_eq!(engine.state().turn.current, Some(HERO));

        engine.action_finished();
        assert_eq!(engine.state().turn.current, Some(OGRE));
        assert!(!engine.state().turn.ending);
    }
}
