use crate::combat::resolve_attack;
use crate::command::{Command, CommandError, CommandOutcome, validate_path, validate_target};
use crate::env::compute_seed;
use crate::error::GameError;
use crate::event::{CombatEvent, PresentationEvent, TurnEvent, UnitTag};
use crate::momentum::{MomentumError, SpendOutcome};
use crate::pathfinding::{Path, PathSettings, Unoccupied};
use crate::state::{Animation, AnimationKind, EntityId, Position};

use super::BattleEngine;

/// Command execution and resource methods for BattleEngine.
impl BattleEngine<'_> {
    /// Stages a move for `unit`, replacing any pending command.
    pub fn queue_move(&mut self, unit: EntityId, destination: Position, path: Path) {
        self.state.commands.queue_move(unit, destination, path);
    }

    /// Stages an attack for `unit`, replacing any pending command.
    pub fn queue_attack(&mut self, unit: EntityId, destination: Position, target: Option<EntityId>) {
        self.state.commands.queue_attack(unit, destination, target);
    }

    /// Takes the pending command and executes it.
    ///
    /// The command is cleared whether or not it succeeds. A rejected command
    /// changes nothing.
    pub fn execute_command(&mut self) -> Result<CommandOutcome, CommandError> {
        let command = self
            .state
            .commands
            .take()
            .ok_or(CommandError::NothingPending)?;

        let result = self.run_command(command);
        if let Err(error) = &result {
            tracing::debug!(code = error.error_code(), %error, "command rejected");
        }
        self.settle();
        result
    }

    fn run_command(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        self.ensure_can_act(command.unit())?;
        match command {
            Command::Move {
                unit,
                destination,
                path,
            } => self.execute_move(unit, destination, &path),
            Command::Attack {
                unit,
                destination,
                target,
            } => self.execute_attack(unit, destination, target),
        }
    }

    fn ensure_can_act(&self, unit: EntityId) -> Result<(), CommandError> {
        let turn = &self.state.turn;
        if turn.is_over() {
            return Err(CommandError::CombatOver);
        }
        if !turn.phase.is_unit_turn() {
            return Err(CommandError::NotUnitTurn(turn.phase));
        }
        if !turn.is_current(unit) {
            return Err(CommandError::NotActingUnit { unit });
        }
        if let Some(animation) = self.state.animation {
            return Err(CommandError::Animating(animation.unit));
        }
        if !self.state.units.contains(unit) {
            return Err(CommandError::UnknownUnit(unit));
        }
        Ok(())
    }

    fn ensure_affordable(&self, unit: EntityId, cost: u32) -> Result<(), MomentumError> {
        if self.state.momentum.can_spend(unit, cost) {
            return Ok(());
        }
        match self.state.momentum.entry(unit) {
            Some(entry) => Err(MomentumError::Insufficient {
                unit,
                required: cost,
                available: entry.current,
            }),
            None => Err(MomentumError::UnknownUnit(unit)),
        }
    }

    fn execute_move(
        &mut self,
        unit: EntityId,
        destination: Position,
        path: &Path,
    ) -> Result<CommandOutcome, CommandError> {
        let movement_range = self
            .state
            .units
            .get(unit)
            .ok_or(CommandError::UnknownUnit(unit))?
            .movement_range;
        let policy = Unoccupied::new(unit);
        validate_path(
            &self.state.grid,
            unit,
            path,
            destination,
            &PathSettings::movement(movement_range, &policy),
        )?;
        let cost = self.config().move_cost;
        self.ensure_affordable(unit, cost)?;

        let from = self.state.grid.relocate(unit, destination)?;
        self.spend_momentum(unit, cost)?;
        self.state.emit(PresentationEvent::HideHighlights);

        let waypoints = self.state.grid.path_to_world(path.steps());
        self.state.animation = Some(Animation {
            unit,
            kind: AnimationKind::Move,
        });
        self.state.emit(PresentationEvent::StartMove {
            unit,
            path: path.steps().to_vec(),
            waypoints,
        });
        tracing::debug!(%unit, %from, to = %destination, steps = path.len(), "unit moved");

        Ok(CommandOutcome::Moved {
            unit,
            from,
            to: destination,
            steps: path.len(),
        })
    }

    fn execute_attack(
        &mut self,
        unit: EntityId,
        destination: Position,
        target: Option<EntityId>,
    ) -> Result<CommandOutcome, CommandError> {
        let cost = self.config().attack_cost;
        self.ensure_affordable(unit, cost)?;

        let target = target
            .filter(|&id| self.state.units.contains(id))
            .ok_or(CommandError::NoTarget(destination))?;
        let from = self
            .state
            .grid
            .position_of(unit)
            .ok_or(CommandError::NotPlaced(unit))?;
        let target_position = self
            .state
            .grid
            .position_of(target)
            .ok_or(CommandError::NotPlaced(target))?;

        let (seed, nonce) = (self.state.seed, self.state.nonce);
        let attacker = self
            .state
            .units
            .get(unit)
            .ok_or(CommandError::UnknownUnit(unit))?;
        let defender = self
            .state
            .units
            .get(target)
            .ok_or(CommandError::UnknownUnit(target))?;
        validate_target(attacker, from, defender, target_position)?;

        let result = resolve_attack(
            attacker,
            defender,
            self.env.rng(),
            self.config().check_die,
            |context| compute_seed(seed, nonce, unit.0, context.tag()),
        );
        let attacker_tag = UnitTag::from(attacker);
        let target_tag = UnitTag::from(defender);

        self.state.nonce += 1;
        self.spend_momentum(unit, cost)?;
        self.state.emit(PresentationEvent::HideHighlights);

        let mut killed = false;
        match result.damage() {
            Some(damage) => {
                let defender = self
                    .state
                    .units
                    .get_mut(target)
                    .ok_or(CommandError::UnknownUnit(target))?;
                killed = defender.take_damage(damage);
                let remaining_hp = defender.hp.current;
                tracing::debug!(
                    attacker = %unit,
                    %target,
                    roll = result.roll,
                    total = result.total,
                    damage,
                    remaining_hp,
                    "attack hit"
                );
                self.state.emit(CombatEvent::AttackHit {
                    attacker: attacker_tag,
                    target: target_tag,
                    roll: result.roll,
                    total: result.total,
                    damage,
                    critical: result.critical,
                    remaining_hp,
                });
            }
            None => {
                tracing::debug!(attacker = %unit, %target, roll = result.roll, total = result.total, "attack missed");
                self.state.emit(CombatEvent::AttackMissed {
                    attacker: attacker_tag,
                    target: target_tag,
                    roll: result.roll,
                    total: result.total,
                });
            }
        }

        self.state.animation = Some(Animation {
            unit,
            kind: AnimationKind::Attack,
        });
        self.state.emit(PresentationEvent::PlayAttack {
            unit,
            target: target_position,
        });

        if killed {
            self.on_unit_death(target);
        }

        Ok(CommandOutcome::Attacked {
            unit,
            target,
            result,
            killed,
        })
    }

    /// Deducts momentum and asks for the turn to end when the pool runs dry.
    pub(crate) fn spend_momentum(
        &mut self,
        unit: EntityId,
        amount: u32,
    ) -> Result<SpendOutcome, MomentumError> {
        let outcome = self.state.momentum.spend(unit, amount)?;
        self.state.emit(TurnEvent::MomentumChanged {
            unit,
            current: outcome.remaining(),
        });
        if outcome.is_exhausted() {
            tracing::debug!(%unit, "momentum exhausted");
            if self.state.turn.is_current(unit) {
                self.request_turn_end();
            }
        }
        Ok(outcome)
    }

    /// Grants extra momentum within the unit's per-turn cap.
    ///
    /// Returns the new amount; a gain past the cap is rejected and changes nothing.
    pub fn gain_momentum(&mut self, unit: EntityId, amount: u32) -> Result<u32, MomentumError> {
        let current = self.state.momentum.gain(unit, amount)?;
        self.state.emit(TurnEvent::MomentumChanged { unit, current });
        Ok(current)
    }

    /// Restores up to `amount` HP on a living unit, returning what was restored.
    pub fn heal(
        &mut self,
        healer: EntityId,
        target: EntityId,
        amount: u32,
    ) -> Result<u32, CommandError> {
        if self.state.turn.is_over() {
            return Err(CommandError::CombatOver);
        }
        let healer_tag = self
            .state
            .units
            .get(healer)
            .map(UnitTag::from)
            .ok_or(CommandError::UnknownUnit(healer))?;
        let unit = self
            .state
            .units
            .get_mut(target)
            .ok_or(CommandError::UnknownUnit(target))?;
        if !unit.is_alive() {
            return Err(CommandError::TargetDead(target));
        }

        let restored = unit.hp.restore(amount);
        let target_tag = UnitTag::from(&*unit);
        self.state.emit(CombatEvent::Healed {
            healer: healer_tag,
            target: target_tag,
            amount: restored,
        });
        Ok(restored)
    }

    /// Records `status` on a living unit. Returns false if it was already present.
    pub fn apply_status(
        &mut self,
        caster: EntityId,
        target: EntityId,
        status: impl Into<String>,
    ) -> Result<bool, CommandError> {
        if self.state.turn.is_over() {
            return Err(CommandError::CombatOver);
        }
        let caster_tag = self
            .state
            .units
            .get(caster)
            .map(UnitTag::from)
            .ok_or(CommandError::UnknownUnit(caster))?;
        let unit = self
            .state
            .units
            .get_mut(target)
            .ok_or(CommandError::UnknownUnit(target))?;
        if !unit.is_alive() {
            return Err(CommandError::TargetDead(target));
        }

        let status = status.into();
        if unit.statuses.contains(&status) {
            return Ok(false);
        }
        unit.statuses.push(status.clone());
        let target_tag = UnitTag::from(&*unit);
        self.state.emit(CombatEvent::StatusApplied {
            caster: caster_tag,
            target: target_tag,
            status,
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::command::CommandError;
    use crate::config::GameConfig;
    use crate::env::{BattleEnv, MapDimensions, ScriptedRng};
    use crate::event::{BattleEvent, CombatEvent};
    use crate::grid::Grid;
    use crate::state::{BattleState, Character, EntityId, Position, Team};

    use super::*;

    const HERO: EntityId = EntityId(1);
    const OGRE: EntityId = EntityId(2);

    /// Hero acts first: both initiative rolls are scripted.
    fn duel(rng: &ScriptedRng) -> BattleState {
        let grid = Grid::build(MapDimensions::new(6, 6), 1.0, |_| false, |_| 0.0);
        let mut state = BattleState::new(grid, &GameConfig::default());
        state
            .register_unit(Character::new(HERO, "Hero", Team::Player), Position::new(0, 0))
            .unwrap();
        state
            .register_unit(
                Character::new(OGRE, "Ogre", Team::Enemy).with_max_hp(30),
                Position::new(0, 3),
            )
            .unwrap();
        rng.push([20, 1]);
        state
    }

    #[test]
    fn heal_clamps_to_maximum() {
        let rng = ScriptedRng::new([]);
        let mut state = duel(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();
        engine.state.units.get_mut(OGRE).unwrap().hp.current = 25;

        assert_eq!(engine.heal(HERO, OGRE, 10), Ok(5));
        let events = engine.state.drain_events();
        assert!(matches!(
            events.last(),
            Some(BattleEvent::Combat(CombatEvent::Healed { amount: 5, .. }))
        ));
    }

    #[test]
    fn status_is_recorded_once() {
        let rng = ScriptedRng::new([]);
        let mut state = duel(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        assert_eq!(engine.apply_status(HERO, OGRE, "Burning"), Ok(true));
        assert_eq!(engine.apply_status(HERO, OGRE, "Burning"), Ok(false));
        assert_eq!(engine.state().units.get(OGRE).unwrap().statuses, vec!["Burning"]);
        assert_eq!(
            engine.apply_status(HERO, EntityId(9), "Burning"),
            Err(CommandError::UnknownUnit(EntityId(9)))
        );
    }

    #[test]
    fn attack_out_of_range_spends_nothing() {
        let rng = ScriptedRng::new([]);
        let mut state = duel(&rng);
        state.grid.relocate(OGRE, Position::new(5, 5)).unwrap();
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.state.commands.queue_attack(HERO, Position::new(5, 5), Some(OGRE));
        let err = engine.execute_command().unwrap_err();
        assert_eq!(err, CommandError::OutOfRange { distance: 10, range: 5 });
        assert_eq!(engine.state().momentum.current(HERO), 4);
        assert!(engine.state().commands.pending().is_none());
    }

    #[test]
    fn missing_target_is_rejected() {
        let rng = ScriptedRng::new([]);
        let mut state = duel(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.state.commands.queue_attack(HERO, Position::new(2, 2), None);
        assert_eq!(
            engine.execute_command(),
            Err(CommandError::NoTarget(Position::new(2, 2)))
        );
    }

    #[test]
    fn commands_wait_for_animation() {
        let rng = ScriptedRng::new([]);
        let mut state = duel(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        let path = Path::new(Position::new(0, 0), vec![Position::new(1, 0)], 10);
        engine.state.commands.queue_move(HERO, Position::new(1, 0), path);
        engine.execute_command().unwrap();

        let path = Path::new(Position::new(1, 0), vec![Position::new(2, 0)], 10);
        engine.state.commands.queue_move(HERO, Position::new(2, 0), path);
        assert_eq!(engine.execute_command(), Err(CommandError::Animating(HERO)));
        assert_eq!(engine.state().position_of(HERO), Some(Position::new(1, 0)));
    }

    #[test]
    fn enemy_cannot_act_on_player_turn() {
        let rng = ScriptedRng::new([]);
        let mut state = duel(&rng);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.state.commands.queue_attack(OGRE, Position::new(0, 0), Some(HERO));
        assert_eq!(
            engine.execute_command(),
            Err(CommandError::NotActingUnit { unit: OGRE })
        );
    }
}
