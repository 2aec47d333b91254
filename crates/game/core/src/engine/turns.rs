use std::cmp::Reverse;

use crate::combat::RollContext;
use crate::event::{CombatEvent, PresentationEvent, TurnEvent, UnitTag};
use crate::state::{EntityId, Rosters, Team, TurnPhase};

use super::{BattleEngine, TurnError};

/// Turn scheduling methods for BattleEngine.
impl BattleEngine<'_> {
    /// Rolls initiative for every living unit and starts the first round.
    ///
    /// Each unit rolls the check die plus its initiative modifier once; the
    /// order is sorted by descending total and ties keep registration order.
    /// A battle with an empty side ends here without dispatching any turn.
    pub fn start_combat(&mut self) -> Result<(), TurnError> {
        if self.state.turn.phase != TurnPhase::Setup {
            return Err(TurnError::AlreadyStarted);
        }

        let living: Vec<EntityId> = self.state.units.living().map(|unit| unit.id).collect();
        self.state.emit(CombatEvent::BattleStarted {
            units: living.len(),
        });

        let die = self.config().check_die;
        let rng = self.env.rng();
        let mut rosters = Rosters::default();
        let mut rolled = Vec::with_capacity(living.len());
        for id in living {
            let seed = self.roll_seed(id, RollContext::Initiative);
            let Some(unit) = self.state.units.get_mut(id) else {
                continue;
            };
            let initiative = rng.roll_die(seed, die) as i32 + unit.initiative_mod;
            unit.initiative = Some(initiative);
            rosters.get_mut(unit.team).push(id);
            rolled.push((id, initiative));
        }
        self.state.nonce += 1;

        rolled.sort_by_key(|&(_, initiative)| Reverse(initiative));
        tracing::info!(
            units = rolled.len(),
            players = rosters.player.len(),
            enemies = rosters.enemy.len(),
            "combat started"
        );

        self.state.turn.order = rolled.iter().map(|&(id, _)| id).collect();
        self.state.turn.rosters = rosters;
        self.state.emit(TurnEvent::InitiativeRolled { order: rolled });

        if !self.check_battle_end() {
            self.begin_round();
        }
        Ok(())
    }

    /// Ends the acting unit's turn.
    ///
    /// While the unit is animating the end is recorded and carried out when
    /// the animation finishes. Repeated requests collapse into one.
    pub fn end_current_turn(&mut self) -> Result<(), TurnError> {
        match self.state.turn.phase {
            TurnPhase::Setup => return Err(TurnError::NotStarted),
            TurnPhase::CombatEnd => return Err(TurnError::CombatOver),
            phase if !phase.is_unit_turn() => return Err(TurnError::NoActiveUnit),
            _ => {}
        }
        self.request_turn_end();
        self.settle();
        Ok(())
    }

    pub(crate) fn request_turn_end(&mut self) {
        let turn = &mut self.state.turn;
        if turn.current.is_some() && !turn.is_over() && !turn.ending {
            tracing::debug!(unit = ?turn.current, "turn end requested");
            turn.ending = true;
        }
    }

    /// Carries out a requested end of turn once nothing is animating.
    pub(crate) fn settle(&mut self) {
        if !self.state.turn.ending {
            return;
        }
        if self.state.turn.is_over() {
            self.state.turn.ending = false;
            return;
        }
        if self.state.is_animating() {
            return;
        }
        self.advance_turn();
    }

    fn begin_round(&mut self) {
        self.state.turn.round += 1;
        self.state.turn.index = 0;
        let round = self.state.turn.round;
        self.state.emit(CombatEvent::RoundStarted { round });
        tracing::debug!(round, "round started");

        if self.state.turn.order.is_empty() {
            tracing::warn!(round, "initiative order is empty; no turn to dispatch");
            self.state.turn.current = None;
            return;
        }
        self.dispatch_current();
    }

    /// Grants the turn to the unit at the current index.
    fn dispatch_current(&mut self) {
        let index = self.state.turn.index;
        let Some(&unit) = self.state.turn.order.get(index) else {
            tracing::warn!(index, "turn index past the initiative order");
            return;
        };
        let Some(character) = self.state.units.get(unit) else {
            tracing::warn!(%unit, "dispatching an unregistered unit");
            return;
        };
        let team = character.team;
        let tag = UnitTag::from(character);

        self.state.turn.current = Some(unit);
        self.state.turn.ending = false;
        let entry = self.state.momentum.grant_turn(unit);
        self.state.emit(TurnEvent::MomentumChanged {
            unit,
            current: entry.current,
        });

        self.set_phase(match team {
            Team::Player => TurnPhase::PlayerTurn,
            Team::Enemy => TurnPhase::EnemyTurn,
        });
        tracing::debug!(%unit, name = %tag, %team, momentum = entry.current, "turn started");
        self.state.emit(CombatEvent::TurnStarted { unit: tag, team });

        if team == Team::Enemy {
            self.state.ai.begin(unit);
        }
    }

    fn advance_turn(&mut self) {
        self.state.turn.ending = false;
        let finished = self.state.turn.current.take();
        self.set_phase(TurnPhase::Awaiting);
        if let Some(unit) = finished {
            self.state.emit(TurnEvent::TurnEnded { unit });
        }
        self.state.emit(PresentationEvent::HideHighlights);
        self.state.ai.cancel();
        self.state.commands.clear();
        self.state.input.deselect();

        let next = self.prune_order();

        self.set_phase(TurnPhase::CheckingWin);
        if self.check_battle_end() {
            return;
        }

        if next >= self.state.turn.order.len() {
            self.begin_round();
        } else {
            self.state.turn.index = next;
            self.dispatch_current();
        }
    }

    /// Drops dead units from the order and returns the index of the next unit to act.
    fn prune_order(&mut self) -> usize {
        let state = &mut *self.state;
        let index = state.turn.index;
        let units = &state.units;

        let mut position = 0;
        let mut removed_through_current = 0;
        state.turn.order.retain(|&id| {
            let keep = units.is_alive(id);
            if !keep && position <= index {
                removed_through_current += 1;
            }
            position += 1;
            keep
        });

        (index + 1).saturating_sub(removed_through_current)
    }

    /// Removes a dead unit from every subsystem.
    pub(crate) fn on_unit_death(&mut self, unit: EntityId) {
        let Some(character) = self.state.units.deregister(unit) else {
            return;
        };
        let team = character.team;
        tracing::info!(%unit, name = %character.name, %team, "unit died");
        self.state.emit(CombatEvent::UnitDied {
            unit: UnitTag::from(&character),
            team,
        });

        self.state.turn.rosters.remove(unit);
        if let Some(position) = self.state.grid.position_of(unit) {
            self.state.grid.remove(position, unit);
        }
        self.state.momentum.deregister(unit);
        if self.state.input.selected == Some(unit) {
            self.state.input.deselect();
        }
        if self.state.turn.is_current(unit) {
            self.request_turn_end();
        }

        self.check_battle_end();
    }

    /// Ends the battle when a side has no living units. Returns true once ended.
    pub(crate) fn check_battle_end(&mut self) -> bool {
        if self.state.turn.is_over() {
            return true;
        }
        if !self.state.turn.rosters.any_empty() {
            return false;
        }

        let winner = self.state.turn.rosters.survivor();
        self.set_phase(TurnPhase::CombatEnd);
        self.state.turn.winner = winner;
        self.state.turn.current = None;
        self.state.turn.ending = false;
        self.state.ai.cancel();
        self.state.commands.clear();
        tracing::info!(?winner, round = self.state.turn.round, "battle ended");
        self.state.emit(CombatEvent::BattleEnded { winner });
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::env::{BattleEnv, MapDimensions, ScriptedRng};
    use crate::event::{BattleEvent, CombatEvent};
    use crate::grid::Grid;
    use crate::state::{BattleState, Character, EntityId, Position, Team, TurnPhase};

    use super::*;

    fn state_with(units: &[(u32, Team, i32)]) -> BattleState {
        let grid = Grid::build(MapDimensions::new(8, 8), 1.0, |_| false, |_| 0.0);
        let mut state = BattleState::new(grid, &GameConfig::default());
        for (i, &(id, team, init_mod)) in units.iter().enumerate() {
            let unit = Character::new(EntityId(id), format!("u{id}"), team).with_initiative_mod(init_mod);
            state.register_unit(unit, Position::new(i as i32, 0)).unwrap();
        }
        state
    }

    #[test]
    fn initiative_sorts_descending_with_stable_ties() {
        let mut state = state_with(&[(1, Team::Player, 0), (2, Team::Enemy, 0), (3, Team::Player, 0)]);
        let rng = ScriptedRng::new([5, 12, 12]);
        let config = GameConfig::default();
        BattleEngine::new(&mut state, BattleEnv::new(&rng, &config))
            .start_combat()
            .unwrap();

        assert_eq!(state.turn.order, vec![EntityId(2), EntityId(3), EntityId(1)]);
        assert_eq!(state.turn.current, Some(EntityId(2)));
        assert_eq!(state.turn.phase, TurnPhase::EnemyTurn);
        assert_eq!(state.turn.round, 1);
        assert_eq!(state.ai.unit(), Some(EntityId(2)));
    }

    #[test]
    fn turns_cycle_into_next_round() {
        let mut state = state_with(&[(1, Team::Player, 0), (2, Team::Enemy, 0)]);
        let rng = ScriptedRng::new([15, 10]);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        engine.end_current_turn().unwrap();
        assert_eq!(engine.state().turn.current, Some(EntityId(2)));
        engine.end_current_turn().unwrap();
        assert_eq!(engine.state().turn.current, Some(EntityId(1)));
        assert_eq!(engine.state().turn.round, 2);
        assert_eq!(engine.state().turn.index, 0);
    }

    #[test]
    fn empty_side_ends_battle_before_first_round() {
        let mut state = state_with(&[(1, Team::Player, 0)]);
        let rng = ScriptedRng::new([]);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();

        assert_eq!(engine.state().turn.phase, TurnPhase::CombatEnd);
        assert_eq!(engine.state().turn.winner, Some(Team::Player));
        assert_eq!(engine.state().turn.round, 0);
        assert_eq!(engine.end_current_turn(), Err(TurnError::CombatOver));
        assert_eq!(engine.start_combat(), Err(TurnError::AlreadyStarted));
    }

    #[test]
    fn last_death_logs_before_battle_end() {
        let mut state = state_with(&[
            (1, Team::Player, 0),
            (2, Team::Enemy, 0),
            (3, Team::Enemy, 0),
        ]);
        let rng = ScriptedRng::new([20, 15, 10]);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();
        engine.end_current_turn().unwrap();
        assert_eq!(engine.state().turn.current, Some(EntityId(2)));

        // The only player dies during an enemy turn.
        engine.on_unit_death(EntityId(1));
        assert_eq!(engine.state().turn.phase, TurnPhase::CombatEnd);

        let events = engine.state.drain_events();
        let died = events
            .iter()
            .position(|e| matches!(e, BattleEvent::Combat(CombatEvent::UnitDied { .. })));
        let ended = events
            .iter()
            .position(|e| matches!(e, BattleEvent::Combat(CombatEvent::BattleEnded { .. })));
        assert!(died < ended);
    }

    #[test]
    fn pruning_keeps_the_next_survivor() {
        let mut state = state_with(&[
            (1, Team::Player, 0),
            (2, Team::Enemy, 0),
            (3, Team::Player, 0),
            (4, Team::Enemy, 0),
        ]);
        let rng = ScriptedRng::new([20, 15, 10, 5]);
        let config = GameConfig::default();
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
        engine.start_combat().unwrap();
        engine.end_current_turn().unwrap();
        assert_eq!(engine.state().turn.current, Some(EntityId(2)));

        engine.on_unit_death(EntityId(1));
        engine.end_current_turn().unwrap();

        assert_eq!(engine.state().turn.order, vec![EntityId(2), EntityId(3), EntityId(4)]);
        assert_eq!(engine.state().turn.current, Some(EntityId(3)));
    }
}
