use crate::ai::{AiAction, AiState, AiStep, EnemyView, MoveScorer, evaluate, nearest, pick_target};
use crate::combat::RollContext;
use crate::env::{RngOracle, compute_seed};
use crate::pathfinding::{Path, PathSettings, Pathfinder, Unoccupied};
use crate::state::{EntityId, Position};

use super::BattleEngine;

/// Uniform jitter in `[-span, span)`; zero when `span` is not positive.
fn jitter(rng: &dyn RngOracle, seed: u64, span: i32) -> i32 {
    if span <= 0 {
        return 0;
    }
    let width = span.unsigned_abs() * 2;
    rng.range(seed, 0, width - 1) as i32 - span
}

/// Enemy decision loop methods for BattleEngine.
impl BattleEngine<'_> {
    /// Runs the acting enemy's decision loop until it issues an action or ends its turn.
    ///
    /// After an action the loop is suspended in [`AiState::Waiting`];
    /// [`BattleEngine::action_finished`] resumes it for the next drive.
    pub fn drive_ai(&mut self) -> AiStep {
        loop {
            let Some(run) = self.state.ai.run() else {
                return AiStep::Inactive;
            };
            let (unit, state) = (run.unit, run.state);
            if self.state.turn.is_over() || !self.state.turn.is_current(unit) {
                self.state.ai.cancel();
                return AiStep::Inactive;
            }

            match state {
                AiState::Waiting => return AiStep::Waiting,
                AiState::Evaluate => {
                    let next = self.ai_evaluate(unit);
                    self.ai_enter(next);
                }
                AiState::Idle => self.ai_enter(AiState::EndTurn),
                AiState::EndTurn => {
                    if let Err(error) = self.end_current_turn() {
                        tracing::warn!(%unit, %error, "ai could not end its turn");
                        self.state.ai.cancel();
                    }
                    return AiStep::TurnEnded;
                }
                AiState::Moving | AiState::SeekingCover => {
                    match self.ai_move(unit, state == AiState::SeekingCover) {
                        Ok(to) => {
                            self.ai_enter(AiState::Waiting);
                            return AiStep::Suspended(AiAction::Moved { to });
                        }
                        Err(next) => self.ai_enter(next),
                    }
                }
                AiState::Attacking => match self.ai_attack(unit) {
                    Ok(target) => {
                        self.ai_enter(AiState::Waiting);
                        return AiStep::Suspended(AiAction::Attacked { target });
                    }
                    Err(next) => self.ai_enter(next),
                },
            }
        }
    }

    fn ai_enter(&mut self, state: AiState) {
        if let Some(run) = self.state.ai.run_mut() {
            run.enter(state);
        }
    }

    /// Living opponents of `unit` that are on the grid.
    fn enemies_of(&self, unit: EntityId) -> Vec<EnemyView> {
        let Some(team) = self.state.units.team_of(unit) else {
            return Vec::new();
        };
        self.state
            .units
            .living()
            .filter(|other| other.team != team)
            .filter_map(|other| {
                Some(EnemyView {
                    id: other.id,
                    position: self.state.grid.position_of(other.id)?,
                    attack_range: other.attack_range,
                })
            })
            .collect()
    }

    fn ai_evaluate(&self, unit: EntityId) -> AiState {
        let (Some(character), Some(position)) =
            (self.state.units.get(unit), self.state.grid.position_of(unit))
        else {
            return AiState::EndTurn;
        };
        let enemies = self.enemies_of(unit);
        let momentum = self.state.momentum.current(unit);
        evaluate(character, position, momentum, &enemies, self.config())
    }

    /// Moves toward the best scored tile. `Err` carries the state to fall back to.
    fn ai_move(&mut self, unit: EntityId, seeking_cover: bool) -> Result<Position, AiState> {
        let (destination, path) = self.plan_ai_move(unit, seeking_cover)?;
        self.state.commands.queue_move(unit, destination, path);
        match self.execute_command() {
            Ok(_) => Ok(destination),
            Err(error) => {
                tracing::debug!(%unit, %error, "ai move rejected");
                Err(AiState::EndTurn)
            }
        }
    }

    fn plan_ai_move(&mut self, unit: EntityId, seeking_cover: bool) -> Result<(Position, Path), AiState> {
        let config = self.config();
        let rng = self.env.rng();
        let (Some(character), Some(origin)) =
            (self.state.units.get(unit), self.state.grid.position_of(unit))
        else {
            return Err(AiState::EndTurn);
        };
        let enemies = self.enemies_of(unit);

        let threats: Vec<Position> = if seeking_cover {
            enemies
                .iter()
                .filter(|enemy| enemy.position.manhattan_distance(origin) <= enemy.attack_range)
                .map(|enemy| enemy.position)
                .collect()
        } else {
            Vec::new()
        };
        if seeking_cover && threats.is_empty() {
            return Err(AiState::Idle);
        }

        let Some(target) = pick_target(origin, &enemies, character.attack_range) else {
            return Err(AiState::EndTurn);
        };

        let policy = Unoccupied::new(unit);
        let settings =
            PathSettings::movement(character.movement_range, &policy).with_heuristic(false);
        let finder = Pathfinder::new(&self.state.grid);
        let reach = finder.reachable_set(origin, &settings);

        let scorer = MoveScorer {
            grid: &self.state.grid,
            config,
            origin,
            attack_range: character.attack_range,
            optimal_range: character.optimal_range(),
            threats: &threats,
        };
        let (seed, nonce) = (self.state.seed, self.state.nonce);
        let mut draw = 0u64;
        let best = scorer.best(&reach, target.position, || {
            let roll_seed = compute_seed(seed, nonce.wrapping_add(draw), unit.0, RollContext::Jitter.tag());
            draw += 1;
            jitter(rng, roll_seed, config.score_jitter)
        });
        let path = best.and_then(|tile| {
            finder
                .find_path(origin, tile, &settings.with_heuristic(true))
                .filter(|path| !path.is_empty())
                .map(|path| (tile, path))
        });
        self.state.nonce += 1;

        path.ok_or(AiState::EndTurn)
    }

    /// Attacks the nearest enemy in range. `Err` carries the state to fall back to.
    fn ai_attack(&mut self, unit: EntityId) -> Result<EntityId, AiState> {
        let (Some(character), Some(origin)) =
            (self.state.units.get(unit), self.state.grid.position_of(unit))
        else {
            return Err(AiState::EndTurn);
        };
        let range = character.attack_range;
        let in_range: Vec<EnemyView> = self
            .enemies_of(unit)
            .into_iter()
            .filter(|enemy| origin.manhattan_distance(enemy.position) <= range)
            .collect();
        let Some((target, _)) = nearest(origin, &in_range) else {
            tracing::debug!(%unit, "no enemy in attack range");
            return Err(AiState::EndTurn);
        };

        self.state
            .commands
            .queue_attack(unit, target.position, Some(target.id));
        match self.execute_command() {
            Ok(_) => Ok(target.id),
            Err(error) => {
                tracing::debug!(%unit, %error, "ai attack rejected");
                Err(AiState::EndTurn)
            }
        }
    }
}
