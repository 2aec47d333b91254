use crate::config::GameConfig;
use crate::state::{Character, EntityId, Position};

use super::AiState;

/// What the controller knows about one opposing unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyView {
    pub id: EntityId,
    pub position: Position,
    pub attack_range: u32,
}

/// Closest enemy by Manhattan distance; the first listed wins ties.
pub fn nearest(from: Position, enemies: &[EnemyView]) -> Option<(EnemyView, u32)> {
    enemies
        .iter()
        .map(|enemy| (*enemy, from.manhattan_distance(enemy.position)))
        .fold(None, |best, candidate| match best {
            Some((_, distance)) if distance <= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Chooses the next state from [`AiState::Evaluate`].
pub fn evaluate(
    unit: &Character,
    position: Position,
    momentum: u32,
    enemies: &[EnemyView],
    config: &GameConfig,
) -> AiState {
    let can_act = momentum >= config.min_action_cost;
    if !can_act {
        return AiState::Idle;
    }

    if unit.is_below_health_percent(config.low_health_percent) {
        return AiState::SeekingCover;
    }

    match nearest(position, enemies) {
        Some((_, distance)) if distance <= config.min_safe_range => AiState::Moving,
        Some((_, distance)) if distance <= unit.optimal_range() => AiState::Attacking,
        Some(_) => AiState::Moving,
        None => AiState::Moving,
    }
}
