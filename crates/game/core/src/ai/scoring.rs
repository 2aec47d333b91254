use crate::config::GameConfig;
use crate::grid::{CoverKind, Grid};
use crate::pathfinding::ReachableSet;
use crate::state::Position;

use super::decision::{EnemyView, nearest};

/// Score of standing on `tile` against a target at `target`, before jitter and cover.
pub fn score_tile(
    tile: Position,
    target: Position,
    optimal_range: u32,
    pursuit: bool,
    config: &GameConfig,
) -> i32 {
    let distance = tile.manhattan_distance(target) as i32;
    let optimal = optimal_range as i32;
    let min_range = config.min_safe_range as i32;

    if pursuit {
        let mut score = -(distance - optimal).abs();
        if distance < min_range {
            score -= config.pursuit_close_penalty;
        }
        score
    } else if distance < min_range {
        -config.close_range_penalty
    } else if distance == optimal {
        config.optimal_range_bonus
    } else {
        -(distance - optimal).abs()
    }
}

/// Enemy the movement search positions against: nearest in attack range, else nearest overall.
pub fn pick_target(from: Position, enemies: &[EnemyView], attack_range: u32) -> Option<EnemyView> {
    let in_range: Vec<EnemyView> = enemies
        .iter()
        .copied()
        .filter(|enemy| from.manhattan_distance(enemy.position) <= attack_range)
        .collect();

    nearest(from, &in_range)
        .or_else(|| nearest(from, enemies))
        .map(|(enemy, _)| enemy)
}

/// Picks the best destination out of a reachable set.
pub struct MoveScorer<'a> {
    pub grid: &'a Grid,
    pub config: &'a GameConfig,
    pub origin: Position,
    pub attack_range: u32,
    pub optimal_range: u32,
    /// Threat positions rewarded for facing cover; empty outside cover seeking.
    pub threats: &'a [Position],
}

impl MoveScorer<'_> {
    /// Highest scoring destination other than the origin; the first found wins ties.
    ///
    /// `jitter` is called once per candidate, in ascending `(x, y)` order.
    pub fn best(
        &self,
        reach: &ReachableSet,
        target: Position,
        mut jitter: impl FnMut() -> i32,
    ) -> Option<Position> {
        let pursuit = self.origin.manhattan_distance(target) > self.attack_range;
        let mut best: Option<(Position, i32)> = None;

        for tile in reach.destinations() {
            let score = score_tile(tile, target, self.optimal_range, pursuit, self.config)
                + self.cover_bonus(tile)
                + jitter();
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((tile, score));
            }
        }

        best.map(|(tile, _)| tile)
    }

    fn cover_bonus(&self, tile: Position) -> i32 {
        self.threats
            .iter()
            .map(|&threat| match self.grid.cover_facing(tile, threat) {
                CoverKind::Full => self.config.full_cover_bonus,
                CoverKind::Half => self.config.half_cover_bonus,
                CoverKind::None => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapDimensions;
    use crate::grid::CoverProp;
    use crate::pathfinding::{PathSettings, Pathfinder};
    use crate::state::EntityId;

    #[test]
    fn non_pursuit_rewards_optimal_and_punishes_close() {
        let config = GameConfig::default();
        let target = Position::new(0, 0);
        assert_eq!(score_tile(Position::new(0, 3), target, 3, false, &config), 10);
        assert_eq!(score_tile(Position::new(0, 0), target, 3, false, &config), -20);
        assert_eq!(score_tile(Position::new(0, 5), target, 3, false, &config), -2);
    }

    #[test]
    fn pursuit_is_gentler_up_close() {
        let config = GameConfig::default();
        let target = Position::new(0, 0);
        assert_eq!(score_tile(Position::new(0, 3), target, 3, true, &config), 0);
        assert_eq!(score_tile(Position::new(0, 0), target, 3, true, &config), -8);
        assert_eq!(score_tile(Position::new(0, 7), target, 3, true, &config), -4);
    }

    #[test]
    fn target_prefers_in_range_enemies() {
        let enemies = [
            EnemyView {
                id: EntityId(2),
                position: Position::new(9, 9),
                attack_range: 1,
            },
            EnemyView {
                id: EntityId(3),
                position: Position::new(0, 4),
                attack_range: 1,
            },
        ];
        let target = pick_target(Position::ORIGIN, &enemies, 5).unwrap();
        assert_eq!(target.id, EntityId(3));
        let fallback = pick_target(Position::ORIGIN, &enemies[..1], 5).unwrap();
        assert_eq!(fallback.id, EntityId(2));
    }

    #[test]
    fn pursuit_closes_as_far_as_reach_allows() {
        let grid = Grid::build(MapDimensions::new(1, 10), 1.0, |_| false, |_| 0.0);
        let config = GameConfig::default();
        let reach = Pathfinder::new(&grid)
            .reachable_set(Position::new(0, 0), &PathSettings::default().with_max_search_cost(5));
        let scorer = MoveScorer {
            grid: &grid,
            config: &config,
            origin: Position::new(0, 0),
            attack_range: 5,
            optimal_range: 3,
            threats: &[],
        };
        assert_eq!(scorer.best(&reach, Position::new(0, 9), || 0), Some(Position::new(0, 5)));
    }

    #[test]
    fn cover_bias_breaks_ties_toward_protected_tiles() {
        let mut grid = Grid::build(MapDimensions::new(3, 3), 1.0, |_| false, |_| 0.0);
        grid.apply_cover(&[CoverProp::new(
            Position::new(2, 1),
            Position::new(2, 2),
            CoverKind::Full,
        )]);
        let config = GameConfig::default();
        let reach = Pathfinder::new(&grid)
            .reachable_set(Position::new(0, 0), &PathSettings::default().with_max_search_cost(4));
        let threat = [Position::new(2, 2)];
        let scorer = MoveScorer {
            grid: &grid,
            config: &config,
            origin: Position::new(0, 0),
            attack_range: 5,
            optimal_range: 1,
            threats: &threat,
        };
        assert_eq!(scorer.best(&reach, Position::new(2, 2), || 0), Some(Position::new(2, 1)));
    }
}
