use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::grid::Grid;
use crate::state::Position;

use super::neighbors::neighbors;
use super::{PathSettings, ReachableSet};

/// Uniform-cost expansion from `origin`, keeping every cell within budget.
///
/// The origin is always part of the result when it is in bounds.
pub(super) fn reachable_set(
    grid: &Grid,
    origin: Position,
    settings: &PathSettings<'_>,
) -> ReachableSet {
    let mut costs: BTreeMap<Position, u32> = BTreeMap::new();
    if !grid.in_bounds(origin) {
        return ReachableSet { origin, costs };
    }

    let budget = settings.budget();
    let mut frontier: BinaryHeap<Reverse<(u32, Position)>> = BinaryHeap::new();
    costs.insert(origin, 0);
    frontier.push(Reverse((0, origin)));

    while let Some(Reverse((cost, current))) = frontier.pop() {
        if costs.get(&current).is_some_and(|&settled| settled < cost) {
            continue;
        }
        for (next, step) in neighbors(grid, current, settings) {
            let tentative = cost.saturating_add(step);
            if tentative > budget {
                continue;
            }
            if costs.get(&next).is_some_and(|&known| known <= tentative) {
                continue;
            }
            costs.insert(next, tentative);
            frontier.push(Reverse((tentative, next)));
        }
    }

    ReachableSet { origin, costs }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use super::*;
    use crate::env::MapDimensions;
    use crate::grid::CardinalDirection;

    /// Breadth-first step counts over orthogonal moves, the reference for flood results.
    fn bfs(grid: &Grid, origin: Position, limit: u32) -> BTreeSet<Position> {
        let mut seen = BTreeMap::new();
        let mut queue = VecDeque::new();
        seen.insert(origin, 0u32);
        queue.push_back(origin);
        while let Some(cell) = queue.pop_front() {
            let depth = seen[&cell];
            if depth == limit {
                continue;
            }
            for direction in CardinalDirection::ALL {
                let (dx, dy) = direction.delta();
                let next = cell.offset(dx, dy);
                if grid.is_walkable(next) && !seen.contains_key(&next) {
                    seen.insert(next, depth + 1);
                    queue.push_back(next);
                }
            }
        }
        seen.into_keys().collect()
    }

    #[test]
    fn open_grid_radius_two_has_thirteen_cells() {
        let grid = Grid::build(MapDimensions::new(5, 5), 1.0, |_| false, |_| 0.0);
        let settings = PathSettings::default().with_max_search_cost(2);
        let reach = reachable_set(&grid, Position::new(2, 2), &settings);

        assert_eq!(reach.len(), 13);
        for cell in reach.positions() {
            assert!(cell.manhattan_distance(Position::new(2, 2)) <= 2);
        }
        assert_eq!(reach.cost(Position::new(2, 2)), Some(0));
        assert_eq!(reach.destinations().count(), 12);
    }

    #[test]
    fn matches_breadth_first_reference_on_fixtures() {
        let fixtures: [&[Position]; 3] = [
            &[],
            &[Position::new(1, 1), Position::new(1, 2), Position::new(1, 3)],
            &[
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(3, 3),
                Position::new(0, 3),
                Position::new(4, 1),
            ],
        ];

        for blocked in fixtures {
            let blocked = blocked.to_vec();
            let grid = Grid::build(
                MapDimensions::new(6, 5),
                1.0,
                |p| blocked.contains(&p),
                |_| 0.0,
            );
            for limit in 0..6 {
                let settings = PathSettings::default().with_max_search_cost(limit);
                let origin = Position::new(0, 0);
                let flood: BTreeSet<_> = reachable_set(&grid, origin, &settings)
                    .positions()
                    .collect();
                assert_eq!(flood, bfs(&grid, origin, limit), "limit {limit}");
            }
        }
    }

    #[test]
    fn out_of_bounds_origin_is_empty() {
        let grid = Grid::build(MapDimensions::new(2, 2), 1.0, |_| false, |_| 0.0);
        assert!(reachable_set(&grid, Position::new(5, 5), &PathSettings::default()).is_empty());
    }
}
