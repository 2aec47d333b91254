use arrayvec::ArrayVec;

use crate::grid::{CardinalDirection, Grid};
use crate::state::Position;

use super::{DIAGONAL_COST, PathSettings, STEP_COST};

const DIAGONALS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Cells a search may enter from `from`, paired with the scaled cost of the step.
pub(super) fn neighbors(
    grid: &Grid,
    from: Position,
    settings: &PathSettings<'_>,
) -> ArrayVec<(Position, u32), 8> {
    let mut out = ArrayVec::new();

    for direction in CardinalDirection::ALL {
        let (dx, dy) = direction.delta();
        let next = from.offset(dx, dy);
        if let Some(cost) = step_between(grid, from, next, settings) {
            out.push((next, cost));
        }
    }

    if !settings.allow_diagonal {
        return out;
    }

    for (dx, dy) in DIAGONALS {
        let next = from.offset(dx, dy);
        if let Some(cost) = step_between(grid, from, next, settings) {
            out.push((next, cost));
        }
    }

    out
}

/// Scaled cost of a single step from `from` to `to`, or `None` when a search
/// under `settings` would never take it.
pub(super) fn step_between(
    grid: &Grid,
    from: Position,
    to: Position,
    settings: &PathSettings<'_>,
) -> Option<u32> {
    if !from.is_adjacent(to) || !enterable(grid, to, settings) {
        return None;
    }
    if from.is_orthogonally_adjacent(to) {
        if grid.blocks_movement_between(from, to) {
            return None;
        }
        return Some(step_cost(grid, to, STEP_COST, settings));
    }

    if !settings.allow_diagonal {
        return None;
    }
    if settings.prevent_corner_cutting {
        let flank_x = Position::new(to.x, from.y);
        let flank_y = Position::new(from.x, to.y);
        if !open_corner(grid, from, flank_x, to, settings)
            || !open_corner(grid, from, flank_y, to, settings)
        {
            return None;
        }
    }
    Some(step_cost(grid, to, DIAGONAL_COST, settings))
}

/// The orthogonal detour `from -> flank -> to` is enterable and crosses no
/// movement-blocking edge.
fn open_corner(
    grid: &Grid,
    from: Position,
    flank: Position,
    to: Position,
    settings: &PathSettings<'_>,
) -> bool {
    enterable(grid, flank, settings)
        && !grid.blocks_movement_between(from, flank)
        && !grid.blocks_movement_between(flank, to)
}

fn enterable(grid: &Grid, position: Position, settings: &PathSettings<'_>) -> bool {
    grid.is_walkable(position) && settings.policy.is_walkable(grid, position)
}

fn step_cost(grid: &Grid, position: Position, base: u32, settings: &PathSettings<'_>) -> u32 {
    base.saturating_mul(settings.policy.entry_cost(grid, position).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapDimensions;
    use crate::grid::{CoverKind, CoverProp};

    #[test]
    fn corner_cutting_blocks_diagonal_past_wall() {
        let wall = Position::new(1, 0);
        let grid = Grid::build(MapDimensions::new(3, 3), 1.0, |p| p == wall, |_| 0.0);
        let settings = PathSettings::default().with_diagonal(true);

        let cells: Vec<_> = neighbors(&grid, Position::ORIGIN, &settings)
            .into_iter()
            .map(|(cell, _)| cell)
            .collect();
        assert_eq!(cells, vec![Position::new(0, 1)]);

        let loose = settings.with_corner_cutting_prevented(false);
        let cells: Vec<_> = neighbors(&grid, Position::ORIGIN, &loose)
            .into_iter()
            .map(|(cell, _)| cell)
            .collect();
        assert!(cells.contains(&Position::new(1, 1)));
    }

    #[test]
    fn movement_blocking_edges_are_not_crossed() {
        let mut grid = Grid::build(MapDimensions::new(2, 1), 1.0, |_| false, |_| 0.0);
        grid.apply_cover(&[
            CoverProp::new(Position::new(0, 0), Position::new(1, 0), CoverKind::Full)
                .blocking_movement(),
        ]);
        assert!(neighbors(&grid, Position::ORIGIN, &PathSettings::default()).is_empty());
    }

    #[test]
    fn diagonal_cannot_slip_between_edge_walls() {
        let mut grid = Grid::build(MapDimensions::new(2, 2), 1.0, |_| false, |_| 0.0);
        grid.apply_cover(&[
            CoverProp::new(Position::new(0, 0), Position::new(1, 0), CoverKind::Full)
                .blocking_movement(),
            CoverProp::new(Position::new(0, 0), Position::new(0, 1), CoverKind::Full)
                .blocking_movement(),
        ]);
        let settings = PathSettings::default().with_diagonal(true);
        assert_eq!(step_between(&grid, Position::ORIGIN, Position::new(1, 1), &settings), None);
        assert!(neighbors(&grid, Position::ORIGIN, &settings).is_empty());

        let loose = settings.with_corner_cutting_prevented(false);
        assert_eq!(
            step_between(&grid, Position::ORIGIN, Position::new(1, 1), &loose),
            Some(DIAGONAL_COST)
        );
    }

    #[test]
    fn step_between_follows_diagonal_setting() {
        let grid = Grid::build(MapDimensions::new(3, 3), 1.0, |_| false, |_| 0.0);
        let diagonal = Position::new(1, 1);
        assert_eq!(
            step_between(&grid, Position::ORIGIN, diagonal, &PathSettings::default()),
            None
        );
        assert_eq!(
            step_between(
                &grid,
                Position::ORIGIN,
                diagonal,
                &PathSettings::default().with_diagonal(true)
            ),
            Some(DIAGONAL_COST)
        );
        assert_eq!(
            step_between(&grid, Position::ORIGIN, Position::new(0, 1), &PathSettings::default()),
            Some(STEP_COST)
        );
        assert_eq!(
            step_between(&grid, Position::ORIGIN, Position::new(0, 2), &PathSettings::default()),
            None
        );
    }
}
