use crate::grid::Grid;
use crate::pathfinding::{Path, PathSettings, Pathfinder};
use crate::state::{Character, EntityId, Position};

use super::CommandError;

/// Re-derives a staged path instead of trusting it.
///
/// Every step must be one the pathfinder would take under `settings`: adjacent
/// to the previous cell (diagonally only when diagonals are allowed, and never
/// around a blocked corner), walkable, free of other units and not across a
/// movement-blocking edge. The path must end on `destination` and fit in the
/// budget of `settings`.
pub fn validate_path(
    grid: &Grid,
    unit: EntityId,
    path: &Path,
    destination: Position,
    settings: &PathSettings<'_>,
) -> Result<(), CommandError> {
    if path.is_empty() {
        return Err(CommandError::EmptyPath);
    }
    let from = grid.position_of(unit).ok_or(CommandError::NotPlaced(unit))?;
    if path.start() != from {
        return Err(CommandError::PathDetached {
            from,
            at: path.start(),
        });
    }

    let finder = Pathfinder::new(grid);
    let mut cost = 0u32;
    let mut previous = from;
    for &step in path.steps() {
        let reachable_step = previous.is_orthogonally_adjacent(step)
            || (settings.allow_diagonal && previous.is_adjacent(step));
        if !reachable_step {
            return Err(CommandError::PathDiscontinuous { at: step });
        }
        if grid.occupant_at(step).is_some_and(|occupant| occupant != unit) {
            return Err(CommandError::PathBlocked { at: step });
        }
        let step_cost = finder
            .step_cost(previous, step, settings)
            .ok_or(CommandError::PathBlocked { at: step })?;
        cost = cost.saturating_add(step_cost);
        previous = step;
    }

    if previous != destination {
        return Err(CommandError::PathMismatch {
            destination,
            end: previous,
        });
    }

    let max = settings.budget();
    if cost > max {
        return Err(CommandError::PathTooLong { cost, max });
    }
    Ok(())
}

/// Checks that `target` can be attacked by `attacker` standing at `from`.
pub fn validate_target(
    attacker: &Character,
    from: Position,
    target: &Character,
    target_position: Position,
) -> Result<(), CommandError> {
    if target.team == attacker.team {
        return Err(CommandError::FriendlyTarget(target.id));
    }
    if !target.is_alive() {
        return Err(CommandError::TargetDead(target.id));
    }
    let distance = from.manhattan_distance(target_position);
    if distance > attacker.attack_range {
        return Err(CommandError::OutOfRange {
            distance,
            range: attacker.attack_range,
        });
    }
    Ok(())
}
