use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::grid::Grid;
use crate::state::Position;

use super::neighbors::neighbors;
use super::{Path, PathSettings, heuristic};

/// Frontier ordering: total estimate, then remaining estimate, then position.
type FrontierKey = Reverse<(u32, u32, Position)>;

pub(super) fn find_path(
    grid: &Grid,
    start: Position,
    goal: Position,
    settings: &PathSettings<'_>,
) -> Option<Path> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(Path::new(start, Vec::new(), 0));
    }
    if !grid.is_walkable(goal) || !settings.policy.is_walkable(grid, goal) {
        return None;
    }

    let estimate = |cell: Position| {
        if settings.use_heuristic {
            heuristic(cell, goal, settings.allow_diagonal)
        } else {
            0
        }
    };
    let budget = settings.budget();

    let mut open: BinaryHeap<FrontierKey> = BinaryHeap::new();
    let mut best: BTreeMap<Position, u32> = BTreeMap::new();
    let mut parent: BTreeMap<Position, Position> = BTreeMap::new();
    let mut closed: BTreeSet<Position> = BTreeSet::new();

    best.insert(start, 0);
    open.push(Reverse((estimate(start), estimate(start), start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if !closed.insert(current) {
            continue;
        }
        let g = best.get(&current).copied().unwrap_or(u32::MAX);
        if current == goal {
            return Some(retrace(start, goal, &parent, g));
        }

        for (next, step) in neighbors(grid, current, settings) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g.saturating_add(step);
            if tentative > budget {
                continue;
            }
            if best.get(&next).is_some_and(|&known| known <= tentative) {
                continue;
            }
            best.insert(next, tentative);
            parent.insert(next, current);
            let h = estimate(next);
            open.push(Reverse((tentative.saturating_add(h), h, next)));
        }
    }

    None
}

fn retrace(
    start: Position,
    goal: Position,
    parent: &BTreeMap<Position, Position>,
    cost: u32,
) -> Path {
    let mut steps = vec![goal];
    let mut cursor = goal;
    while let Some(&previous) = parent.get(&cursor) {
        if previous == start {
            break;
        }
        steps.push(previous);
        cursor = previous;
    }
    steps.reverse();
    Path::new(start, steps, cost)
}
