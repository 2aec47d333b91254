//! Grid search: A* shortest paths and bounded flood fill.
//!
//! Both searches share [`PathSettings`] and the neighbour generator, and only
//! read the [`Grid`]. Costs are integers scaled by [`STEP_COST`] so that a
//! diagonal step ([`DIAGONAL_COST`]) can be priced without floating point.
mod astar;
mod flood;
mod neighbors;

use std::collections::BTreeMap;

use crate::grid::Grid;
use crate::state::{EntityId, Position};

/// Cost of one orthogonal step.
pub const STEP_COST: u32 = 10;
/// Cost of one diagonal step.
pub const DIAGONAL_COST: u32 = 14;

/// Per-call walkability and cost overrides.
///
/// Both hooks default to "no override"; the grid's own walkability, bounds and
/// movement-blocking edges always apply on top of them.
pub trait PathPolicy {
    /// Additional walkability test for a cell the search wants to enter.
    fn is_walkable(&self, _grid: &Grid, _position: Position) -> bool {
        true
    }

    /// Multiplier applied to the cost of entering `position`. Values below 1 count as 1.
    fn entry_cost(&self, _grid: &Grid, _position: Position) -> u32 {
        1
    }
}

/// Policy that leaves the grid's rules untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverride;

impl PathPolicy for NoOverride {}

/// Treats cells held by any unit other than `mover` as impassable.
#[derive(Clone, Copy, Debug)]
pub struct Unoccupied {
    pub mover: EntityId,
}

impl Unoccupied {
    pub fn new(mover: EntityId) -> Self {
        Self { mover }
    }
}

impl PathPolicy for Unoccupied {
    fn is_walkable(&self, grid: &Grid, position: Position) -> bool {
        grid.occupant_at(position)
            .is_none_or(|occupant| occupant == self.mover)
    }
}

/// Options shared by [`Pathfinder::find_path`] and [`Pathfinder::reachable_set`].
#[derive(Clone, Copy)]
pub struct PathSettings<'a> {
    pub allow_diagonal: bool,
    /// A diagonal step needs both flanking orthogonal cells to be enterable.
    pub prevent_corner_cutting: bool,
    /// Without the heuristic A* degrades to uniform-cost search.
    pub use_heuristic: bool,
    /// Budget in whole orthogonal steps; `None` is unbounded.
    pub max_search_cost: Option<u32>,
    pub policy: &'a dyn PathPolicy,
}

impl Default for PathSettings<'static> {
    fn default() -> Self {
        Self {
            allow_diagonal: false,
            prevent_corner_cutting: true,
            use_heuristic: true,
            max_search_cost: None,
            policy: &NoOverride,
        }
    }
}

impl<'a> PathSettings<'a> {
    pub fn with_diagonal(mut self, allow: bool) -> Self {
        self.allow_diagonal = allow;
        self
    }

    pub fn with_corner_cutting_prevented(mut self, prevent: bool) -> Self {
        self.prevent_corner_cutting = prevent;
        self
    }

    pub fn with_heuristic(mut self, enabled: bool) -> Self {
        self.use_heuristic = enabled;
        self
    }

    pub fn with_max_search_cost(mut self, steps: u32) -> Self {
        self.max_search_cost = Some(steps);
        self
    }

    /// Settings for moving a unit: orthogonal steps within `range`, under `policy`.
    pub fn movement(range: u32, policy: &'a dyn PathPolicy) -> Self {
        PathSettings::default()
            .with_max_search_cost(range)
            .with_policy(policy)
    }

    pub fn with_policy<'b>(self, policy: &'b dyn PathPolicy) -> PathSettings<'b> {
        PathSettings {
            allow_diagonal: self.allow_diagonal,
            prevent_corner_cutting: self.prevent_corner_cutting,
            use_heuristic: self.use_heuristic,
            max_search_cost: self.max_search_cost,
            policy,
        }
    }

    /// Search budget in scaled cost units.
    pub(crate) fn budget(&self) -> u32 {
        self.max_search_cost
            .map_or(u32::MAX, |steps| steps.saturating_mul(STEP_COST))
    }
}

impl core::fmt::Debug for PathSettings<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PathSettings")
            .field("allow_diagonal", &self.allow_diagonal)
            .field("prevent_corner_cutting", &self.prevent_corner_cutting)
            .field("use_heuristic", &self.use_heuristic)
            .field("max_search_cost", &self.max_search_cost)
            .finish_non_exhaustive()
    }
}

/// Result of a successful path search.
///
/// `steps` excludes the start cell; a path whose start equals its goal has no steps.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    start: Position,
    steps: Vec<Position>,
    cost: u32,
}

impl Path {
    pub fn new(start: Position, steps: Vec<Position>, cost: u32) -> Self {
        Self { start, steps, cost }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn steps(&self) -> &[Position] {
        &self.steps
    }

    /// Last cell of the path, or the start when there are no steps.
    pub fn goal(&self) -> Position {
        self.steps.last().copied().unwrap_or(self.start)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total scaled cost of the path.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Start followed by every step.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.start).chain(self.steps.iter().copied())
    }
}

/// Cells reachable from an origin within the search budget, with their scaled costs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReachableSet {
    origin: Position,
    costs: BTreeMap<Position, u32>,
}

impl ReachableSet {
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn contains(&self, position: Position) -> bool {
        self.costs.contains_key(&position)
    }

    pub fn cost(&self, position: Position) -> Option<u32> {
        self.costs.get(&position).copied()
    }

    /// Every reachable cell, origin included, in ascending `(x, y)` order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.costs.keys().copied()
    }

    /// Reachable cells other than the origin, in ascending `(x, y)` order.
    pub fn destinations(&self) -> impl Iterator<Item = Position> + '_ {
        let origin = self.origin;
        self.positions().filter(move |&cell| cell != origin)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Stateless search front-end bound to one grid snapshot.
#[derive(Clone, Copy, Debug)]
pub struct Pathfinder<'a> {
    grid: &'a Grid,
}

impl<'a> Pathfinder<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Cheapest path from `start` to `goal`, or `None` when unreachable within budget.
    pub fn find_path(&self, start: Position, goal: Position, settings: &PathSettings<'_>) -> Option<Path> {
        astar::find_path(self.grid, start, goal, settings)
    }

    /// Every cell reachable from `origin` within the settings' budget.
    pub fn reachable_set(&self, origin: Position, settings: &PathSettings<'_>) -> ReachableSet {
        flood::reachable_set(self.grid, origin, settings)
    }

    /// Scaled cost of one step between adjacent cells, or `None` when the searches
    /// would not take that step under `settings`.
    pub fn step_cost(&self, from: Position, to: Position, settings: &PathSettings<'_>) -> Option<u32> {
        neighbors::step_between(self.grid, from, to, settings)
    }
}

/// Admissible distance estimate in scaled cost units.
///
/// Octile distance when diagonals are allowed, Manhattan otherwise.
pub fn heuristic(a: Position, b: Position, allow_diagonal: bool) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    if allow_diagonal {
        DIAGONAL_COST * dx.min(dy) + STEP_COST * dx.abs_diff(dy)
    } else {
        STEP_COST * (dx + dy)
    }
}
