//! Battlefield grid: nodes, the shared edge mesh, cover and occupancy.
//!
//! The grid is built once per battle. Nodes are stored row-major and each
//! holds up to four [`EdgeId`]s into an arena owned by the grid, so the edge
//! between two neighbours is the same object from either side. Occupancy is
//! tracked both on the node and in a reverse index keyed by unit, and only
//! [`Grid::place`], [`Grid::remove`] and [`Grid::relocate`] touch either.
mod coords;
mod cover;
mod node;

use std::collections::BTreeMap;

pub use coords::WorldPoint;
pub use cover::CoverProp;
pub use node::{CardinalDirection, CoverKind, Edge, EdgeFlags, EdgeId, Node};

use crate::env::{MapDimensions, MapOracle};
use crate::state::{EntityId, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("position {0} is not walkable")]
    NotWalkable(Position),

    #[error("position {position} is already occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: EntityId,
    },

    #[error("unit {0} is not placed on the grid")]
    NotPlaced(EntityId),
}

#[derive(Clone, Debug)]
pub struct Grid {
    dimensions: MapDimensions,
    cell_size: f32,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    occupants: BTreeMap<EntityId, Position>,
}

impl Grid {
    /// Allocates nodes, links the edge mesh and samples every cell once.
    pub fn build(
        dimensions: MapDimensions,
        cell_size: f32,
        is_obstructed: impl Fn(Position) -> bool,
        elevation: impl Fn(Position) -> f32,
    ) -> Self {
        let cell_size = if cell_size > 0.0 {
            cell_size
        } else {
            tracing::warn!(cell_size, "non-positive cell size, using 1.0");
            1.0
        };

        let mut grid = Self {
            dimensions,
            cell_size,
            nodes: Vec::with_capacity(dimensions.cell_count()),
            edges: Vec::new(),
            occupants: BTreeMap::new(),
        };

        for y in 0..dimensions.height as i32 {
            for x in 0..dimensions.width as i32 {
                let position = Position::new(x, y);
                grid.nodes
                    .push(Node::new(!is_obstructed(position), elevation(position)));

                if y > 0 {
                    grid.link(position, CardinalDirection::South);
                }
                if x > 0 {
                    grid.link(position, CardinalDirection::West);
                }
            }
        }

        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            edges = grid.edges.len(),
            "grid built"
        );
        grid
    }

    /// Builds the grid from a map oracle and applies its cover declarations.
    pub fn from_oracle(map: &dyn MapOracle) -> Self {
        let mut grid = Self::build(
            map.dimensions(),
            map.cell_size(),
            |position| map.is_obstructed(position),
            |position| map.elevation(position),
        );
        grid.apply_cover(&map.cover_props());
        grid
    }

    /// Creates the edge between `position` and its neighbour in `direction`.
    fn link(&mut self, position: Position, direction: CardinalDirection) {
        let (dx, dy) = direction.delta();
        let neighbour = position.offset(dx, dy);
        let (Some(here), Some(there)) = (self.index_of(position), self.index_of(neighbour)) else {
            return;
        };

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge::new(position, neighbour));
        self.nodes[here].edges[direction.index()] = Some(id);
        self.nodes[there].edges[direction.opposite().index()] = Some(id);
    }

    /// Writes cover onto the edges named by `props`, returning how many were applied.
    ///
    /// Props referencing cells outside the grid, or cells that do not share an
    /// edge, are skipped with a warning.
    pub fn apply_cover(&mut self, props: &[CoverProp]) -> usize {
        let mut applied = 0;
        for prop in props {
            if !self.in_bounds(prop.a) || !self.in_bounds(prop.b) {
                tracing::warn!(
                    prop = %prop.name,
                    a = %prop.a,
                    b = %prop.b,
                    "cover prop is out of bounds, skipping"
                );
                continue;
            }

            let Some(id) = self.edge_id_between(prop.a, prop.b) else {
                tracing::warn!(
                    prop = %prop.name,
                    a = %prop.a,
                    b = %prop.b,
                    "cover prop cells are not adjacent, skipping"
                );
                continue;
            };

            self.edges[id.index()].set_cover(prop.kind, prop.blocks_movement);
            applied += 1;
        }
        applied
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        self.in_bounds(position)
            .then(|| position.y as usize * self.dimensions.width as usize + position.x as usize)
    }

    pub fn node(&self, position: Position) -> Option<&Node> {
        self.index_of(position).map(|index| &self.nodes[index])
    }

    fn node_mut(&mut self, position: Position) -> Option<&mut Node> {
        self.index_of(position).map(|index| &mut self.nodes[index])
    }

    /// False outside the grid or on cells blocked by a static obstacle.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.node(position).is_some_and(Node::is_walkable)
    }

    pub fn elevation(&self, position: Position) -> Option<f32> {
        self.node(position).map(Node::elevation)
    }

    /// Every cell in ascending `(x, y)` order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let height = self.dimensions.height as i32;
        (0..self.dimensions.width as i32)
            .flat_map(move |x| (0..height).map(move |y| Position::new(x, y)))
    }

    // ===== edges =====

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_in(&self, position: Position, direction: CardinalDirection) -> Option<&Edge> {
        let id = self.node(position)?.edge(direction)?;
        self.edge(id)
    }

    fn edge_id_between(&self, a: Position, b: Position) -> Option<EdgeId> {
        let direction = CardinalDirection::between(a, b)?;
        self.node(a)?.edge(direction)
    }

    /// The edge joining two orthogonally adjacent cells.
    pub fn edge_between(&self, a: Position, b: Position) -> Option<&Edge> {
        self.edge_id_between(a, b).and_then(|id| self.edge(id))
    }

    pub fn cover_between(&self, a: Position, b: Position) -> CoverKind {
        self.edge_between(a, b)
            .map_or(CoverKind::None, Edge::cover)
    }

    /// Best cover on the sides of `cell` that face `threat`.
    pub fn cover_facing(&self, cell: Position, threat: Position) -> CoverKind {
        let dx = (threat.x - cell.x).signum();
        let dy = (threat.y - cell.y).signum();

        CardinalDirection::ALL
            .into_iter()
            .filter(|direction| {
                let (ex, ey) = direction.delta();
                (ex != 0 && ex == dx) || (ey != 0 && ey == dy)
            })
            .filter_map(|direction| self.edge_in(cell, direction))
            .map(Edge::cover)
            .max()
            .unwrap_or_default()
    }

    /// True when an orthogonal step between the two cells crosses a movement-blocking edge.
    pub fn blocks_movement_between(&self, a: Position, b: Position) -> bool {
        self.edge_between(a, b).is_some_and(Edge::blocks_movement)
    }

    // ===== occupancy =====

    pub fn occupant_at(&self, position: Position) -> Option<EntityId> {
        self.node(position).and_then(Node::occupant)
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupant_at(position).is_some()
    }

    pub fn position_of(&self, unit: EntityId) -> Option<Position> {
        self.occupants.get(&unit).copied()
    }

    /// Places `unit` on `position`, moving it if it already stands elsewhere.
    pub fn place(&mut self, position: Position, unit: EntityId) -> Result<(), GridError> {
        let node = self.node(position).ok_or(GridError::OutOfBounds(position))?;
        if !node.is_walkable() {
            return Err(GridError::NotWalkable(position));
        }
        match node.occupant() {
            Some(occupant) if occupant != unit => {
                return Err(GridError::Occupied { position, occupant });
            }
            Some(_) => return Ok(()),
            None => {}
        }

        if let Some(previous) = self.occupants.get(&unit).copied() {
            self.clear_node(previous, unit);
        }
        if let Some(node) = self.node_mut(position) {
            node.occupant = Some(unit);
        }
        self.occupants.insert(unit, position);
        Ok(())
    }

    /// Clears `unit` from `position`. Does nothing if another unit (or none) is stored there.
    pub fn remove(&mut self, position: Position, unit: EntityId) -> bool {
        if self.occupant_at(position) != Some(unit) {
            tracing::debug!(%unit, %position, "stale removal ignored");
            return false;
        }
        self.clear_node(position, unit);
        self.occupants.remove(&unit);
        true
    }

    fn clear_node(&mut self, position: Position, unit: EntityId) {
        if let Some(node) = self.node_mut(position)
            && node.occupant == Some(unit)
        {
            node.occupant = None;
        }
    }

    /// Moves a placed unit to `to`, returning its previous position.
    ///
    /// On failure the unit stays where it was.
    pub fn relocate(&mut self, unit: EntityId, to: Position) -> Result<Position, GridError> {
        let from = self.position_of(unit).ok_or(GridError::NotPlaced(unit))?;
        if from == to {
            return Ok(from);
        }
        self.place(to, unit)?;
        Ok(from)
    }

    // ===== ranges and coordinates =====

    /// In-bounds cells at Manhattan distance `1..=range` from `origin`, in ascending `(x, y)` order.
    pub fn cells_within(&self, origin: Position, range: u32) -> Vec<Position> {
        let dimensions = self.dimensions();
        let span = dimensions.width.saturating_add(dimensions.height);
        let reach = i32::try_from(range.min(span)).unwrap_or(i32::MAX);
        let mut cells = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let cell = origin.offset(dx, dy);
                let distance = origin.manhattan_distance(cell);
                if distance >= 1 && distance <= range && self.in_bounds(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Cell containing the world point; cell centres sit on integer multiples of the cell size.
    pub fn world_to_grid(&self, point: WorldPoint) -> Position {
        let half = self.cell_size / 2.0;
        Position::new(
            ((point.x + half) / self.cell_size).floor() as i32,
            ((point.z + half) / self.cell_size).floor() as i32,
        )
    }

    /// Centre of `position` in world space, optionally raised to the sampled terrain height.
    pub fn grid_to_world(&self, position: Position, use_elevation: bool) -> WorldPoint {
        let height = if use_elevation {
            self.elevation(position).unwrap_or(0.0)
        } else {
            0.0
        };
        WorldPoint::new(
            position.x as f32 * self.cell_size,
            height,
            position.y as f32 * self.cell_size,
        )
    }

    /// World waypoints for a sequence of cells, at terrain height.
    pub fn path_to_world(&self, steps: &[Position]) -> Vec<WorldPoint> {
        steps
            .iter()
            .map(|&step| self.grid_to_world(step, true))
            .collect()
    }
}
