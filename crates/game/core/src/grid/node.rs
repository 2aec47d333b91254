use bitflags::bitflags;
use strum::Display;

use crate::state::{EntityId, Position};

/// Compass direction of an edge slot. `North` is `+y`, `East` is `+x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    /// Slot order used by [`Node::edges`].
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
    ];

    pub const fn index(self) -> usize {
        match self {
            CardinalDirection::North => 0,
            CardinalDirection::East => 1,
            CardinalDirection::South => 2,
            CardinalDirection::West => 3,
        }
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::South => (0, -1),
            CardinalDirection::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// Direction of the step from `from` to `to`, if they share an edge.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dir| from.offset(dir.delta().0, dir.delta().1) == to)
    }
}

/// Cover classification of an edge. Ordered from weakest to strongest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoverKind {
    #[default]
    None,
    Half,
    Full,
}

bitflags! {
    /// Physical effects an edge has on units on either side of it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EdgeFlags: u8 {
        const BLOCKS_LINE_OF_SIGHT = 1 << 0;
        const BLOCKS_MOVEMENT      = 1 << 1;
    }
}

/// Index of an edge in the grid's edge arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Boundary shared by two orthogonally adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    ends: [Position; 2],
    cover: CoverKind,
    flags: EdgeFlags,
}

impl Edge {
    pub(crate) fn new(a: Position, b: Position) -> Self {
        Self {
            ends: [a, b],
            cover: CoverKind::None,
            flags: EdgeFlags::empty(),
        }
    }

    pub fn ends(&self) -> [Position; 2] {
        self.ends
    }

    /// The cell on the far side of the edge as seen from `from`.
    pub fn other(&self, from: Position) -> Option<Position> {
        match self.ends {
            [a, b] if a == from => Some(b),
            [a, b] if b == from => Some(a),
            _ => None,
        }
    }

    pub fn cover(&self) -> CoverKind {
        self.cover
    }

    pub fn flags(&self) -> EdgeFlags {
        self.flags
    }

    pub fn blocks_line_of_sight(&self) -> bool {
        self.flags.contains(EdgeFlags::BLOCKS_LINE_OF_SIGHT)
    }

    pub fn blocks_movement(&self) -> bool {
        self.flags.contains(EdgeFlags::BLOCKS_MOVEMENT)
    }

    /// Applies a cover classification. Clearing cover clears every flag.
    pub(crate) fn set_cover(&mut self, cover: CoverKind, blocks_movement: bool) {
        self.cover = cover;
        self.flags = match cover {
            CoverKind::None => EdgeFlags::empty(),
            CoverKind::Half | CoverKind::Full => {
                let mut flags = EdgeFlags::BLOCKS_LINE_OF_SIGHT;
                flags.set(EdgeFlags::BLOCKS_MOVEMENT, blocks_movement);
                flags
            }
        };
    }
}

/// One grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) walkable: bool,
    pub(crate) elevation: f32,
    pub(crate) occupant: Option<EntityId>,
    /// Edge slots indexed by [`CardinalDirection::index`]; `None` at the map boundary.
    pub(crate) edges: [Option<EdgeId>; 4],
}

impl Node {
    pub(crate) fn new(walkable: bool, elevation: f32) -> Self {
        Self {
            walkable,
            elevation,
            occupant: None,
            edges: [None; 4],
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    pub fn edge(&self, direction: CardinalDirection) -> Option<EdgeId> {
        self.edges[direction.index()]
    }
}
