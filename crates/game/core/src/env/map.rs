use crate::grid::CoverProp;
use crate::state::Position;

/// Static battlefield description used to build a [`crate::grid::Grid`].
///
/// Implementations answer the physical questions grid construction asks once
/// per cell: is something standing in the way, and how high is the ground.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    /// True when a static obstacle occupies the cell's footprint.
    fn is_obstructed(&self, position: Position) -> bool;

    /// Terrain height sampled at the cell centre.
    fn elevation(&self, _position: Position) -> f32 {
        0.0
    }

    /// World-space edge length of one cell.
    fn cell_size(&self) -> f32 {
        1.0
    }

    /// Cover declarations applied onto grid edges after construction.
    fn cover_props(&self) -> Vec<CoverProp> {
        Vec::new()
    }

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Flat, obstacle-free map with no cover. Handy for tests and tooling.
#[derive(Clone, Copy, Debug)]
pub struct OpenMap {
    dimensions: MapDimensions,
}

impl OpenMap {
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
        }
    }
}

impl MapOracle for OpenMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn is_obstructed(&self, _position: Position) -> bool {
        false
    }
}
