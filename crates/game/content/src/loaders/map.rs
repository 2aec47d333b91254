//! Map data loader.
//!
//! Loads static battlefield data from map RON files: obstacles, terrain
//! elevation and cover props. Unit placement lives in scenario files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tactics_core::{CoverKind, CoverProp, MapDimensions, MapOracle, Position};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Deserialize)]
struct MapDataRon {
    dimensions: (u32, u32),
    #[serde(default = "default_cell_size")]
    cell_size: f32,
    #[serde(default)]
    obstacles: Vec<(i32, i32)>,
    #[serde(default)]
    elevation: Vec<(i32, i32, f32)>,
    #[serde(default)]
    cover: Vec<CoverRon>,
}

#[derive(Debug, Clone, Deserialize)]
struct CoverRon {
    #[serde(default)]
    name: String,
    a: (i32, i32),
    b: (i32, i32),
    #[serde(default = "default_cover_kind")]
    kind: CoverKind,
    #[serde(default)]
    blocks_movement: bool,
}

fn default_cell_size() -> f32 {
    1.0
}

fn default_cover_kind() -> CoverKind {
    CoverKind::Full
}

/// Battlefield loaded from a map file.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioMap {
    dimensions: MapDimensions,
    cell_size: f32,
    obstacles: BTreeSet<Position>,
    elevation: BTreeMap<Position, f32>,
    cover: Vec<CoverProp>,
}

impl ScenarioMap {
    pub fn obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        self.obstacles.iter().copied()
    }
}

impl MapOracle for ScenarioMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn is_obstructed(&self, position: Position) -> bool {
        self.obstacles.contains(&position)
    }

    fn elevation(&self, position: Position) -> f32 {
        self.elevation.get(&position).copied().unwrap_or(0.0)
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn cover_props(&self) -> Vec<CoverProp> {
        self.cover.clone()
    }
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioMap> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses map RON. Obstacles outside the map are dropped with a warning.
    pub fn parse(content: &str) -> LoadResult<ScenarioMap> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let dimensions = MapDimensions::new(data.dimensions.0, data.dimensions.1);
        if dimensions.cell_count() == 0 {
            anyhow::bail!("Map dimensions must be non-zero, got {:?}", data.dimensions);
        }

        let mut obstacles = BTreeSet::new();
        for (x, y) in data.obstacles {
            let position = Position::new(x, y);
            if !dimensions.contains(position) {
                tracing::warn!(%position, "obstacle outside the map ignored");
                continue;
            }
            obstacles.insert(position);
        }

        let elevation = data
            .elevation
            .into_iter()
            .map(|(x, y, height)| (Position::new(x, y), height))
            .collect();

        let cover = data
            .cover
            .into_iter()
            .map(|prop| {
                let mut cover = CoverProp::new(
                    Position::new(prop.a.0, prop.a.1),
                    Position::new(prop.b.0, prop.b.1),
                    prop.kind,
                )
                .named(prop.name);
                cover.blocks_movement = prop.blocks_movement;
                cover
            })
            .collect();

        Ok(ScenarioMap {
            dimensions,
            cell_size: data.cell_size,
            obstacles,
            elevation,
            cover,
        })
    }
}
