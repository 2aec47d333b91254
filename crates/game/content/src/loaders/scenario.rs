//! Scenario loader.
//!
//! A scenario names its map, fixes the battle seed and lists the units that
//! take part, with their starting cells and stat overrides.

use std::path::Path;

use serde::Deserialize;
use tactics_core::{
    BattleState, Character, EntityId, GameConfig, Grid, MapOracle, Position, Team,
};

use crate::loaders::{LoadResult, read_file};

/// One unit entry of a scenario file. Omitted stats use the unit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitSpec {
    pub id: u32,
    pub name: String,
    pub team: Team,
    pub position: (i32, i32),
    #[serde(default = "defaults::max_hp")]
    pub max_hp: u32,
    /// Starting HP; full health when omitted.
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default = "defaults::armor_class")]
    pub armor_class: i32,
    #[serde(default = "defaults::attack_mod")]
    pub attack_mod: i32,
    #[serde(default = "defaults::damage_die")]
    pub damage_die: u32,
    #[serde(default = "defaults::damage_mod")]
    pub damage_mod: i32,
    #[serde(default = "defaults::initiative_mod")]
    pub initiative_mod: i32,
    #[serde(default = "defaults::movement_range")]
    pub movement_range: u32,
    #[serde(default = "defaults::attack_range")]
    pub attack_range: u32,
}

mod defaults {
    use tactics_core::Character;

    pub fn max_hp() -> u32 {
        Character::DEFAULT_MAX_HP
    }
    pub fn armor_class() -> i32 {
        Character::DEFAULT_ARMOR_CLASS
    }
    pub fn attack_mod() -> i32 {
        Character::DEFAULT_ATTACK_MOD
    }
    pub fn damage_die() -> u32 {
        Character::DEFAULT_DAMAGE_DIE
    }
    pub fn damage_mod() -> i32 {
        Character::DEFAULT_DAMAGE_MOD
    }
    pub fn initiative_mod() -> i32 {
        Character::DEFAULT_INITIATIVE_MOD
    }
    pub fn movement_range() -> u32 {
        Character::DEFAULT_MOVEMENT_RANGE
    }
    pub fn attack_range() -> u32 {
        Character::DEFAULT_ATTACK_RANGE
    }
}

impl UnitSpec {
    pub fn position(&self) -> Position {
        Position::new(self.position.0, self.position.1)
    }

    pub fn to_character(&self) -> Character {
        let unit = Character::new(EntityId(self.id), self.name.clone(), self.team)
            .with_max_hp(self.max_hp)
            .with_armor_class(self.armor_class)
            .with_attack_mod(self.attack_mod)
            .with_damage(self.damage_die, self.damage_mod)
            .with_initiative_mod(self.initiative_mod)
            .with_movement_range(self.movement_range)
            .with_attack_range(self.attack_range);
        match self.hp {
            Some(hp) => unit.with_hp(hp),
            None => unit,
        }
    }
}

/// Battle setup read from a scenario TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Map file name under `maps/`, without extension.
    pub map: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

impl Scenario {
    /// Builds the grid from `map` and registers every unit in file order.
    pub fn build_state(&self, map: &dyn MapOracle, config: &GameConfig) -> LoadResult<BattleState> {
        let grid = Grid::from_oracle(map);
        let mut state = BattleState::new(grid, config).with_seed(self.seed);

        for unit in &self.units {
            state
                .register_unit(unit.to_character(), unit.position())
                .map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to place unit {} ({}) at {:?}: {}",
                        unit.id,
                        unit.name,
                        unit.position,
                        e
                    )
                })?;
        }

        tracing::debug!(
            scenario = %self.name,
            units = self.units.len(),
            seed = self.seed,
            "scenario state built"
        );
        Ok(state)
    }
}

/// Loader for scenarios from TOML files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario TOML: {}", e))
    }
}
