//! Content factory for assembling battles from a data directory.

use std::path::{Path, PathBuf};

use tactics_core::{BattleState, GameConfig};

use crate::loaders::{ConfigLoader, LoadResult, MapLoader, Scenario, ScenarioLoader, ScenarioMap};

/// Everything needed to start one battle.
#[derive(Clone, Debug)]
pub struct Battle {
    pub scenario: Scenario,
    pub map: ScenarioMap,
    pub config: GameConfig,
}

impl Battle {
    /// Fresh state for this battle; call again to restart from scratch.
    pub fn build_state(&self) -> LoadResult<BattleState> {
        self.scenario.build_state(&self.map, &self.config)
    }
}

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml          (optional)
/// ├── maps/
/// │   └── skirmish.ron
/// └── scenarios/
///     └── skirmish.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load rules from `config.toml`, or defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load_or_default(&self.data_dir.join("config.toml"))
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<ScenarioMap> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{scenario_name}.toml`.
    pub fn load_scenario(&self, scenario_name: &str) -> LoadResult<Scenario> {
        let path = self
            .data_dir
            .join("scenarios")
            .join(format!("{}.toml", scenario_name));
        ScenarioLoader::load(&path)
    }

    /// Load a scenario together with its map and the rules configuration.
    pub fn load_battle(&self, scenario_name: &str) -> LoadResult<Battle> {
        let scenario = self.load_scenario(scenario_name)?;
        let map = self.load_map(&scenario.map)?;
        let config = self.load_config()?;
        tracing::info!(
            scenario = scenario_name,
            map = %scenario.map,
            units = scenario.units.len(),
            "battle content loaded"
        );
        Ok(Battle {
            scenario,
            map,
            config,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
