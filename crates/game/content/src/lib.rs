//! Data-driven battle content and loaders.
//!
//! This crate turns data files into the inputs a battle needs:
//! - Map layouts: obstacles, elevation and cover (RON)
//! - Scenarios: battle seed, map reference and unit roster (TOML)
//! - Rules configuration (TOML)
//!
//! Content feeds [`tactics_core::MapOracle`] and
//! [`tactics_core::BattleState`] construction and never appears in battle
//! state by itself.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    Battle, ConfigLoader, ContentFactory, LoadResult, MapLoader, Scenario, ScenarioLoader,
    ScenarioMap, UnitSpec,
};
