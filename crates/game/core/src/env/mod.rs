//! Read-only collaborators the engine consults while resolving a battle.
//!
//! The map oracle feeds grid construction, the RNG oracle resolves every dice
//! roll, and [`GameConfig`] carries the tuning constants. [`BattleEnv`]
//! bundles what the engine needs per call so callers can swap in scripted
//! implementations for tests or replays.
mod map;
mod rng;

pub use map::{MapDimensions, MapOracle, OpenMap};
pub use rng::{PcgRng, RngOracle, ScriptedRng, compute_seed};

use crate::config::GameConfig;

/// Bundle of read-only collaborators handed to [`crate::engine::BattleEngine`].
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    rng: &'a dyn RngOracle,
    config: &'a GameConfig,
}

impl<'a> BattleEnv<'a> {
    pub fn new(rng: &'a dyn RngOracle, config: &'a GameConfig) -> Self {
        Self { rng, config }
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
