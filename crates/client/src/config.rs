//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tactics_runtime::{AiPacing, RuntimeConfig};

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Root of the content directory (maps, scenarios, config.toml).
    pub data_dir: PathBuf,
    pub scenario: String,
    /// Overrides the scenario seed.
    pub seed: Option<u64>,
    pub ai_delay_min: Duration,
    pub ai_delay_max: Duration,
    /// Headless play has no animations to wait for.
    pub auto_complete_actions: bool,
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let pacing = AiPacing::default();
        Self {
            data_dir: PathBuf::from("data"),
            scenario: "skirmish".to_string(),
            seed: None,
            ai_delay_min: pacing.min,
            ai_delay_max: pacing.max,
            auto_complete_actions: true,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: `data`)
    /// - `TACTICS_SCENARIO` - Scenario name under `scenarios/` (default: `skirmish`)
    /// - `TACTICS_SEED` - Battle seed override
    /// - `TACTICS_AI_DELAY_MIN_MS` / `TACTICS_AI_DELAY_MAX_MS` - Enemy pacing (default: 500 / 1500)
    /// - `TACTICS_AUTO_COMPLETE` - Finish animations immediately (default: true)
    /// - `TACTICS_LOG_DIR` - Directory for the log file (default: `logs`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("TACTICS_DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(scenario) = read_env::<String>("TACTICS_SCENARIO") {
            config.scenario = scenario;
        }
        config.seed = read_env::<u64>("TACTICS_SEED");
        if let Some(ms) = read_env::<u64>("TACTICS_AI_DELAY_MIN_MS") {
            config.ai_delay_min = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("TACTICS_AI_DELAY_MAX_MS") {
            config.ai_delay_max = Duration::from_millis(ms);
        }
        if let Some(auto) = read_env_bool("TACTICS_AUTO_COMPLETE") {
            config.auto_complete_actions = auto;
        }
        if let Some(dir) = read_env::<PathBuf>("TACTICS_LOG_DIR") {
            config.log_dir = dir;
        }

        config
    }

    /// Runtime settings derived from this configuration.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            seed: self.seed,
            ai_delay_min: self.ai_delay_min,
            ai_delay_max: self.ai_delay_max.max(self.ai_delay_min),
            auto_complete_actions: self.auto_complete_actions,
            ..RuntimeConfig::default()
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
