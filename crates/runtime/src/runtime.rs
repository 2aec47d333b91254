//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tactics_content::Battle;
use tactics_core::{BattleState, GameConfig};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::log::DEFAULT_LOG_CAPACITY;
use crate::workers::{AiPacing, BattleWorker, Command, WorkerOptions};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Overrides the battle seed of the initial state when set.
    pub seed: Option<u64>,
    /// Shortest delay before an enemy decision.
    pub ai_delay_min: Duration,
    /// Longest delay before an enemy decision.
    pub ai_delay_max: Duration,
    /// Treat every animation as finished as soon as it starts (headless play).
    pub auto_complete_actions: bool,
    pub log_capacity: usize,
}

impl RuntimeConfig {
    fn worker_options(&self) -> WorkerOptions {
        WorkerOptions {
            pacing: AiPacing {
                min: self.ai_delay_min,
                max: self.ai_delay_max.max(self.ai_delay_min),
            },
            auto_complete_actions: self.auto_complete_actions,
            log_capacity: self.log_capacity,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let pacing = AiPacing::default();
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            seed: None,
            ai_delay_min: pacing.min,
            ai_delay_max: pacing.max,
            auto_complete_actions: false,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// Main runtime that orchestrates a battle
///
/// Design: Runtime owns the worker and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<BattleState>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the initial battle state; restarts return to it.
    pub fn initial_state(mut self, state: BattleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the initial state from loaded content and adopt its rules.
    pub fn battle(mut self, battle: &Battle) -> Result<Self> {
        let state = battle
            .build_state()
            .map_err(|err| RuntimeError::InitialState(err.into()))?;
        self.config.game_config = battle.config.clone();
        self.state = Some(state);
        Ok(self)
    }

    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Delay range before each enemy decision.
    pub fn ai_delay(mut self, min: Duration, max: Duration) -> Self {
        self.config.ai_delay_min = min;
        self.config.ai_delay_max = max;
        self
    }

    pub fn auto_complete_actions(mut self, enable: bool) -> Self {
        self.config.auto_complete_actions = enable;
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let mut initial_state = self.state.ok_or(RuntimeError::MissingBattle)?;
        if let Some(seed) = self.config.seed {
            initial_state.seed = seed;
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = BattleWorker::new(
            initial_state,
            self.config.game_config.clone(),
            self.config.worker_options(),
            command_rx,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
