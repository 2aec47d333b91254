//! Deterministic rules core for grid-based tactical battles.
//!
//! `tactics-core` defines the battlefield grid, pathfinding, momentum, turn
//! scheduling, command execution and the enemy decision loop, and exposes
//! pure APIs shared by the runtime and offline tools. All state mutation
//! flows through [`engine::BattleEngine`], and supporting crates depend on
//! the types re-exported here.
pub mod ai;
pub mod combat;
pub mod command;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod grid;
pub mod momentum;
pub mod pathfinding;
pub mod state;

pub use ai::{AiAction, AiController, AiState, AiStep};
pub use combat::{AttackOutcome, AttackResult, RollContext};
pub use command::{Command, CommandError, CommandExecutor, CommandMode, CommandOutcome};
pub use config::GameConfig;
pub use engine::{BattleEngine, InputOutcome, TurnError};
pub use env::{
    BattleEnv, MapDimensions, MapOracle, OpenMap, PcgRng, RngOracle, ScriptedRng, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use event::{
    BattleEvent, CombatEvent, HighlightKind, PresentationEvent, TurnEvent, UnitTag,
};
pub use grid::{CardinalDirection, CoverKind, CoverProp, Grid, GridError, WorldPoint};
pub use momentum::{MomentumError, MomentumLedger, SpendOutcome};
pub use pathfinding::{Path, PathPolicy, PathSettings, Pathfinder, ReachableSet, Unoccupied};
pub use state::{
    Animation, AnimationKind, BattleState, Character, EntityId, Position, ResourceMeter, SetupError,
    Team, TurnPhase, TurnState,
};
