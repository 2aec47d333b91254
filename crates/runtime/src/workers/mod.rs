//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns the battle state and is the only place the engine
//! runs; every other layer talks to it over channels.

mod battle;

pub use battle::{AiPacing, BattleWorker, Command, WorkerOptions};
