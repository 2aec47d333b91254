//! Runtime orchestration for tactical battles.
//!
//! This crate wires the deterministic [`tactics_core`] engine into an async
//! service. A single worker task owns the authoritative battle state; clients
//! drive it through a cloneable [`RuntimeHandle`] and watch it through the
//! topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`log`] renders combat events into log lines
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod log;
pub mod runtime;

mod workers;

pub use api::{BattleSnapshot, Result, RuntimeError, RuntimeHandle, UnitSnapshot};
pub use events::{Event, EventBus, Topic};
pub use log::CombatLog;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::AiPacing;
