//! Plain data records that make up a battle.
mod common;
mod registry;
mod turn;
mod unit;

pub use common::{EntityId, Position, ResourceMeter};
pub use registry::{RegistryError, UnitRegistry};
pub use turn::{Rosters, TurnPhase, TurnState};
pub use unit::{Character, Team};
