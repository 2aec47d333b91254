//! Dice-driven attack resolution.
//!
//! Pure functions over [`Character`](crate::state::Character) records; the
//! caller decides when to roll and applies the outcome.

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{damage_bounds, roll_damage};
pub use hit::{attack_total, check_hit};
pub use result::{AttackOutcome, AttackResult, resolve_attack};

/// Tags the independent rolls that can happen for a single action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RollContext {
    Initiative = 0,
    ToHit = 1,
    Damage = 2,
    Jitter = 3,
}

impl RollContext {
    pub const fn tag(self) -> u32 {
        self as u32
    }
}
