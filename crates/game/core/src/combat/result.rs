//! Full attack resolution: to-hit roll, then damage on a hit.

use crate::env::RngOracle;
use crate::state::Character;

use super::RollContext;
use super::damage::roll_damage;
use super::hit::{attack_total, check_hit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit { damage: u32 },
}

/// Rolled values of one attack, before damage is applied to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    /// Natural die roll.
    pub roll: u32,
    /// Roll plus attack modifier.
    pub total: i32,
    /// Natural maximum on the check die.
    pub critical: bool,
    pub outcome: AttackOutcome,
}

impl AttackResult {
    pub fn damage(&self) -> Option<u32> {
        match self.outcome {
            AttackOutcome::Hit { damage } => Some(damage),
            AttackOutcome::Miss => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, AttackOutcome::Hit { .. })
    }
}

/// Rolls `check_die` to hit, then the attacker's damage die on a hit.
///
/// `seed_for` supplies an independent seed per roll context.
pub fn resolve_attack(
    attacker: &Character,
    target: &Character,
    rng: &dyn RngOracle,
    check_die: u32,
    seed_for: impl Fn(RollContext) -> u64,
) -> AttackResult {
    let roll = rng.roll_die(seed_for(RollContext::ToHit), check_die);
    let total = attack_total(roll, attacker.attack_mod);
    let critical = check_die > 0 && roll == check_die;

    let outcome = if check_hit(total, target.armor_class) {
        let damage = roll_damage(
            rng,
            seed_for(RollContext::Damage),
            attacker.damage_die,
            attacker.damage_mod,
        );
        AttackOutcome::Hit { damage }
    } else {
        AttackOutcome::Miss
    };

    AttackResult {
        roll,
        total,
        critical,
        outcome,
    }
}
