//! Damage rolls.

use crate::env::RngOracle;

/// Inclusive range a hit can deal: `[1, die - 1]` plus the modifier, never negative.
///
/// A die with fewer than two faces always rolls 1.
pub fn damage_bounds(die: u32, modifier: i32) -> (u32, u32) {
    let top = die.saturating_sub(1).max(1);
    (apply_modifier(1, modifier), apply_modifier(top, modifier))
}

/// Rolls damage for a hit.
pub fn roll_damage(rng: &dyn RngOracle, seed: u64, die: u32, modifier: i32) -> u32 {
    let top = die.saturating_sub(1).max(1);
    apply_modifier(rng.range(seed, 1, top), modifier)
}

fn apply_modifier(face: u32, modifier: i32) -> u32 {
    (face as i64 + i64::from(modifier)).clamp(0, i64::from(u32::MAX)) as u32
}
