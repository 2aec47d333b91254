//! To-hit checks.

/// Attack total: the natural die roll plus the attacker's modifier.
pub fn attack_total(roll: u32, attack_mod: i32) -> i32 {
    (roll as i32).saturating_add(attack_mod)
}

/// An attack lands when its total meets or beats the target's armor.
pub fn check_hit(total: i32, armor_class: i32) -> bool {
    total >= armor_class
}
