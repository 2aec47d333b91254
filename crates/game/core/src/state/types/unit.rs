use strum::{Display, EnumIter};

use super::common::{EntityId, ResourceMeter};

/// Side a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Combat actor taking part in a battle.
///
/// The unit's grid position is not stored here: the [`crate::grid::Grid`]
/// occupant record is the single source of truth and is looked up by id.
/// Momentum lives in the [`crate::momentum::MomentumLedger`] under the same id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub team: Team,
    pub hp: ResourceMeter,
    pub armor_class: i32,
    pub attack_mod: i32,
    /// Exclusive upper bound of the damage roll; a hit deals `1..damage_die` plus the modifier.
    pub damage_die: u32,
    pub damage_mod: i32,
    pub initiative_mod: i32,
    /// Rolled once when combat starts.
    pub initiative: Option<i32>,
    pub movement_range: u32,
    pub attack_range: u32,
    pub statuses: Vec<String>,
}

impl Character {
    pub const DEFAULT_MAX_HP: u32 = 100;
    pub const DEFAULT_ARMOR_CLASS: i32 = 14;
    pub const DEFAULT_ATTACK_MOD: i32 = 4;
    pub const DEFAULT_DAMAGE_DIE: u32 = 8;
    pub const DEFAULT_DAMAGE_MOD: i32 = 2;
    pub const DEFAULT_INITIATIVE_MOD: i32 = 2;
    pub const DEFAULT_MOVEMENT_RANGE: u32 = 5;
    pub const DEFAULT_ATTACK_RANGE: u32 = 5;

    pub fn new(id: EntityId, name: impl Into<String>, team: Team) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            hp: ResourceMeter::full(Self::DEFAULT_MAX_HP),
            armor_class: Self::DEFAULT_ARMOR_CLASS,
            attack_mod: Self::DEFAULT_ATTACK_MOD,
            damage_die: Self::DEFAULT_DAMAGE_DIE,
            damage_mod: Self::DEFAULT_DAMAGE_MOD,
            initiative_mod: Self::DEFAULT_INITIATIVE_MOD,
            initiative: None,
            movement_range: Self::DEFAULT_MOVEMENT_RANGE,
            attack_range: Self::DEFAULT_ATTACK_RANGE,
            statuses: Vec::new(),
        }
    }

    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.hp = ResourceMeter::full(max_hp);
        self
    }

    pub fn with_hp(mut self, current: u32) -> Self {
        self.hp.current = current.min(self.hp.maximum);
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_attack_mod(mut self, attack_mod: i32) -> Self {
        self.attack_mod = attack_mod;
        self
    }

    pub fn with_damage(mut self, die: u32, modifier: i32) -> Self {
        self.damage_die = die;
        self.damage_mod = modifier;
        self
    }

    pub fn with_initiative_mod(mut self, initiative_mod: i32) -> Self {
        self.initiative_mod = initiative_mod;
        self
    }

    pub fn with_movement_range(mut self, movement_range: u32) -> Self {
        self.movement_range = movement_range;
        self
    }

    pub fn with_attack_range(mut self, attack_range: u32) -> Self {
        self.attack_range = attack_range;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_depleted()
    }

    /// Health below `percent` of maximum.
    pub fn is_below_health_percent(&self, percent: u32) -> bool {
        u64::from(self.hp.current) * 100 < u64::from(self.hp.maximum) * u64::from(percent)
    }

    /// Preferred standoff distance: half the attack range, rounded up.
    pub fn optimal_range(&self) -> u32 {
        self.attack_range.div_ceil(2)
    }

    /// Applies damage and returns true if this blow killed the unit.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.hp.drain(amount);
        was_alive && !self.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_range_rounds_up() {
        let unit = Character::new(EntityId(1), "Archer", Team::Enemy).with_attack_range(5);
        assert_eq!(unit.optimal_range(), 3);
        let melee = unit.with_attack_range(1);
        assert_eq!(melee.optimal_range(), 1);
    }

    #[test]
    fn take_damage_reports_kill_once() {
        let mut unit = Character::new(EntityId(1), "Grunt", Team::Enemy).with_max_hp(10);
        assert!(!unit.take_damage(4));
        assert!(unit.take_damage(9));
        assert!(!unit.take_damage(3));
        assert_eq!(unit.hp.current, 0);
    }

    #[test]
    fn low_health_threshold() {
        let unit = Character::new(EntityId(1), "Grunt", Team::Enemy)
            .with_max_hp(100)
            .with_hp(19);
        assert!(unit.is_below_health_percent(20));
        assert!(!unit.clone().with_hp(20).is_below_health_percent(20));
    }
}
