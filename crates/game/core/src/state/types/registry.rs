use std::collections::BTreeMap;

use super::common::EntityId;
use super::unit::{Character, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unit {0} is already registered")]
    AlreadyRegistered(EntityId),
}

/// Registry of every unit taking part in the battle.
///
/// Units are registered when they are created and deregistered when they
/// die; iteration follows registration order, which is also the tie-break for
/// equal initiative rolls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitRegistry {
    units: BTreeMap<EntityId, Character>,
    order: Vec<EntityId>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, unit: Character) -> Result<(), RegistryError> {
        if self.units.contains_key(&unit.id) {
            return Err(RegistryError::AlreadyRegistered(unit.id));
        }
        self.order.push(unit.id);
        self.units.insert(unit.id, unit);
        Ok(())
    }

    pub fn deregister(&mut self, id: EntityId) -> Option<Character> {
        let removed = self.units.remove(&id)?;
        self.order.retain(|&registered| registered != id);
        Some(removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&Character> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.units.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(Character::is_alive)
    }

    pub fn team_of(&self, id: EntityId) -> Option<Team> {
        self.get(id).map(|unit| unit.team)
    }

    /// Units in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.order.iter().filter_map(|id| self.units.get(id))
    }

    pub fn living(&self) -> impl Iterator<Item = &Character> {
        self.iter().filter(|unit| unit.is_alive())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
