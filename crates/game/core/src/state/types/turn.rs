use strum::Display;

use super::common::EntityId;
use super::unit::Team;

/// Coarse state tag of the turn scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    #[default]
    Setup,
    PlayerTurn,
    EnemyTurn,
    /// Between turns: the previous unit's turn has ended and the next one is not yet granted.
    Awaiting,
    CheckingWin,
    CombatEnd,
}

impl TurnPhase {
    /// True while some unit holds the turn.
    pub fn is_unit_turn(self) -> bool {
        matches!(self, TurnPhase::PlayerTurn | TurnPhase::EnemyTurn)
    }
}

/// Per-team rosters of living units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rosters {
    pub player: Vec<EntityId>,
    pub enemy: Vec<EntityId>,
}

impl Rosters {
    pub fn get(&self, team: Team) -> &[EntityId] {
        match team {
            Team::Player => &self.player,
            Team::Enemy => &self.enemy,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut Vec<EntityId> {
        match team {
            Team::Player => &mut self.player,
            Team::Enemy => &mut self.enemy,
        }
    }

    /// Removes the unit from whichever roster holds it.
    pub fn remove(&mut self, unit: EntityId) -> bool {
        let before = self.player.len() + self.enemy.len();
        self.player.retain(|&id| id != unit);
        self.enemy.retain(|&id| id != unit);
        before != self.player.len() + self.enemy.len()
    }

    pub fn any_empty(&self) -> bool {
        self.player.is_empty() || self.enemy.is_empty()
    }

    /// The only team with members left, or `None` when both or neither remain.
    pub fn survivor(&self) -> Option<Team> {
        match (self.player.is_empty(), self.enemy.is_empty()) {
            (false, true) => Some(Team::Player),
            (true, false) => Some(Team::Enemy),
            _ => None,
        }
    }
}

/// Initiative order and round bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub phase: TurnPhase,
    pub round: u32,
    /// Index into `order` of the unit holding the turn.
    pub index: usize,
    /// Initiative order, computed once at battle start and pruned of the dead between turns.
    pub order: Vec<EntityId>,
    pub current: Option<EntityId>,
    pub rosters: Rosters,
    /// Set while an end of turn has been requested but not yet carried out.
    pub ending: bool,
    pub winner: Option<Team>,
}

impl TurnState {
    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::CombatEnd
    }

    pub fn is_current(&self, unit: EntityId) -> bool {
        self.current == Some(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survivor_requires_exactly_one_team() {
        let mut rosters = Rosters {
            player: vec![EntityId(1)],
            enemy: vec![EntityId(2)],
        };
        assert_eq!(rosters.survivor(), None);

        rosters.remove(EntityId(2));
        assert_eq!(rosters.survivor(), Some(Team::Player));
        assert!(rosters.any_empty());

        rosters.remove(EntityId(1));
        assert_eq!(rosters.survivor(), None);
    }
}
