//! Human-readable combat log.
//!
//! [`CombatLog`] renders [`CombatEvent`]s into the lines shown to the player
//! and keeps the most recent ones. Older lines are dropped first.
use std::collections::VecDeque;

use tactics_core::CombatEvent;

pub const DEFAULT_LOG_CAPACITY: usize = 100;

#[derive(Clone, Debug)]
pub struct CombatLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    /// Appends the line for `event` and returns it.
    pub fn record(&mut self, event: &CombatEvent) -> String {
        let line = render(event);
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.clone());
        line
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for CombatLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a single combat event as a log line.
pub fn render(event: &CombatEvent) -> String {
    match event {
        CombatEvent::BattleStarted { .. } => "=== BATTLE STARTED ===".to_string(),
        CombatEvent::RoundStarted { round } => format!("=== Starting Round {round} START ==="),
        CombatEvent::TurnStarted { unit, .. } => format!("--- [{unit}]'s turn begins ---"),
        CombatEvent::AttackHit {
            attacker,
            target,
            roll,
            damage,
            critical: true,
            ..
        } => format!(
            "[{attacker}] critically hit [{target}] with a roll of [{roll}]! [{target}] took [{damage}] damage!"
        ),
        CombatEvent::AttackHit {
            attacker,
            target,
            total,
            damage,
            ..
        } => format!(
            "[{attacker}] attacked [{target}] and rolled [{total}]. [{target}] took [{damage}] damage."
        ),
        CombatEvent::AttackMissed {
            attacker,
            target,
            total,
            ..
        } => format!("[{attacker}] attacked [{target}] and rolled [{total}]. Attack missed!"),
        CombatEvent::Healed {
            healer,
            target,
            amount,
        } => format!("[{healer}] healed [{target}] for [{amount}] HP."),
        CombatEvent::StatusApplied {
            caster,
            target,
            status,
        } => format!("[{caster}] applied [{status}] to [{target}]."),
        CombatEvent::UnitDied { unit, .. } => format!("[{unit}] has been defeated!"),
        CombatEvent::BattleEnded { winner } => {
            let winner = winner.map_or_else(|| "NOBODY".to_string(), |team| team.to_string());
            format!("=== BATTLE ENDED - [{winner}] VICTORIOUS ===")
        }
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{EntityId, Team, UnitTag};

    use super::*;

    fn tag(id: u32, name: &str) -> UnitTag {
        UnitTag {
            id: EntityId(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn attack_lines_match_log_format() {
        let hit = CombatEvent::AttackHit {
            attacker: tag(1, "Knight"),
            target: tag(2, "Goblin"),
            roll: 12,
            total: 16,
            damage: 5,
            critical: false,
            remaining_hp: 3,
        };
        assert_eq!(
            render(&hit),
            "[Knight] attacked [Goblin] and rolled [16]. [Goblin] took [5] damage."
        );

        let miss = CombatEvent::AttackMissed {
            attacker: tag(2, "Goblin"),
            target: tag(1, "Knight"),
            roll: 3,
            total: 5,
        };
        assert_eq!(render(&miss), "[Goblin] attacked [Knight] and rolled [5]. Attack missed!");
    }

    #[test]
    fn critical_line_reports_the_natural_roll() {
        let crit = CombatEvent::AttackHit {
            attacker: tag(1, "Knight"),
            target: tag(2, "Goblin"),
            roll: 20,
            total: 24,
            damage: 6,
            critical: true,
            remaining_hp: 0,
        };
        assert_eq!(
            render(&crit),
            "[Knight] critically hit [Goblin] with a roll of [20]! [Goblin] took [6] damage!"
        );
    }

    #[test]
    fn bookkeeping_lines() {
        assert_eq!(
            render(&CombatEvent::RoundStarted { round: 2 }),
            "=== Starting Round 2 START ==="
        );
        assert_eq!(
            render(&CombatEvent::TurnStarted {
                unit: tag(1, "Knight"),
                team: Team::Player
            }),
            "--- [Knight]'s turn begins ---"
        );
        assert_eq!(
            render(&CombatEvent::BattleEnded {
                winner: Some(Team::Enemy)
            }),
            "=== BATTLE ENDED - [Enemy] VICTORIOUS ==="
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut log = CombatLog::with_capacity(3);
        for round in 1..=5 {
            log.record(&CombatEvent::RoundStarted { round });
        }
        assert_eq!(log.len(), 3);
        assert_eq!(
            log.entries().next(),
            Some("=== Starting Round 3 START ===")
        );
        assert_eq!(CombatLog::new().capacity, 100);
    }
}
