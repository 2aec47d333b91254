//! Records the engine emits for the outside world.
//!
//! Events accumulate in [`crate::state::BattleState::outbox`] in the order
//! they happened and are drained by whoever drives the engine.
use std::fmt;

use strum::Display;

use crate::grid::WorldPoint;
use crate::state::{Character, EntityId, Position, Team, TurnPhase};

/// Identity of a unit as it appears in log records.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTag {
    pub id: EntityId,
    pub name: String,
}

impl From<&Character> for UnitTag {
    fn from(unit: &Character) -> Self {
        Self {
            id: unit.id,
            name: unit.name.clone(),
        }
    }
}

impl fmt::Display for UnitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    Combat(CombatEvent),
    Turn(TurnEvent),
    Presentation(PresentationEvent),
}

impl From<CombatEvent> for BattleEvent {
    fn from(event: CombatEvent) -> Self {
        BattleEvent::Combat(event)
    }
}

impl From<TurnEvent> for BattleEvent {
    fn from(event: TurnEvent) -> Self {
        BattleEvent::Turn(event)
    }
}

impl From<PresentationEvent> for BattleEvent {
    fn from(event: PresentationEvent) -> Self {
        BattleEvent::Presentation(event)
    }
}

/// Combat-log records.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    BattleStarted {
        units: usize,
    },
    RoundStarted {
        round: u32,
    },
    TurnStarted {
        unit: UnitTag,
        team: Team,
    },
    AttackHit {
        attacker: UnitTag,
        target: UnitTag,
        roll: u32,
        total: i32,
        damage: u32,
        critical: bool,
        remaining_hp: u32,
    },
    AttackMissed {
        attacker: UnitTag,
        target: UnitTag,
        roll: u32,
        total: i32,
    },
    Healed {
        healer: UnitTag,
        target: UnitTag,
        amount: u32,
    },
    StatusApplied {
        caster: UnitTag,
        target: UnitTag,
        status: String,
    },
    UnitDied {
        unit: UnitTag,
        team: Team,
    },
    BattleEnded {
        winner: Option<Team>,
    },
}

/// Scheduler and resource bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnEvent {
    PhaseChanged {
        from: TurnPhase,
        to: TurnPhase,
    },
    InitiativeRolled {
        order: Vec<(EntityId, i32)>,
    },
    TurnEnded {
        unit: EntityId,
    },
    MomentumChanged {
        unit: EntityId,
        current: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HighlightKind {
    Movement,
    Attack,
}

/// Fire-and-forget cues for rendering and animation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PresentationEvent {
    Highlight {
        kind: HighlightKind,
        tiles: Vec<Position>,
    },
    HideHighlights,
    StartMove {
        unit: EntityId,
        path: Vec<Position>,
        waypoints: Vec<WorldPoint>,
    },
    StopMove {
        unit: EntityId,
    },
    PlayAttack {
        unit: EntityId,
        target: Position,
    },
}
