//! Per-turn momentum pools that gate every action.
//!
//! The ledger never drives a pool negative: a spend that cannot be covered is
//! rejected whole. It does not end turns itself; [`SpendOutcome::Exhausted`]
//! tells the caller the pool ran dry so the scheduler can be asked once.
use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MomentumError {
    #[error("unit {0} has no momentum entry")]
    UnknownUnit(EntityId),

    #[error("unit {unit} needs {required} momentum but has {available}")]
    Insufficient {
        unit: EntityId,
        required: u32,
        available: u32,
    },

    #[error("unit {unit} cannot gain {requested} momentum: {gained} of {cap} already gained this turn")]
    GainCapReached {
        unit: EntityId,
        requested: u32,
        gained: u32,
        cap: u32,
    },
}

impl GameError for MomentumError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownUnit(_) => ErrorSeverity::Internal,
            Self::Insufficient { .. } | Self::GainCapReached { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "MOMENTUM_UNKNOWN_UNIT",
            Self::Insufficient { .. } => "MOMENTUM_INSUFFICIENT",
            Self::GainCapReached { .. } => "MOMENTUM_GAIN_CAP",
        }
    }
}

/// One unit's pool for the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MomentumEntry {
    pub current: u32,
    /// Upper bound on `gained` for this turn.
    pub cap: u32,
    /// Momentum received this turn, the turn grant included.
    pub gained: u32,
}

/// Result of a successful spend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpendOutcome {
    Spent { remaining: u32 },
    /// The pool is now empty; the acting unit's turn should end.
    Exhausted,
}

impl SpendOutcome {
    pub fn remaining(self) -> u32 {
        match self {
            SpendOutcome::Spent { remaining } => remaining,
            SpendOutcome::Exhausted => 0,
        }
    }

    pub fn is_exhausted(self) -> bool {
        matches!(self, SpendOutcome::Exhausted)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MomentumLedger {
    entries: BTreeMap<EntityId, MomentumEntry>,
    base: u32,
    cap: u32,
}

impl MomentumLedger {
    pub fn new(base: u32, cap: u32) -> Self {
        Self {
            entries: BTreeMap::new(),
            base,
            cap,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.momentum_base, config.momentum_cap())
    }

    /// Opens an empty pool for `unit`; it fills on the unit's first turn grant.
    pub fn register(&mut self, unit: EntityId) {
        self.entries.entry(unit).or_default();
    }

    pub fn deregister(&mut self, unit: EntityId) -> Option<MomentumEntry> {
        self.entries.remove(&unit)
    }

    pub fn entry(&self, unit: EntityId) -> Option<&MomentumEntry> {
        self.entries.get(&unit)
    }

    /// Current momentum, zero for unknown units.
    pub fn current(&self, unit: EntityId) -> u32 {
        self.entry(unit).map_or(0, |entry| entry.current)
    }

    /// Resets the pool to the base amount and reopens the gain allowance.
    pub fn grant_turn(&mut self, unit: EntityId) -> MomentumEntry {
        let entry = self.entries.entry(unit).or_default();
        *entry = MomentumEntry {
            current: self.base,
            cap: self.cap,
            gained: self.base,
        };
        *entry
    }

    pub fn can_spend(&self, unit: EntityId, amount: u32) -> bool {
        self.entry(unit).is_some_and(|entry| entry.current >= amount)
    }

    /// Deducts `amount` if the pool covers it; otherwise leaves the pool untouched.
    pub fn spend(&mut self, unit: EntityId, amount: u32) -> Result<SpendOutcome, MomentumError> {
        let entry = self
            .entries
            .get_mut(&unit)
            .ok_or(MomentumError::UnknownUnit(unit))?;

        if entry.current < amount {
            return Err(MomentumError::Insufficient {
                unit,
                required: amount,
                available: entry.current,
            });
        }

        entry.current -= amount;
        if amount > 0 && entry.current == 0 {
            Ok(SpendOutcome::Exhausted)
        } else {
            Ok(SpendOutcome::Spent {
                remaining: entry.current,
            })
        }
    }

    /// Adds `amount` unless that would take this turn's gains past the cap.
    ///
    /// Returns the new current amount.
    pub fn gain(&mut self, unit: EntityId, amount: u32) -> Result<u32, MomentumError> {
        let entry = self
            .entries
            .get_mut(&unit)
            .ok_or(MomentumError::UnknownUnit(unit))?;

        if entry.gained.saturating_add(amount) > entry.cap {
            tracing::warn!(
                %unit,
                requested = amount,
                gained = entry.gained,
                cap = entry.cap,
                "momentum gain cap reached"
            );
            return Err(MomentumError::GainCapReached {
                unit,
                requested: amount,
                gained: entry.gained,
                cap: entry.cap,
            });
        }

        entry.gained += amount;
        entry.current += amount;
        Ok(entry.current)
    }
}

impl Default for MomentumLedger {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
