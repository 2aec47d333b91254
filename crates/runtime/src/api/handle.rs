//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! forwarding player input to the battle worker or streaming events from
//! specific topics.
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{
    BattleState, CommandMode, EntityId, InputOutcome, Position, Team, TurnPhase,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// One unit as shown to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: EntityId,
    pub name: String,
    pub team: Team,
    pub hp: u32,
    pub max_hp: u32,
    pub position: Option<Position>,
}

/// Compact read-only view of a battle for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub phase: TurnPhase,
    pub round: u32,
    pub current: Option<EntityId>,
    /// Momentum left to the unit holding the turn.
    pub momentum: u32,
    pub selected: Option<EntityId>,
    pub mode: CommandMode,
    pub winner: Option<Team>,
    pub units: Vec<UnitSnapshot>,
}

impl BattleSnapshot {
    pub fn capture(state: &BattleState) -> Self {
        let units = state
            .units
            .iter()
            .map(|unit| UnitSnapshot {
                id: unit.id,
                name: unit.name.clone(),
                team: unit.team,
                hp: unit.hp.current,
                max_hp: unit.hp.maximum,
                position: state.position_of(unit.id),
            })
            .collect();

        Self {
            phase: state.turn.phase,
            round: state.turn.round,
            current: state.turn.current,
            momentum: state
                .turn
                .current
                .map_or(0, |unit| state.momentum.current(unit)),
            selected: state.input.selected,
            mode: state.input.mode,
            winner: state.turn.winner,
            units,
        }
    }

    pub fn unit(&self, id: EntityId) -> Option<&UnitSnapshot> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::CombatEnd
    }
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Roll initiative and hand the first turn out.
    pub async fn start_battle(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await?
    }

    /// Primary click on a grid cell.
    pub async fn primary_select(&self, position: Position) -> Result<InputOutcome> {
        self.request(|reply| Command::PrimarySelect { position, reply })
            .await?
    }

    /// Secondary click: deselect and clear highlights.
    pub async fn secondary_select(&self) -> Result<()> {
        self.request(|reply| Command::SecondarySelect { reply })
            .await
    }

    /// Choose what the next primary click does for the selected unit.
    pub async fn select_mode(&self, mode: CommandMode) -> Result<()> {
        self.request(|reply| Command::SelectMode { mode, reply })
            .await?
    }

    /// End the acting unit's turn; deferred while an action is animating.
    pub async fn end_turn(&self) -> Result<()> {
        self.request(|reply| Command::EndTurn { reply }).await?
    }

    /// Signal that the presentation of the last action has finished.
    pub async fn action_finished(&self) -> Result<()> {
        self.request(|reply| Command::ActionFinished { reply })
            .await
    }

    /// Rebuild the battle from its initial setup and start it again.
    pub async fn restart(&self) -> Result<()> {
        self.request(|reply| Command::Restart { reply }).await?
    }

    /// Query a compact view of the battle
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Query the current battle state (read-only clone)
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Recent combat-log lines, oldest first.
    pub async fn combat_log(&self) -> Result<Vec<String>> {
        self.request(|reply| Command::CombatLog { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Attacks, deaths, turn/round/battle boundaries
    /// - `Topic::Turn` - Phase changes and momentum bookkeeping
    /// - `Topic::Presentation` - Highlights and animation triggers
    /// - `Topic::Log` - Rendered combat-log lines
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tactics_runtime::Topic;
    ///
    /// let mut log_rx = handle.subscribe(Topic::Log);
    /// while let Ok(event) = log_rx.recv().await {
    ///     // Print the line
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
