//! Battle worker that owns the authoritative [`tactics_core::BattleState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], forwards them to
//! [`tactics_core::BattleEngine`], drives enemy turns after a pacing delay and
//! publishes every engine event on the [`EventBus`].

use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use tactics_core::{
    BattleEngine, BattleEnv, BattleEvent, BattleState, CombatEvent, CommandMode, GameConfig,
    GameError, InputOutcome, PcgRng, Position,
};

use crate::api::{BattleSnapshot, Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::log::CombatLog;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Roll initiative and dispatch the first turn.
    Start { reply: oneshot::Sender<Result<()>> },
    PrimarySelect {
        position: Position,
        reply: oneshot::Sender<Result<InputOutcome>>,
    },
    SecondarySelect { reply: oneshot::Sender<()> },
    SelectMode {
        mode: CommandMode,
        reply: oneshot::Sender<Result<()>>,
    },
    EndTurn { reply: oneshot::Sender<Result<()>> },
    /// The presentation of the last action has completed.
    ActionFinished { reply: oneshot::Sender<()> },
    /// Throw the battle away and start over from the initial setup.
    Restart { reply: oneshot::Sender<Result<()>> },
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    /// Query the current battle state (read-only).
    QueryState { reply: oneshot::Sender<BattleState> },
    CombatLog { reply: oneshot::Sender<Vec<String>> },
}

/// Wall-clock delay inserted before each enemy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiPacing {
    pub min: Duration,
    pub max: Duration,
}

impl AiPacing {
    pub const IMMEDIATE: AiPacing = AiPacing {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for AiPacing {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_millis(1500),
        }
    }
}

/// Worker behaviour switches taken from the runtime configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    pub pacing: AiPacing,
    /// Acknowledge every animation immediately instead of waiting for the client.
    pub auto_complete_actions: bool,
    pub log_capacity: usize,
}

/// Background task that processes battle commands.
pub struct BattleWorker {
    initial: BattleState,
    state: BattleState,
    config: GameConfig,
    rng: PcgRng,
    options: WorkerOptions,
    log: CombatLog,
    ai_deadline: Option<Instant>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl BattleWorker {
    /// Creates a new battle worker.
    pub fn new(
        state: BattleState,
        config: GameConfig,
        options: WorkerOptions,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            initial: state.clone(),
            state,
            config,
            rng: PcgRng,
            options,
            log: CombatLog::with_capacity(options.log_capacity),
            ai_deadline: None,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            let deadline = self.ai_deadline;
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.drive_ai();
                }
            }
        }
        debug!(target: "runtime::worker", "battle worker stopped");
    }

    fn engine(&mut self) -> BattleEngine<'_> {
        BattleEngine::new(&mut self.state, BattleEnv::new(&self.rng, &self.config))
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                let result = self.engine().start_combat().map_err(RuntimeError::from);
                self.finish("start", reply, result);
            }
            Command::PrimarySelect { position, reply } => {
                let result = self
                    .engine()
                    .primary_select(position)
                    .map_err(RuntimeError::from);
                self.finish("primary_select", reply, result);
            }
            Command::SecondarySelect { reply } => {
                self.engine().secondary_select();
                self.flush();
                let _ = reply.send(());
            }
            Command::SelectMode { mode, reply } => {
                let result = self.engine().select_mode(mode).map_err(RuntimeError::from);
                self.finish("select_mode", reply, result);
            }
            Command::EndTurn { reply } => {
                let result = self
                    .engine()
                    .end_current_turn()
                    .map_err(RuntimeError::from);
                self.finish("end_turn", reply, result);
            }
            Command::ActionFinished { reply } => {
                self.engine().action_finished();
                self.flush();
                let _ = reply.send(());
            }
            Command::Restart { reply } => {
                let result = self.restart();
                self.finish("restart", reply, result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(BattleSnapshot::capture(&self.state));
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::CombatLog { reply } => {
                let _ = reply.send(self.log.entries().map(str::to_owned).collect());
            }
        }
    }

    /// Publishes what the command produced, then replies.
    fn finish<T>(&mut self, command: &'static str, reply: oneshot::Sender<Result<T>>, result: Result<T>) {
        if let Err(error) = &result {
            log_rejection(command, error);
        }
        self.flush();
        let _ = reply.send(result);
    }

    fn restart(&mut self) -> Result<()> {
        self.state = self.initial.clone();
        self.log.clear();
        self.ai_deadline = None;
        info!(target: "runtime::worker", "battle restarted");
        self.engine().start_combat()?;
        Ok(())
    }

    fn drive_ai(&mut self) {
        self.ai_deadline = None;
        let step = self.engine().drive_ai();
        debug!(target: "runtime::worker", ?step, "ai step");
        self.flush();
    }

    /// Publishes pending engine events and schedules the next enemy decision.
    ///
    /// With `auto_complete_actions` every started animation is acknowledged
    /// at once, which may release further events.
    fn flush(&mut self) {
        loop {
            for event in self.state.drain_events() {
                self.publish(event);
            }
            if self.options.auto_complete_actions && self.state.is_animating() {
                self.engine().action_finished();
                continue;
            }
            break;
        }
        self.schedule_ai();
    }

    fn publish(&mut self, event: BattleEvent) {
        if let BattleEvent::Combat(combat) = &event {
            let line = self.log.record(combat);
            if let CombatEvent::BattleEnded { winner } = combat {
                info!(target: "runtime::worker", ?winner, "battle ended");
            }
            self.event_bus.publish(Event::from(event));
            self.event_bus.publish(Event::Log(line));
        } else {
            self.event_bus.publish(Event::from(event));
        }
    }

    fn schedule_ai(&mut self) {
        if !self.state.ai.is_ready() {
            self.ai_deadline = None;
            return;
        }
        if self.ai_deadline.is_none() {
            let delay = self.options.pacing.sample();
            debug!(
                target: "runtime::worker",
                unit = ?self.state.ai.unit(),
                delay_ms = delay.as_millis() as u64,
                "enemy decision scheduled"
            );
            self.ai_deadline = Some(Instant::now() + delay);
        }
    }
}

fn log_rejection(command: &'static str, error: &RuntimeError) {
    match error {
        RuntimeError::Command(inner) => debug!(
            target: "runtime::worker",
            command,
            code = inner.error_code(),
            error = %inner,
            "command rejected"
        ),
        RuntimeError::Turn(inner) => debug!(
            target: "runtime::worker",
            command,
            code = inner.error_code(),
            error = %inner,
            "turn request rejected"
        ),
        other => debug!(target: "runtime::worker", command, error = %other, "command failed"),
    }
}
