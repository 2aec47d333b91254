//! Prompt loop that forwards typed commands to the runtime.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use tactics_core::{InputOutcome, PresentationEvent};
use tactics_runtime::{Event, RuntimeError, RuntimeHandle, Topic};

use crate::input::{self, HELP, Request};
use crate::render;

pub struct App {
    handle: RuntimeHandle,
}

impl App {
    pub fn new(handle: RuntimeHandle) -> Self {
        Self { handle }
    }

    pub async fn run(self) -> Result<()> {
        let printer = tokio::spawn(print_events(
            self.handle.subscribe(Topic::Log),
            self.handle.subscribe(Topic::Presentation),
        ));

        self.handle.start_battle().await?;
        println!("{HELP}");
        self.show_status().await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let request = match input::parse(&line) {
                Ok(request) => request,
                Err(message) => {
                    println!("! {message}");
                    continue;
                }
            };
            if request == Request::Quit {
                break;
            }
            match self.dispatch(request).await {
                Ok(()) => {}
                Err(err) if err.is_rejection() => println!("! {err}"),
                Err(err) => return Err(err.into()),
            }
        }

        printer.abort();
        Ok(())
    }

    async fn dispatch(&self, request: Request) -> Result<(), RuntimeError> {
        match request {
            Request::Select(position) => match self.handle.primary_select(position).await? {
                InputOutcome::Selected(Some(unit)) => println!("selected unit {}", unit.0),
                InputOutcome::Selected(None) => println!("nothing there"),
                InputOutcome::Ignored => println!("no target there"),
                InputOutcome::Executed(outcome) => tracing::debug!(?outcome, "command executed"),
            },
            Request::Mode(mode) => self.handle.select_mode(mode).await?,
            Request::Cancel => self.handle.secondary_select().await?,
            Request::EndTurn => self.handle.end_turn().await?,
            Request::Done => self.handle.action_finished().await?,
            Request::Restart => self.handle.restart().await?,
            Request::Status => self.show_status().await?,
            Request::Log => {
                for line in self.handle.combat_log().await? {
                    println!("{line}");
                }
            }
            Request::Help => println!("{HELP}"),
            Request::Quit => {}
        }
        Ok(())
    }

    async fn show_status(&self) -> Result<(), RuntimeError> {
        let state = self.handle.query_state().await?;
        let snapshot = self.handle.snapshot().await?;
        print!("{}", render::map(&state));
        print!("{}", render::status(&snapshot));
        Ok(())
    }
}

async fn print_events(
    mut log_rx: broadcast::Receiver<Event>,
    mut presentation_rx: broadcast::Receiver<Event>,
) {
    loop {
        let event = tokio::select! {
            event = log_rx.recv() => event,
            event = presentation_rx.recv() => event,
        };
        match event {
            Ok(Event::Log(line)) => println!("{line}"),
            Ok(Event::Presentation(PresentationEvent::Highlight { kind, tiles })) => {
                let cells: Vec<String> = tiles.iter().map(|p| format!("({},{})", p.x, p.y)).collect();
                println!("{kind} range: {}", cells.join(" "));
            }
            Ok(Event::Presentation(PresentationEvent::StartMove { unit, path, .. })) => {
                if let Some(end) = path.last() {
                    println!("unit {} moves to ({}, {})", unit.0, end.x, end.y);
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
