//! Topic-based event bus for runtime events.
//!
//! The battle worker drains the engine outbox after every step and publishes
//! each record on its topic, so consumers subscribe only to what they render.

mod bus;

pub use bus::{Event, EventBus, Topic};
