//! Topic-based event bus for runtime events.
//!
//! Agents publish crowd broadcasts and presentation cues through the bus while
//! the simulation publishes behavior transitions. Consumers subscribe only to
//! the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::BehaviorEvent;
