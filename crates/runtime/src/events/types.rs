//! Event payloads published by the simulation loop.

use park_core::{EntityId, TargetCommand, Tick};
use serde::{Deserialize, Serialize};

/// Behavior transitions observed while stepping the park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorEvent {
    /// A scenario start took effect.
    Started {
        agent: EntityId,
        behavior: park_core::BehaviorState,
        tick: Tick,
    },

    /// An agent left its following state and returned to its default.
    Terminated { agent: EntityId, tick: Tick },

    /// A command one agent issued to another was applied.
    CommandApplied { command: TargetCommand, tick: Tick },

    /// Commands dropped because their receiver vanished mid-tick.
    CommandsRejected { count: usize, tick: Tick },
}

impl BehaviorEvent {
    pub fn tick(&self) -> Tick {
        match self {
            BehaviorEvent::Started { tick, .. }
            | BehaviorEvent::Terminated { tick, .. }
            | BehaviorEvent::CommandApplied { tick, .. }
            | BehaviorEvent::CommandsRejected { tick, .. } => *tick,
        }
    }
}
