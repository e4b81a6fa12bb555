//! Topic-based event bus implementation.

use park_core::{BroadcastKind, EntityId, EventSink, Reaction, Sound, WorldPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use super::types::BehaviorEvent;
use crate::error::{Result, RuntimeError};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Broadcasts other agents may react to
    Crowd,
    /// Cosmetic reactions and sounds
    Presentation,
    /// Behavior transitions and inter-agent commands
    Behavior,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Crowd, Topic::Presentation, Topic::Behavior];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Broadcast {
        kind: BroadcastKind,
        origin: EntityId,
    },
    Reaction {
        agent: EntityId,
        reaction: Reaction,
    },
    Sound {
        sound: Sound,
        at: WorldPoint,
    },
    Behavior(BehaviorEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Broadcast { .. } => Topic::Crowd,
            Event::Reaction { .. } | Event::Sound { .. } => Topic::Presentation,
            Event::Behavior(_) => Topic::Behavior,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort and never blocks the
/// tick loop.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // Events are best-effort: skip rather than block under contention.
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic) {
                    if tx.send(event).is_err() {
                        tracing::trace!("No subscribers for topic {:?}", topic);
                    }
                }
            }
            Err(_) => {
                tracing::debug!("Failed to acquire event bus lock for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> Result<broadcast::Receiver<Event>> {
        let channels = self.channels.try_read().map_err(|_| RuntimeError::BusBusy)?;
        channels
            .get(&topic)
            .map(broadcast::Sender::subscribe)
            .ok_or(RuntimeError::TopicUnavailable(topic))
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Result<HashMap<Topic, broadcast::Receiver<Event>>> {
        topics
            .iter()
            .map(|&topic| Ok((topic, self.subscribe(topic)?)))
            .collect()
    }
}

impl EventSink for EventBus {
    fn broadcast(&self, kind: BroadcastKind, origin: EntityId) {
        self.publish(Event::Broadcast { kind, origin });
    }

    fn reaction_started(&self, agent: EntityId, reaction: Reaction) {
        self.publish(Event::Reaction { agent, reaction });
    }

    fn play_sound(&self, sound: Sound, at: WorldPoint) {
        self.publish(Event::Sound { sound, at });
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
