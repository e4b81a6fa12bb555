use crate::behavior::Reaction;
use crate::state::{EntityId, WorldPoint};

/// Behavioral notifications other agents may react to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BroadcastKind {
    /// Something odd is happening here; bystanders may come and watch.
    GenericVisualOddity,
    /// A fan is making a scene around an entertainer.
    EntertainerSnare,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Sound {
    Laugh1,
    Laugh2,
    Laugh3,
}

impl Sound {
    pub const LAUGHS: [Sound; 3] = [Sound::Laugh1, Sound::Laugh2, Sound::Laugh3];
}

/// Fire-and-forget outlet for broadcasts and presentation side effects.
pub trait EventSink: Send + Sync {
    fn broadcast(&self, kind: BroadcastKind, origin: EntityId);

    /// A cosmetic reaction started playing; renderers restart the animation.
    fn reaction_started(&self, _agent: EntityId, _reaction: Reaction) {}

    fn play_sound(&self, _sound: Sound, _at: WorldPoint) {}
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEvents;

impl EventSink for NullEvents {
    fn broadcast(&self, _: BroadcastKind, _: EntityId) {}
}
