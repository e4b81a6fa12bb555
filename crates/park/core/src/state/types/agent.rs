use bitflags::bitflags;

use super::{Destination, EntityId, EntityRef, WorldPoint};
use crate::behavior::Reaction;
use crate::follow::Direction;

/// Staff specialisation. Only security officers take part in arrests.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StaffRole {
    #[default]
    Handyman,
    Mechanic,
    Security,
    Entertainer,
}

/// Closed set of agent kinds. Algorithms never branch on this directly;
/// they ask for [`Capabilities`] once and test flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    #[default]
    Guest,
    Staff(StaffRole),
}

bitflags! {
    /// Behavioral capabilities derived from an [`AgentKind`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Walk through banner-restricted edges.
        const BYPASS_BANNERS  = 1 << 0;
        /// Play cosmetic reactions and broadcast crowd events.
        const CROWD_REACTIONS = 1 << 1;
        /// Default state is patrolling rather than walking.
        const PATROLS         = 1 << 2;
        /// Can arrest and escort guests out of the park.
        const ARRESTS         = 1 << 3;
        /// Short fixed countdowns instead of randomised guest ones.
        const FIXED_COUNTDOWNS = 1 << 4;
    }
}

impl AgentKind {
    pub fn capabilities(self) -> Capabilities {
        match self {
            AgentKind::Guest => Capabilities::CROWD_REACTIONS,
            AgentKind::Staff(role) => {
                let mut caps = Capabilities::BYPASS_BANNERS
                    | Capabilities::PATROLS
                    | Capabilities::FIXED_COUNTDOWNS;
                if role == StaffRole::Security {
                    caps |= Capabilities::ARRESTS;
                }
                caps
            }
        }
    }

    pub fn is_security(self) -> bool {
        self.capabilities().contains(Capabilities::ARRESTS)
    }

    /// State the agent returns to when a behavior ends.
    pub fn default_behavior(self) -> BehaviorState {
        if self.capabilities().contains(Capabilities::PATROLS) {
            BehaviorState::Patrolling
        } else {
            BehaviorState::Walking
        }
    }
}

/// Per-agent behavior state machine.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BehaviorState {
    #[default]
    Walking,
    Patrolling,
    WitnessingEvent,
    FollowingEntertainer,
    SecurityChasing,
    EscortedBySecurity,
    SecurityEscortingOut,
}

impl BehaviorState {
    pub fn is_following(self) -> bool {
        !matches!(self, BehaviorState::Walking | BehaviorState::Patrolling)
    }
}

/// How the agent is currently closing in on its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PursuitMode {
    /// Straight-line chase; the destination optimizer is active.
    #[default]
    Direct,
    /// Movement driven by a planner hint; the optimizer is bypassed.
    Assisted,
}

/// Follow bookkeeping carried by every agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FollowState {
    pub target: Option<EntityRef>,
    pub mode: PursuitMode,
    /// Remaining interest in a witnessed event.
    pub event_countdown: u8,
    /// Time left following an entertainer, or re-entry cooldown when idle.
    pub entertainer_countdown: u8,
    /// Ticks down to the escort-out decision after an arrest.
    pub arrest_countdown: u8,
    /// Affinity for entertainers; decays each time a new one is followed.
    pub entertainer_interest: u8,
}

/// Mutable state of a guest or staff member.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub id: EntityId,
    pub kind: AgentKind,
    pub behavior: BehaviorState,
    pub position: WorldPoint,
    pub destination: Destination,
    pub facing: Direction,
    pub follow: FollowState,
    /// Follower reservation slot used when this agent is being followed.
    /// Advisory only: any follower may overwrite it.
    pub favourite: Option<EntityRef>,
    /// Cosmetic reaction currently playing, `None` when at rest.
    pub reaction: Option<Reaction>,
    pub reaction_frame: u8,
    pub happiness_target: u8,
    pub leaving_park: bool,
}

impl AgentState {
    pub fn new(id: EntityId, kind: AgentKind, position: WorldPoint) -> Self {
        Self {
            id,
            kind,
            behavior: kind.default_behavior(),
            position,
            destination: Destination::new(position.x, position.y, 0),
            facing: Direction::default(),
            follow: FollowState::default(),
            favourite: None,
            reaction: None,
            reaction_frame: 0,
            happiness_target: 128,
            leaving_park: false,
        }
    }

    pub fn with_facing(mut self, facing: Direction) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Starts `reaction` from its first frame.
    pub fn play(&mut self, reaction: Reaction) {
        self.reaction = Some(reaction);
        self.reaction_frame = 0;
    }

    /// Advances the current reaction by one frame, returning to rest after
    /// the last one.
    pub fn advance_reaction(&mut self) {
        let Some(reaction) = self.reaction else {
            return;
        };
        self.reaction_frame = self.reaction_frame.saturating_add(1);
        if self.reaction_frame >= reaction.frames() {
            self.reaction = None;
            self.reaction_frame = 0;
        }
    }

    pub fn is_at_rest(&self) -> bool {
        self.reaction.is_none()
    }

    /// Clears the follow target and returns to the kind's default state.
    pub fn return_to_default(&mut self) {
        self.follow.target = None;
        self.behavior = self.kind.default_behavior();
    }

    /// Points the agent's destination at its own tile so the next movement
    /// decision starts from scratch.
    pub fn reset_pathfind_goal(&mut self) {
        let tile = self.position.tile();
        self.destination = Destination::tile_center(tile, 2);
    }
}
