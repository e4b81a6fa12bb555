use super::{Direction, FollowError};

/// Per-call tuning for [`update_following`](super::update_following).
///
/// Distances are squared world units. Weights are percentages; 100 is the
/// neutral weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FollowInstruction {
    /// Closer than this to the target (or its destination) is crowding it.
    pub min_distance_sq: i64,
    /// Farther than this from the approach point is drifting away.
    pub max_distance_sq: i64,
    /// How far ahead of the target, along its facing, to aim.
    pub forward_offset: i32,
    pub crowd_weight: i64,
    pub gradient_weight: i64,
}

impl FollowInstruction {
    pub const fn new(min_distance: i64, max_distance: i64) -> Self {
        Self {
            min_distance_sq: min_distance * min_distance,
            max_distance_sq: max_distance * max_distance,
            forward_offset: 0,
            crowd_weight: 100,
            gradient_weight: 100,
        }
    }

    pub const fn forward(mut self, offset: i32) -> Self {
        self.forward_offset = offset;
        self
    }

    pub const fn crowd(mut self, weight: i64) -> Self {
        self.crowd_weight = weight;
        self
    }

    pub const fn gradient(mut self, weight: i64) -> Self {
        self.gradient_weight = weight;
        self
    }
}

impl Default for FollowInstruction {
    fn default() -> Self {
        Self::new(32, 32)
    }
}

/// What one optimizer call observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FollowOutcome {
    /// Direction from the agent toward the raw target position.
    pub facing: Direction,
    /// Squared distance to the raw target position at entry.
    pub distance_sq: i64,
    /// The agent reached its destination this tick.
    pub comfortable: bool,
    /// Set when the behavior must end; carries the cause.
    pub lost: Option<FollowError>,
}

impl FollowOutcome {
    pub fn lost(error: FollowError) -> Self {
        Self {
            lost: Some(error),
            ..Self::default()
        }
    }

    pub fn target_lost(&self) -> bool {
        self.lost.is_some()
    }
}
