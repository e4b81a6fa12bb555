use super::Direction;
use crate::error::{ErrorContext, ErrorSeverity, ParkError};
use crate::state::{EntityRef, TileCoord, WorldPoint};

/// Why a slide check gave up. All reasons mean "not reachable".
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlideFailure {
    #[error("no walkway at tile {tile}")]
    NoPath { tile: TileCoord },

    #[error("arrived above or below the target (height {height}, target {target_height})")]
    WrongLevel { height: i32, target_height: i32 },

    #[error("no connected edge toward the target from tile {tile}")]
    Blocked { tile: TileCoord },

    #[error("step {direction} reverses the previous step")]
    Oscillation { direction: Direction },

    #[error("gave up after {iterations} iterations")]
    TooLong { iterations: u32 },
}

/// Failures surfaced by the follow core. None of them are fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FollowError {
    /// The target reference is empty, stale, or names a non-agent.
    #[error("follow target {target:?} is missing or not pursuable")]
    TargetInvalid {
        target: Option<EntityRef>,
        context: ErrorContext,
    },

    /// No walkway where one was needed.
    #[error("no walkway under {position:?}")]
    TileUnavailable {
        position: WorldPoint,
        context: ErrorContext,
    },

    /// Naive pursuit cannot reach the target.
    #[error("target at {target:?} unreachable by sliding: {reason}")]
    Unreachable {
        target: WorldPoint,
        reason: SlideFailure,
        context: ErrorContext,
    },

    /// Unreachable and no planner hint was available.
    #[error("target {target} lost")]
    TargetLost {
        target: EntityRef,
        context: ErrorContext,
    },
}

impl ParkError for FollowError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FollowError::TargetInvalid { .. } => ErrorSeverity::Validation,
            FollowError::TileUnavailable { .. }
            | FollowError::Unreachable { .. }
            | FollowError::TargetLost { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            FollowError::TargetInvalid { context, .. }
            | FollowError::TileUnavailable { context, .. }
            | FollowError::Unreachable { context, .. }
            | FollowError::TargetLost { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            FollowError::TargetInvalid { .. } => "FOLLOW_TARGET_INVALID",
            FollowError::TileUnavailable { .. } => "FOLLOW_TILE_UNAVAILABLE",
            FollowError::Unreachable { .. } => "FOLLOW_UNREACHABLE",
            FollowError::TargetLost { .. } => "FOLLOW_TARGET_LOST",
        }
    }
}
