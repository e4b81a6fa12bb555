//! Common error infrastructure for park-core.
//!
//! Domain-specific errors (e.g. [`FollowError`](crate::follow::FollowError))
//! live next to the code that produces them. None of them are fatal to the
//! tick loop: the worst outcome for an agent is to stop following.

use crate::state::{EntityRef, WorldPoint};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected outcome; the agent falls back to its default behavior.
    ///
    /// Examples: target lost, target unreachable by sliding
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: stale entity reference, wrong entity kind
    Validation,

    /// Unexpected inconsistency that should be investigated.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub agent: Option<EntityRef>,
    pub position: Option<WorldPoint>,
    pub tick: u64,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(tick: u64) -> Self {
        Self {
            agent: None,
            position: None,
            tick,
        }
    }

    #[must_use]
    pub const fn with_agent(mut self, agent: EntityRef) -> Self {
        self.agent = Some(agent);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: WorldPoint) -> Self {
        self.position = Some(position);
        self
    }
}

/// Common trait for all park-core errors.
pub trait ParkError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
