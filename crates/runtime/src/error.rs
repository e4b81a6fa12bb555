//! Unified error type surfaced by the runtime.
//!
//! Wraps scenario loading failures and the core's oracle and entity errors so
//! callers can bubble them up with `?`.
use park_core::{EntityError, ErrorSeverity, OracleError, ParkError};
use thiserror::Error;

use crate::events::Topic;
use crate::scenario::ScenarioError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error("event bus has no channel for topic {0:?}")]
    TopicUnavailable(Topic),

    #[error("event bus lock is contended")]
    BusBusy,
}

impl ParkError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Scenario(error) => error.severity(),
            RuntimeError::Oracle(error) => error.severity(),
            RuntimeError::Entity(error) => error.severity(),
            RuntimeError::TopicUnavailable(_) => ErrorSeverity::Internal,
            RuntimeError::BusBusy => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Scenario(error) => error.error_code(),
            RuntimeError::Oracle(error) => error.error_code(),
            RuntimeError::Entity(error) => error.error_code(),
            RuntimeError::TopicUnavailable(_) => "RUNTIME_TOPIC_UNAVAILABLE",
            RuntimeError::BusBusy => "RUNTIME_BUS_BUSY",
        }
    }
}
