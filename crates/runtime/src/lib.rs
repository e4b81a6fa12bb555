//! Runtime for driving the park follow core headless.
//!
//! This crate supplies concrete implementations of the oracle traits
//! `park-core` consumes, loads scenarios from RON, and runs the tick loop.
//!
//! Modules are organized by responsibility:
//! - [`oracle`] provides the walkway grid, walking motion and route planner
//! - [`events`] provides the topic-based event bus agents publish through
//! - [`scenario`] loads park layouts and agent placements
//! - [`simulation`] owns park state and advances it tick by tick
pub mod error;
pub mod events;
pub mod oracle;
pub mod scenario;
pub mod simulation;

pub use error::{Result, RuntimeError};
pub use events::{BehaviorEvent, Event, EventBus, Topic};
pub use oracle::{GridMap, GridPlanner, WalkingMotion};
pub use scenario::{
    AgentPlacement, InitialBehavior, PlazaPlacement, Scenario, ScenarioError, ScheduledStart,
    StartKind, TilePlacement,
};
pub use simulation::{RunSummary, Simulation};
