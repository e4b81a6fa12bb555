//! Deterministic target following for park agents.
//!
//! `park-core` holds the rules by which guests and staff chase a moving
//! target across the walkway network: the destination optimizer, the slide
//! feasibility check, reachability escalation and the behavior drivers that
//! sit on top of them. Everything the rules need from the outside world is
//! consumed through the oracle traits in [`env`]; tick and randomness are
//! passed explicitly through [`SimulationContext`]. All per-tick mutation
//! flows through [`engine::ParkEngine`].
pub mod behavior;
pub mod config;
pub mod context;
pub mod engine;
pub mod env;
pub mod error;
pub mod follow;
pub mod state;

#[cfg(test)]
mod testing;

pub use behavior::{
    BehaviorEffects, Reaction, TargetCommand, start_chasing, start_following_entertainer,
    start_witnessing, update_agent,
};
pub use config::FollowConfig;
pub use context::SimulationContext;
pub use engine::{ParkEngine, TickReport};
pub use env::{
    AgentView, BroadcastKind, EntityOracle, EntityView, Env, EventSink, MapOracle, MotionOracle,
    MoveStep, NoPathHint, OracleError, ParkEnv, PathPlanner, PathTile, PcgRng, RngOracle,
    ScriptedRng, Sound,
};
pub use error::{ErrorContext, ErrorSeverity, ParkError};
pub use follow::{
    Direction, EdgeSet, FollowError, FollowInstruction, FollowOutcome, SlideFailure, SlideQuery,
    slide_check, update_following,
};
pub use state::{
    AgentKind, AgentState, BehaviorState, Capabilities, Destination, EntitiesState, Entity,
    EntityError, EntityId, EntityRef, PursuitMode, Roster, StaffRole, Tick, TileCoord, WorldPoint,
};
