mod agent;
mod common;
mod entities;

pub use agent::{
    AgentKind, AgentState, BehaviorState, Capabilities, FollowState, PursuitMode, StaffRole,
};
pub use common::{
    Destination, EntityId, EntityRef, HEIGHT_STEP, TILE_SIZE, Tick, TileCoord, WorldPoint,
    distance_sq,
};
pub use entities::{EntitiesState, Entity, EntityError, LitterState};
