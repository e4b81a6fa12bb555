use super::RngOracle;
use crate::follow::{Direction, EdgeSet};
use crate::state::{AgentState, Destination, TileCoord, WorldPoint};

/// Result of one tick of walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveStep {
    /// Next horizontal position, or `None` when already within tolerance.
    /// The `z` component is left to the caller, which knows the walkway.
    pub next: Option<WorldPoint>,
    /// Manhattan distance still to cover before this step is applied.
    pub remaining: i32,
}

impl MoveStep {
    pub fn arrived(remaining: i32) -> Self {
        Self {
            next: None,
            remaining,
        }
    }

    pub fn moved(next: WorldPoint, remaining: i32) -> Self {
        Self {
            next: Some(next),
            remaining,
        }
    }
}

/// Per-tick movement primitives shared by every agent.
pub trait MotionOracle: Send + Sync {
    /// Resolves one tick of movement from `from` toward `destination`.
    fn move_toward(&self, from: WorldPoint, destination: Destination) -> MoveStep;

    /// Heads the agent onto the neighbouring tile in `direction`.
    fn move_one_tile(&self, agent: &mut AgentState, direction: Direction) -> bool;

    /// Heads the agent toward `next_tile` without checking connectivity.
    fn move_one_tile_best_effort(
        &self,
        agent: &mut AgentState,
        next_tile: TileCoord,
        direction: Direction,
    );

    /// Picks any open edge and walks that way.
    fn wander(&self, agent: &mut AgentState, edges: EdgeSet, rng: &mut dyn RngOracle);

    /// Recovery used when the agent is not standing on a walkway at all.
    fn surface_fallback(&self, agent: &mut AgentState);
}
