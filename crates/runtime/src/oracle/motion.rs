//! Tile-level walking primitives served through [`park_core::MotionOracle`].
use park_core::follow::connected_height;
use park_core::{
    AgentState, Capabilities, Destination, Direction, EdgeSet, MapOracle, MotionOracle, MoveStep,
    RngOracle, TileCoord, WorldPoint,
};

use super::GridMap;

/// Arrival radius used for single-tile moves.
const TILE_MOVE_TOLERANCE: i32 = 2;

/// Walks agents across a [`GridMap`] at a fixed speed.
///
/// Each tick covers up to `speed` world units along the axis with the larger
/// remaining distance; ties move along y.
#[derive(Clone, Copy, Debug)]
pub struct WalkingMotion<'a> {
    map: &'a GridMap,
    speed: i32,
}

impl<'a> WalkingMotion<'a> {
    pub const DEFAULT_SPEED: i32 = 2;

    pub fn new(map: &'a GridMap) -> Self {
        Self {
            map,
            speed: Self::DEFAULT_SPEED,
        }
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.max(1);
        self
    }

    fn head_to(agent: &mut AgentState, tile: TileCoord, direction: Direction) {
        agent.facing = direction;
        agent.destination = Destination::tile_center(tile, TILE_MOVE_TOLERANCE);
    }
}

impl MotionOracle for WalkingMotion<'_> {
    fn move_toward(&self, from: WorldPoint, destination: Destination) -> MoveStep {
        let dx = destination.x - from.x;
        let dy = destination.y - from.y;
        let remaining = dx.abs() + dy.abs();
        if dx.abs() <= destination.tolerance && dy.abs() <= destination.tolerance {
            return MoveStep::arrived(remaining);
        }

        let mut next = from;
        if dx.abs() > dy.abs() {
            next.x += dx.clamp(-self.speed, self.speed);
        } else {
            next.y += dy.clamp(-self.speed, self.speed);
        }
        MoveStep::moved(next, remaining)
    }

    fn move_one_tile(&self, agent: &mut AgentState, direction: Direction) -> bool {
        let tile = agent.position.tile();
        let Some(path) = self.map.path_under(agent.position) else {
            return false;
        };
        let bypass = agent.capabilities().contains(Capabilities::BYPASS_BANNERS);
        if connected_height(self.map, &path, tile, direction, bypass).is_none() {
            return false;
        }
        Self::head_to(agent, direction.step(tile), direction);
        true
    }

    fn move_one_tile_best_effort(
        &self,
        agent: &mut AgentState,
        next_tile: TileCoord,
        direction: Direction,
    ) {
        Self::head_to(agent, next_tile, direction);
    }

    fn wander(&self, agent: &mut AgentState, edges: EdgeSet, rng: &mut dyn RngOracle) {
        // Turning back is a last resort.
        let back = agent.facing.reverse();
        let mut open: Vec<Direction> = edges.directions().filter(|d| *d != back).collect();
        if open.is_empty() {
            open = edges.directions().collect();
        }
        if open.is_empty() {
            tracing::trace!(agent = %agent.id, "nowhere to wander");
            return;
        }

        let pick = open[rng.random_uint(open.len() as u32) as usize];
        let tile = agent.position.tile();
        Self::head_to(agent, pick.step(tile), pick);
    }

    fn surface_fallback(&self, agent: &mut AgentState) {
        let tile = agent.position.tile();
        let height = agent.position.height();
        let landing = Direction::ALL.into_iter().find(|direction| {
            self.map
                .path_at(direction.step(tile), height + 2)
                .is_some()
        });

        match landing {
            Some(direction) => {
                tracing::trace!(agent = %agent.id, %direction, "stepping back onto walkway");
                Self::head_to(agent, direction.step(tile), direction);
            }
            None => {
                tracing::debug!(agent = %agent.id, %tile, "no walkway nearby");
                agent.reset_pathfind_goal();
            }
        }
    }
}
