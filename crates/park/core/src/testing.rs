//! In-crate oracle doubles shared by unit tests.
use std::collections::HashMap;
use std::sync::Mutex;

use crate::behavior::Reaction;
use crate::env::{
    BroadcastKind, EventSink, MapOracle, MotionOracle, MoveStep, PathPlanner, PathTile, RngOracle,
    Sound,
};
use crate::follow::{Direction, EdgeSet};
use crate::state::{AgentState, Destination, EntityId, TileCoord, WorldPoint};

#[derive(Default)]
pub struct TestMap {
    tiles: HashMap<TileCoord, PathTile>,
    pub exits: Vec<WorldPoint>,
}

impl TestMap {
    /// Fully connected flat grid covering the given tile ranges.
    pub fn open(xs: std::ops::Range<i32>, ys: std::ops::Range<i32>) -> Self {
        let mut map = Self::default();
        for x in xs {
            for y in ys.clone() {
                map.insert(TileCoord::new(x, y), PathTile::flat(EdgeSet::all(), 0));
            }
        }
        map
    }

    pub fn insert(&mut self, tile: TileCoord, path: PathTile) {
        self.tiles.insert(tile, path);
    }
}

impl MapOracle for TestMap {
    fn path_at(&self, tile: TileCoord, height: i32) -> Option<PathTile> {
        self.tiles
            .get(&tile)
            .copied()
            .filter(|path| path.base_height <= height)
    }

    fn nearest_exit(&self, from: WorldPoint) -> Option<WorldPoint> {
        self.exits
            .iter()
            .copied()
            .min_by_key(|exit| exit.distance_sq(from))
    }
}

/// Walks `speed` units per axis per tick.
pub struct TestMotion {
    pub speed: i32,
}

impl Default for TestMotion {
    fn default() -> Self {
        Self { speed: 1 }
    }
}

impl MotionOracle for TestMotion {
    fn move_toward(&self, from: WorldPoint, destination: Destination) -> MoveStep {
        let dx = destination.x - from.x;
        let dy = destination.y - from.y;
        let remaining = dx.abs() + dy.abs();
        if dx.abs() <= destination.tolerance && dy.abs() <= destination.tolerance {
            return MoveStep::arrived(remaining);
        }
        let next = WorldPoint::new(
            from.x + dx.clamp(-self.speed, self.speed),
            from.y + dy.clamp(-self.speed, self.speed),
            from.z,
        );
        MoveStep::moved(next, remaining)
    }

    fn move_one_tile(&self, agent: &mut AgentState, direction: Direction) -> bool {
        let next = direction.step(agent.position.tile());
        self.move_one_tile_best_effort(agent, next, direction);
        true
    }

    fn move_one_tile_best_effort(
        &self,
        agent: &mut AgentState,
        next_tile: TileCoord,
        direction: Direction,
    ) {
        agent.facing = direction;
        agent.destination = Destination::tile_center(next_tile, 2);
    }

    fn wander(&self, agent: &mut AgentState, edges: EdgeSet, rng: &mut dyn RngOracle) {
        let open: Vec<Direction> = edges.directions().collect();
        if open.is_empty() {
            return;
        }
        let pick = open[rng.random_uint(open.len() as u32) as usize];
        self.move_one_tile(agent, pick);
    }

    fn surface_fallback(&self, agent: &mut AgentState) {
        agent.reset_pathfind_goal();
    }
}

/// Planner answering every question with the same direction.
pub struct FixedPlanner(pub Option<Direction>);

impl PathPlanner for FixedPlanner {
    fn find_path_hint(&self, _: WorldPoint, _: WorldPoint, _: u32) -> Option<Direction> {
        self.0
    }

    fn choose_direction(&self, _: TileCoord, _: i32, _: WorldPoint) -> Option<Direction> {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    Broadcast(BroadcastKind, EntityId),
    Reaction(EntityId, Reaction),
    Sound(Sound),
}

#[derive(Default)]
pub struct RecordingEvents {
    pub log: Mutex<Vec<Recorded>>,
}

impl RecordingEvents {
    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }
}

impl EventSink for RecordingEvents {
    fn broadcast(&self, kind: BroadcastKind, origin: EntityId) {
        self.log.lock().unwrap().push(Recorded::Broadcast(kind, origin));
    }

    fn reaction_started(&self, agent: EntityId, reaction: Reaction) {
        self.log.lock().unwrap().push(Recorded::Reaction(agent, reaction));
    }

    fn play_sound(&self, sound: Sound, _at: WorldPoint) {
        self.log.lock().unwrap().push(Recorded::Sound(sound));
    }
}
