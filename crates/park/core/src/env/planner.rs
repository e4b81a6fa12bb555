use crate::follow::Direction;
use crate::state::{TileCoord, WorldPoint};

/// Global pathfinding consulted when straight-line pursuit is not enough.
pub trait PathPlanner: Send + Sync {
    /// First step of a route from `from` to `to`, searching at most
    /// `max_depth` junctions. `None` is the expected common answer.
    fn find_path_hint(&self, from: WorldPoint, to: WorldPoint, max_depth: u32)
    -> Option<Direction>;

    /// First step of the regular guest pathfinder from `tile` toward `goal`.
    fn choose_direction(&self, tile: TileCoord, height: i32, goal: WorldPoint)
    -> Option<Direction>;
}

/// Planner that never finds anything.
///
/// Smarter hints are not implemented yet; callers must treat `None` as the
/// target being out of reach.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPathHint;

impl PathPlanner for NoPathHint {
    fn find_path_hint(&self, _: WorldPoint, _: WorldPoint, _: u32) -> Option<Direction> {
        None
    }

    fn choose_direction(&self, _: TileCoord, _: i32, _: WorldPoint) -> Option<Direction> {
        None
    }
}
