//! Slide feasibility check.
//!
//! Simulates an agent that always steps toward its target, tile by tile,
//! and reports whether that naive walk arrives. This covers open plazas,
//! wide paths and simple walls without running real pathfinding. The walk
//! is bounded and fails as soon as it turns back on itself.
use super::{Direction, SlideFailure};
use crate::config::FollowConfig;
use crate::env::{MapOracle, PathTile};
use crate::state::{Capabilities, HEIGHT_STEP, TILE_SIZE, TileCoord, WorldPoint};

/// Inputs of one slide check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideQuery {
    pub start: WorldPoint,
    pub target: WorldPoint,
    /// Allowed horizontal miss, in world units at tile granularity.
    /// Zero means the walk must end on the target's tile.
    pub max_xy_distance: i32,
    /// Allowed vertical miss in height steps.
    pub max_z_distance: i32,
    pub bypass_banners: bool,
}

impl SlideQuery {
    /// Query used by pursuit: reach the target's own tile, tolerating the
    /// height difference of a slope.
    pub fn to_target(start: WorldPoint, target: WorldPoint, capabilities: Capabilities) -> Self {
        Self {
            start,
            target,
            max_xy_distance: 0,
            max_z_distance: 2,
            bypass_banners: capabilities.contains(Capabilities::BYPASS_BANNERS),
        }
    }
}

/// True when the naive walk described by `query` reaches its target.
pub fn slide_check<M>(map: &M, query: &SlideQuery, config: &FollowConfig) -> bool
where
    M: MapOracle + ?Sized,
{
    slide(map, query, config).is_ok()
}

/// Runs the naive walk, returning the number of tile steps taken or the
/// reason it failed.
pub fn slide<M>(map: &M, query: &SlideQuery, config: &FollowConfig) -> Result<u32, SlideFailure>
where
    M: MapOracle + ?Sized,
{
    let target = query.target;
    let target_tile = target.tile();
    let mut current = query.start;
    let mut last: Option<Direction> = None;
    let mut iterations = 0u32;

    loop {
        let tile = current.tile();
        if (tile.x - target_tile.x).abs() * TILE_SIZE <= query.max_xy_distance
            && (tile.y - target_tile.y).abs() * TILE_SIZE <= query.max_xy_distance
        {
            if (current.height() - target.height()).abs() > query.max_z_distance {
                return Err(SlideFailure::WrongLevel {
                    height: current.height(),
                    target_height: target.height(),
                });
            }
            return Ok(iterations);
        }

        let path = map
            .path_at(tile, current.height())
            .ok_or(SlideFailure::NoPath { tile })?;

        let dx = target.x - current.x;
        let dy = target.y - current.y;
        let primary = Direction::from_offset(dx, dy);

        let (direction, next_height) =
            match connected_height(map, &path, tile, primary, query.bypass_banners) {
                Some(height) => (primary, height),
                None => {
                    // Retry once along the other axis; never the same axis twice.
                    let alternate = if primary.is_horizontal() {
                        if dy == 0 {
                            return Err(SlideFailure::Blocked { tile });
                        }
                        if dy > 0 { Direction::South } else { Direction::North }
                    } else {
                        if dx == 0 {
                            return Err(SlideFailure::Blocked { tile });
                        }
                        if dx < 0 { Direction::West } else { Direction::East }
                    };
                    let height =
                        connected_height(map, &path, tile, alternate, query.bypass_banners)
                            .ok_or(SlideFailure::Blocked { tile })?;
                    (alternate, height)
                }
            };

        iterations += 1;
        if iterations == config.slide_warn_iterations + 1 {
            tracing::warn!(
                iterations,
                ?current,
                ?target,
                %direction,
                ?last,
                "very long slide check"
            );
        }
        if iterations > config.slide_max_iterations {
            return Err(SlideFailure::TooLong { iterations });
        }

        if last == Some(direction.reverse()) {
            return Err(SlideFailure::Oscillation { direction });
        }
        last = Some(direction);

        // Land just past the shared edge of the next tile.
        let (origin_x, origin_y) = tile.origin();
        match direction {
            Direction::West => current.x = origin_x - 6,
            Direction::South => current.y = origin_y + TILE_SIZE + 6,
            Direction::East => current.x = origin_x + TILE_SIZE + 6,
            Direction::North => current.y = origin_y - 6,
        }
        current.z = next_height * HEIGHT_STEP;
    }
}

/// Base height of the walkway that `path` connects to in `direction`, if
/// the edge is open (after banner gating) and a segment exists there.
pub fn connected_height<M>(
    map: &M,
    path: &PathTile,
    tile: TileCoord,
    direction: Direction,
    bypass_banners: bool,
) -> Option<i32>
where
    M: MapOracle + ?Sized,
{
    if !path.passable_edges(bypass_banners).allows(direction) {
        return None;
    }
    // Slopes can lead up to two steps higher.
    map.path_at(direction.step(tile), path.base_height + 2)
        .map(|next| next.base_height)
}
