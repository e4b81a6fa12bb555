use crate::follow::{Direction, EdgeSet};
use crate::state::{HEIGHT_STEP, TILE_SIZE, TileCoord, WorldPoint};

/// Read-only walkway layout.
pub trait MapOracle: Send + Sync {
    /// Path segment on `tile` whose base height is at or below `height`
    /// (in height steps). Returns the highest such segment.
    fn path_at(&self, tile: TileCoord, height: i32) -> Option<PathTile>;

    /// Path segment under a world point.
    fn path_under(&self, point: WorldPoint) -> Option<PathTile> {
        self.path_at(point.tile(), point.height())
    }

    /// Park exit closest to `from`, if the park has any.
    fn nearest_exit(&self, _from: WorldPoint) -> Option<WorldPoint> {
        None
    }
}

/// Immutable descriptor of one walkway segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTile {
    /// Neighbours this segment connects to.
    pub edges: EdgeSet,
    /// Base height in height steps.
    pub base_height: i32,
    /// Direction the segment rises toward, if sloped.
    pub slope: Option<Direction>,
    /// Combined mask of every banner on the segment; edges outside it are
    /// closed to agents without [`BYPASS_BANNERS`](crate::state::Capabilities::BYPASS_BANNERS).
    pub banners: Option<EdgeSet>,
}

impl PathTile {
    pub const fn flat(edges: EdgeSet, base_height: i32) -> Self {
        Self {
            edges,
            base_height,
            slope: None,
            banners: None,
        }
    }

    pub const fn with_slope(mut self, slope: Direction) -> Self {
        self.slope = Some(slope);
        self
    }

    pub const fn with_banners(mut self, banners: EdgeSet) -> Self {
        self.banners = Some(banners);
        self
    }

    /// Edges usable by an agent, after banner gating unless bypassed.
    pub fn passable_edges(&self, bypass_banners: bool) -> EdgeSet {
        match self.banners {
            Some(mask) if !bypass_banners => self.edges & mask,
            _ => self.edges,
        }
    }

    /// Height in world units of the walking surface at `(x, y)`.
    ///
    /// Slopes rise by two height steps across the tile toward `slope`.
    pub fn height_at(&self, x: i32, y: i32) -> i32 {
        let base = self.base_height * HEIGHT_STEP;
        let Some(slope) = self.slope else {
            return base;
        };
        let local_x = x.rem_euclid(TILE_SIZE);
        let local_y = y.rem_euclid(TILE_SIZE);
        let last = TILE_SIZE - 1;
        let rise = match slope {
            Direction::East => local_x,
            Direction::West => last - local_x,
            Direction::South => local_y,
            Direction::North => last - local_y,
        };
        base + rise / 2
    }
}
