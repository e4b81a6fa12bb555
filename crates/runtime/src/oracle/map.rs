//! Static walkway layout served through [`park_core::MapOracle`].
use std::collections::HashMap;

use park_core::env::{MAX_PATH_HEIGHT, MIN_PATH_HEIGHT};
use park_core::{EdgeSet, MapOracle, OracleError, PathTile, TileCoord, WorldPoint};

/// MapOracle implementation backed by a tile hash map.
///
/// A tile may carry several walkway segments stacked at different base
/// heights; they are kept sorted from lowest to highest.
#[derive(Clone, Debug, Default)]
pub struct GridMap {
    tiles: HashMap<TileCoord, Vec<PathTile>>,
    exits: Vec<WorldPoint>,
}

impl GridMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully connected flat plaza covering the inclusive tile box
    /// `[min, max]` at `height`. Edges on the border stay closed.
    pub fn open_plaza(min: TileCoord, max: TileCoord, height: i32) -> Result<Self, OracleError> {
        let mut map = Self::new();
        map.fill_plaza(min, max, height)?;
        Ok(map)
    }

    /// Adds a flat plaza to an existing map. See [`GridMap::open_plaza`].
    pub fn fill_plaza(
        &mut self,
        min: TileCoord,
        max: TileCoord,
        height: i32,
    ) -> Result<(), OracleError> {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                let mut edges = EdgeSet::empty();
                if x > min.x {
                    edges |= EdgeSet::WEST;
                }
                if x < max.x {
                    edges |= EdgeSet::EAST;
                }
                if y > min.y {
                    edges |= EdgeSet::NORTH;
                }
                if y < max.y {
                    edges |= EdgeSet::SOUTH;
                }
                self.insert(TileCoord::new(x, y), PathTile::flat(edges, height))?;
            }
        }
        Ok(())
    }

    /// Places a walkway segment. Fails on a second segment at the same tile
    /// and base height, or on a height outside the supported range.
    pub fn insert(&mut self, tile: TileCoord, path: PathTile) -> Result<(), OracleError> {
        let height = path.base_height;
        if !(MIN_PATH_HEIGHT..=MAX_PATH_HEIGHT).contains(&height) {
            return Err(OracleError::HeightOutOfRange { tile, height });
        }
        let stack = self.tiles.entry(tile).or_default();
        match stack.binary_search_by_key(&height, |segment| segment.base_height) {
            Ok(_) => Err(OracleError::DuplicateTile { tile, height }),
            Err(slot) => {
                stack.insert(slot, path);
                Ok(())
            }
        }
    }

    /// Registers a park exit. Exits must stand on a walkway.
    pub fn add_exit(&mut self, exit: WorldPoint) -> Result<(), OracleError> {
        if self.path_under(exit).is_none() {
            return Err(OracleError::ExitOffPath(exit.tile()));
        }
        self.exits.push(exit);
        Ok(())
    }

    pub fn exits(&self) -> &[WorldPoint] {
        &self.exits
    }

    /// Number of walkway segments across all tiles.
    pub fn segment_count(&self) -> usize {
        self.tiles.values().map(Vec::len).sum()
    }
}

impl MapOracle for GridMap {
    fn path_at(&self, tile: TileCoord, height: i32) -> Option<PathTile> {
        self.tiles
            .get(&tile)?
            .iter()
            .rev()
            .find(|segment| segment.base_height <= height)
            .copied()
    }

    fn nearest_exit(&self, from: WorldPoint) -> Option<WorldPoint> {
        // Ties resolve to the exit registered first.
        self.exits
            .iter()
            .copied()
            .min_by_key(|exit| exit.distance_sq(from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaza_border_edges_are_closed() {
        let map = GridMap::open_plaza(TileCoord::new(0, 0), TileCoord::new(2, 2), 1).unwrap();
        assert_eq!(map.segment_count(), 9);

        let corner = map.path_at(TileCoord::new(0, 0), 1).unwrap();
        assert_eq!(corner.edges, EdgeSet::EAST | EdgeSet::SOUTH);
        let middle = map.path_at(TileCoord::new(1, 1), 1).unwrap();
        assert_eq!(middle.edges, EdgeSet::all());
    }

    #[test]
    fn path_at_returns_highest_segment_not_above_height() {
        let mut map = GridMap::new();
        let tile = TileCoord::new(3, 3);
        map.insert(tile, PathTile::flat(EdgeSet::all(), 8)).unwrap();
        map.insert(tile, PathTile::flat(EdgeSet::WEST, 2)).unwrap();

        assert_eq!(map.path_at(tile, 1), None);
        assert_eq!(map.path_at(tile, 5).map(|p| p.base_height), Some(2));
        assert_eq!(map.path_at(tile, 9).map(|p| p.base_height), Some(8));
    }

    #[test]
    fn rejects_duplicate_and_out_of_range_segments() {
        let mut map = GridMap::new();
        let tile = TileCoord::new(0, 0);
        map.insert(tile, PathTile::flat(EdgeSet::all(), 4)).unwrap();

        assert_eq!(
            map.insert(tile, PathTile::flat(EdgeSet::WEST, 4)),
            Err(OracleError::DuplicateTile { tile, height: 4 })
        );
        assert_eq!(
            map.insert(tile, PathTile::flat(EdgeSet::all(), 300)),
            Err(OracleError::HeightOutOfRange { tile, height: 300 })
        );
    }

    #[test]
    fn exits_must_be_on_a_walkway() {
        let mut map = GridMap::open_plaza(TileCoord::new(0, 0), TileCoord::new(1, 0), 0).unwrap();
        assert_eq!(
            map.add_exit(WorldPoint::new(200, 16, 0)),
            Err(OracleError::ExitOffPath(TileCoord::new(6, 0)))
        );

        map.add_exit(WorldPoint::new(48, 16, 0)).unwrap();
        map.add_exit(WorldPoint::new(16, 16, 0)).unwrap();
        assert_eq!(
            map.nearest_exit(WorldPoint::new(0, 0, 0)),
            Some(WorldPoint::new(16, 16, 0))
        );
    }
}
