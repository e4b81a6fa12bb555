//! Walkway route planning served through [`park_core::PathPlanner`].
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use park_core::follow::connected_height;
use park_core::{Direction, MapOracle, PathPlanner, TileCoord, WorldPoint};

use super::GridMap;

/// Cost of one tile step.
const STEP_COST: i32 = 10;

/// A walkway segment: tile plus base height.
type Node = (TileCoord, i32);

#[derive(Clone, Eq, PartialEq)]
struct PathNode {
    node: Node,
    f_cost: i32,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the heap pops the cheapest node first.
        other.f_cost.cmp(&self.f_cost)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over the walkway graph of a [`GridMap`].
#[derive(Clone, Copy, Debug)]
pub struct GridPlanner<'a> {
    map: &'a GridMap,
    bypass_banners: bool,
    max_nodes: usize,
}

impl<'a> GridPlanner<'a> {
    pub const DEFAULT_MAX_NODES: usize = 4096;

    pub fn new(map: &'a GridMap) -> Self {
        Self {
            map,
            bypass_banners: false,
            max_nodes: Self::DEFAULT_MAX_NODES,
        }
    }

    /// Plans through banner-restricted edges, as staff walk.
    pub fn bypass_banners(mut self, bypass: bool) -> Self {
        self.bypass_banners = bypass;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes.max(1);
        self
    }

    /// Shortest walkway route from the segment at `start` to any segment on
    /// `goal`, as the sequence of directions to take.
    pub fn route(&self, start: TileCoord, height: i32, goal: TileCoord) -> Option<Vec<Direction>> {
        let origin = self.map.path_at(start, height)?;
        let start: Node = (start, origin.base_height);

        let heuristic =
            |tile: TileCoord| ((tile.x - goal.x).abs() + (tile.y - goal.y).abs()) * STEP_COST;

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<Node, (Node, Direction)> = HashMap::new();
        let mut g_score: HashMap<Node, i32> = HashMap::new();

        g_score.insert(start, 0);
        open_set.push(PathNode {
            node: start,
            f_cost: heuristic(start.0),
        });

        let mut expanded = 0;
        while let Some(current) = open_set.pop() {
            let (tile, base) = current.node;
            if tile == goal {
                let mut steps = Vec::new();
                let mut cursor = current.node;
                while let Some(&(previous, direction)) = came_from.get(&cursor) {
                    steps.push(direction);
                    cursor = previous;
                }
                steps.reverse();
                return Some(steps);
            }

            expanded += 1;
            if expanded > self.max_nodes {
                tracing::debug!(start = %start.0, %goal, expanded, "route search budget exhausted");
                return None;
            }

            let Some(path) = self.map.path_at(tile, base) else {
                continue;
            };
            let current_g = g_score.get(&current.node).copied().unwrap_or(i32::MAX);

            for direction in Direction::ALL {
                let Some(next_height) =
                    connected_height(self.map, &path, tile, direction, self.bypass_banners)
                else {
                    continue;
                };
                let neighbor: Node = (direction.step(tile), next_height);
                let tentative_g = current_g.saturating_add(STEP_COST);

                if tentative_g < g_score.get(&neighbor).copied().unwrap_or(i32::MAX) {
                    came_from.insert(neighbor, (current.node, direction));
                    g_score.insert(neighbor, tentative_g);
                    open_set.push(PathNode {
                        node: neighbor,
                        f_cost: tentative_g + heuristic(neighbor.0),
                    });
                }
            }
        }

        None
    }
}

impl PathPlanner for GridPlanner<'_> {
    /// Long-range hints are not implemented; callers treat the target as out
    /// of reach.
    fn find_path_hint(&self, _: WorldPoint, _: WorldPoint, _: u32) -> Option<Direction> {
        None
    }

    fn choose_direction(
        &self,
        tile: TileCoord,
        height: i32,
        goal: WorldPoint,
    ) -> Option<Direction> {
        self.route(tile, height, goal.tile())?.first().copied()
    }
}
