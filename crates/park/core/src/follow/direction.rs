//! Cardinal directions and per-tile edge sets.
//!
//! The ordinal and bit layout mirror the walkway data: West=0 (bit 0x1),
//! South=1 (0x2), East=2 (0x4), North=3 (0x8). The y axis grows southward.
use bitflags::bitflags;

use crate::state::{TILE_SIZE, TileCoord};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Direction {
    West = 0,
    South = 1,
    East = 2,
    #[default]
    North = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::South,
        Direction::East,
        Direction::North,
    ];

    /// Quantizes an offset vector to the direction that best points along it.
    ///
    /// Horizontal wins only when `|dx|` is strictly greater than `|dy|`; a
    /// zero vector points North.
    pub fn from_offset(dx: i32, dy: i32) -> Self {
        if dx.unsigned_abs() > dy.unsigned_abs() {
            if dx < 0 { Direction::West } else { Direction::East }
        } else if dy > 0 {
            Direction::South
        } else {
            Direction::North
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::North => (0, -1),
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Direction::West => Direction::East,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::North => Direction::South,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::West | Direction::East)
    }

    pub const fn edge(self) -> EdgeSet {
        match self {
            Direction::West => EdgeSet::WEST,
            Direction::South => EdgeSet::SOUTH,
            Direction::East => EdgeSet::EAST,
            Direction::North => EdgeSet::NORTH,
        }
    }

    pub fn step(self, tile: TileCoord) -> TileCoord {
        let (dx, dy) = self.delta();
        tile.offset(dx, dy)
    }

    /// World offset of `distance` units along this direction.
    pub fn scaled(self, distance: i32) -> (i32, i32) {
        let (dx, dy) = self.delta();
        (dx * distance, dy * distance)
    }

    /// One full tile along this direction, in world units.
    pub fn tile_offset(self) -> (i32, i32) {
        self.scaled(TILE_SIZE)
    }
}

bitflags! {
    /// Connectivity of a walkway tile toward its four neighbours.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EdgeSet: u8 {
        const WEST  = 1 << 0;
        const SOUTH = 1 << 1;
        const EAST  = 1 << 2;
        const NORTH = 1 << 3;
    }
}

impl EdgeSet {
    pub const fn open() -> Self {
        Self::all()
    }

    pub fn allows(self, direction: Direction) -> bool {
        self.contains(direction.edge())
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.allows(*d))
    }
}
