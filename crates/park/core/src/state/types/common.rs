use std::fmt;

/// Side length of a walkway tile in world units.
pub const TILE_SIZE: i32 = 32;

/// World units per height step (`base_height` of a path is in height steps).
pub const HEIGHT_STEP: i32 = 8;

/// Slot index of an entity in [`EntitiesState`](super::EntitiesState).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Weak reference to an entity: slot id plus the generation it was issued for.
///
/// A reference whose generation no longer matches the slot resolves to nothing.
/// It never keeps the referenced entity alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    pub id: EntityId,
    pub generation: u32,
}

impl EntityRef {
    pub const fn new(id: EntityId, generation: u32) -> Self {
        Self { id, generation }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.generation)
    }
}

/// Global simulation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// True on every `period`-th tick, offset by `stagger` so that entities
    /// sharing a cadence do not all fire on the same tick.
    #[inline]
    pub fn is_cadence(self, stagger: u32, period: u32) -> bool {
        period != 0 && (self.0.wrapping_add(u64::from(stagger))) % u64::from(period) == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Continuous position in world units. `z` is in world units as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPoint {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn tile(self) -> TileCoord {
        TileCoord::containing(self.x, self.y)
    }

    /// Height in height steps, the unit path tiles are stored in.
    pub fn height(self) -> i32 {
        self.z.div_euclid(HEIGHT_STEP)
    }

    /// Squared horizontal distance to `other`.
    #[inline]
    pub fn distance_sq(self, other: WorldPoint) -> i64 {
        distance_sq(self.x, self.y, other.x, other.y)
    }
}

/// Squared distance between two points in the horizontal plane.
#[inline]
pub fn distance_sq(ax: i32, ay: i32, bx: i32, by: i32) -> i64 {
    let dx = i64::from(bx) - i64::from(ax);
    let dy = i64::from(by) - i64::from(ay);
    dx * dx + dy * dy
}

/// Discrete walkway cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn containing(x: i32, y: i32) -> Self {
        Self {
            x: x.div_euclid(TILE_SIZE),
            y: y.div_euclid(TILE_SIZE),
        }
    }

    /// World coordinate of the tile's minimum corner.
    pub fn origin(self) -> (i32, i32) {
        (self.x * TILE_SIZE, self.y * TILE_SIZE)
    }

    pub fn center(self) -> (i32, i32) {
        let (x, y) = self.origin();
        (x + TILE_SIZE / 2, y + TILE_SIZE / 2)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Point an agent walks toward, with the radius at which it counts as arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub x: i32,
    pub y: i32,
    pub tolerance: i32,
}

impl Destination {
    pub const fn new(x: i32, y: i32, tolerance: i32) -> Self {
        Self { x, y, tolerance }
    }

    pub fn tile_center(tile: TileCoord, tolerance: i32) -> Self {
        let (x, y) = tile.center();
        Self::new(x, y, tolerance)
    }
}
