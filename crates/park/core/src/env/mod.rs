//! Traits describing the services the follow core consumes.
//!
//! Oracles expose walkway layout, movement primitives, pathfinding, event
//! output, entity lookup and randomness. The [`Env`] aggregate bundles the
//! per-park services so drivers can reach them without hard coupling to
//! concrete implementations; entity lookup and randomness change every tick
//! and travel separately.
mod entities;
mod error;
mod events;
mod map;
mod motion;
mod planner;
mod rng;

pub use entities::{AgentView, EntityOracle, EntityView};
pub use error::{MAX_PATH_HEIGHT, MIN_PATH_HEIGHT, OracleError};
pub use events::{BroadcastKind, EventSink, NullEvents, Sound};
pub use map::{MapOracle, PathTile};
pub use motion::{MotionOracle, MoveStep};
pub use planner::{NoPathHint, PathPlanner};
pub use rng::{PcgRng, RngOracle, ScriptedRng};

/// Aggregates the read-only park services used by the follow core.
pub struct Env<'a, M, V, P, E>
where
    M: MapOracle + ?Sized,
    V: MotionOracle + ?Sized,
    P: PathPlanner + ?Sized,
    E: EventSink + ?Sized,
{
    map: &'a M,
    motion: &'a V,
    planner: &'a P,
    events: &'a E,
}

pub type ParkEnv<'a> = Env<
    'a,
    dyn MapOracle + 'a,
    dyn MotionOracle + 'a,
    dyn PathPlanner + 'a,
    dyn EventSink + 'a,
>;

impl<'a, M, V, P, E> Env<'a, M, V, P, E>
where
    M: MapOracle + ?Sized,
    V: MotionOracle + ?Sized,
    P: PathPlanner + ?Sized,
    E: EventSink + ?Sized,
{
    pub fn new(map: &'a M, motion: &'a V, planner: &'a P, events: &'a E) -> Self {
        Self {
            map,
            motion,
            planner,
            events,
        }
    }

    pub fn map(&self) -> &'a M {
        self.map
    }

    pub fn motion(&self) -> &'a V {
        self.motion
    }

    pub fn planner(&self) -> &'a P {
        self.planner
    }

    pub fn events(&self) -> &'a E {
        self.events
    }
}

impl<'a, M, V, P, E> Env<'a, M, V, P, E>
where
    M: MapOracle + 'a,
    V: MotionOracle + 'a,
    P: PathPlanner + 'a,
    E: EventSink + 'a,
{
    /// Converts this environment into the trait-object based [`ParkEnv`].
    pub fn as_park_env(&self) -> ParkEnv<'a> {
        let map: &'a dyn MapOracle = self.map;
        let motion: &'a dyn MotionOracle = self.motion;
        let planner: &'a dyn PathPlanner = self.planner;
        let events: &'a dyn EventSink = self.events;
        Env::new(map, motion, planner, events)
    }
}

impl<M, V, P, E> Clone for Env<'_, M, V, P, E>
where
    M: MapOracle + ?Sized,
    V: MotionOracle + ?Sized,
    P: PathPlanner + ?Sized,
    E: EventSink + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, V, P, E> Copy for Env<'_, M, V, P, E>
where
    M: MapOracle + ?Sized,
    V: MotionOracle + ?Sized,
    P: PathPlanner + ?Sized,
    E: EventSink + ?Sized,
{
}

impl<M, V, P, E> std::fmt::Debug for Env<'_, M, V, P, E>
where
    M: MapOracle + ?Sized,
    V: MotionOracle + ?Sized,
    P: PathPlanner + ?Sized,
    E: EventSink + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env").finish_non_exhaustive()
    }
}
