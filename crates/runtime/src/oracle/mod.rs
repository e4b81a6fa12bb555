//! Concrete park services behind the `park-core` oracle traits.
//!
//! [`GridMap`] owns the static walkway layout. [`WalkingMotion`] and
//! [`GridPlanner`] borrow it and are cheap to rebuild each tick, so the
//! simulation can hand the core a fresh [`park_core::ParkEnv`] without
//! holding self-referential state.
mod map;
mod motion;
mod planner;

pub use map::GridMap;
pub use motion::WalkingMotion;
pub use planner::GridPlanner;
