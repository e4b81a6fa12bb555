//! Canonical park state: entity store, agent records, and the per-tick
//! [`Roster`] snapshot other agents read from.
mod roster;
mod types;

pub use roster::Roster;
pub use types::*;
