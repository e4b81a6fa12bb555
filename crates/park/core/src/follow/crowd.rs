//! Scoring of candidate destinations.
use crate::env::AgentView;
use crate::state::{EntityId, WorldPoint, distance_sq};

use super::FollowInstruction;

/// Squared radius inside which another agent makes a spot mildly crowded.
const CROWD_NEAR_SQ: i64 = 16 * 16;
/// Squared radius inside which another agent makes a spot badly crowded.
const CROWD_TOUCH_SQ: i64 = 6 * 6;

/// A destination under consideration and its accumulated cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub x: i32,
    pub y: i32,
    pub cost: i64,
}

impl Candidate {
    pub const fn at(x: i32, y: i32) -> Self {
        Self { x, y, cost: 0 }
    }
}

/// Cost of standing at `(x, y)` relative to the target and to the walker.
///
/// * distance to the approach point, weighted by the gradient weight, plus
///   a steep penalty past `max_distance_sq`;
/// * a steep penalty for crowding the target itself;
/// * a milder penalty for standing where the target is heading;
/// * half the squared walk from the agent's current position.
pub fn approach_cost(
    x: i32,
    y: i32,
    approach: (i32, i32),
    target: &AgentView,
    walker: WorldPoint,
    instruction: &FollowInstruction,
) -> i64 {
    let mut cost = 0;

    let d = distance_sq(x, y, approach.0, approach.1);
    cost += d * instruction.gradient_weight / 1000;
    if d > instruction.max_distance_sq {
        cost += (d - instruction.max_distance_sq) * 100;
    }

    let d = distance_sq(x, y, target.position.x, target.position.y);
    if d < instruction.min_distance_sq {
        cost += (instruction.min_distance_sq - d) * 200;
    }

    let d = distance_sq(x, y, target.destination.0, target.destination.1);
    if d < instruction.min_distance_sq {
        cost += (instruction.min_distance_sq - d) * 75;
    }

    cost += distance_sq(walker.x, walker.y, x, y) / 2;
    cost
}

/// Penalty for other agents standing near `(x, y)`. Never negative, so
/// more neighbours can only raise a spot's cost.
pub fn crowd_penalty(x: i32, y: i32, neighbours: &[WorldPoint], weight: i64) -> i64 {
    neighbours
        .iter()
        .map(|other| {
            let d = distance_sq(other.x, other.y, x, y);
            let mut cost = 0;
            if d < CROWD_NEAR_SQ {
                cost += (CROWD_NEAR_SQ - d) * weight / 3200;
            }
            if d < CROWD_TOUCH_SQ {
                cost += (CROWD_TOUCH_SQ - d) * weight / 4;
            }
            cost
        })
        .sum()
}

/// Positions of every agent other than `agent` in `found`.
pub fn others(agent: EntityId, found: Vec<(EntityId, WorldPoint)>) -> Vec<WorldPoint> {
    found
        .into_iter()
        .filter(|(id, _)| *id != agent)
        .map(|(_, position)| position)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_close_agent_never_lowers_cost() {
        let mut crowd = vec![WorldPoint::new(40, 40, 0)];
        let before = crowd_penalty(10, 10, &crowd, 100);
        crowd.push(WorldPoint::new(12, 13, 0));
        let after = crowd_penalty(10, 10, &crowd, 100);
        assert!(after > before);

        crowd.push(WorldPoint::new(10, 11, 0));
        assert!(crowd_penalty(10, 10, &crowd, 100) > after);
    }

    #[test]
    fn far_agents_cost_nothing() {
        let crowd = vec![WorldPoint::new(26, 10, 0), WorldPoint::new(-100, 0, 0)];
        assert_eq!(crowd_penalty(10, 10, &crowd, 100), 0);
    }

    #[test]
    fn touching_band_dominates_near_band() {
        let near = crowd_penalty(0, 0, &[WorldPoint::new(10, 0, 0)], 100);
        let touching = crowd_penalty(0, 0, &[WorldPoint::new(1, 0, 0)], 100);
        assert_eq!(near, (256 - 100) * 100 / 3200);
        assert_eq!(touching, (256 - 1) * 100 / 3200 + (36 - 1) * 100 / 4);
    }

    #[test]
    fn others_excludes_self() {
        let found = vec![
            (EntityId(1), WorldPoint::new(1, 1, 0)),
            (EntityId(2), WorldPoint::new(2, 2, 0)),
        ];
        assert_eq!(others(EntityId(1), found), vec![WorldPoint::new(2, 2, 0)]);
    }
}
