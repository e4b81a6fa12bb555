//! Destination optimizer.
//!
//! While an agent has a clean line to its target, a tiny gradient descent
//! nudges its destination every tick: two randomly perturbed copies of the
//! current destination are scored against it, and the destination steps
//! toward whichever copy is cheaper. The cost balances staying close to an
//! approach point ahead of the target, keeping personal space, not walking
//! needlessly, and avoiding other agents.
//!
//! Every so often (and whenever the agent arrives) a slide check confirms the
//! target is still reachable that way. If it is not, the planner is asked
//! for a hint; failing that the target is reported lost.
use super::crowd::{Candidate, approach_cost, crowd_penalty, others};
use super::escalation::escalate;
use super::slide::{SlideQuery, slide};
use super::{Direction, FollowError, FollowInstruction, FollowOutcome};
use crate::config::FollowConfig;
use crate::context::SimulationContext;
use crate::env::{AgentView, EntityOracle, MapOracle, ParkEnv};
use crate::state::{AgentState, Capabilities, PursuitMode, WorldPoint};

/// Preference for leaving the destination where it is.
const STAY_BIAS: i64 = 16;
/// Distance the destination moves per tick when pushed.
const PUSH_STEP: i32 = 4;
/// Arrival tolerance while the optimizer is steering.
const DESTINATION_TOLERANCE: i32 = 4;
/// Base distance below which the agent turns to face its target.
const FACE_TARGET_DISTANCE: i32 = 8;

/// Advances an agent one tick toward its follow target.
///
/// Resolves the target first; when it is missing or not an agent the
/// outcome reports it lost and nothing else happens.
pub fn update_following<O>(
    agent: &mut AgentState,
    instruction: &FollowInstruction,
    entities: &O,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> FollowOutcome
where
    O: EntityOracle + ?Sized,
{
    let handle = agent.follow.target;
    let Some(target) = handle
        .and_then(|handle| entities.resolve(handle))
        .and_then(|view| view.as_pursuable().copied())
    else {
        return FollowOutcome::lost(FollowError::TargetInvalid {
            target: handle,
            context: ctx.error_context(agent),
        });
    };

    let dx = target.position.x - agent.position.x;
    let dy = target.position.y - agent.position.y;
    let mut outcome = FollowOutcome {
        facing: Direction::from_offset(dx, dy),
        distance_sq: agent.position.distance_sq(target.position),
        comfortable: false,
        lost: None,
    };
    let capabilities = agent.capabilities();

    if agent.follow.mode == PursuitMode::Direct {
        push_destination(agent, &target, instruction, entities, ctx);
        clamp_destination(agent, &target, env.map(), capabilities, ctx);
    }

    let step = env.motion().move_toward(agent.position, agent.destination);
    let mut validate = false;
    match step.next {
        Some(next) => agent.position = settle(env.map(), agent.position, next),
        None => {
            // Arrived: if chasing directly, confirm that still works.
            validate = agent.follow.mode == PursuitMode::Direct;
            outcome.comfortable = true;
        }
    }

    // Periodic re-validation so nobody stays stuck silently.
    if ctx.agent_cadence(agent, ctx.config.validation_period) {
        validate = true;
    }

    if validate {
        let query = SlideQuery::to_target(agent.position, target.position, capabilities);
        match slide(env.map(), &query, ctx.config) {
            Ok(_) => agent.follow.mode = PursuitMode::Direct,
            Err(reason) => {
                let target_handle = target.handle;
                if let Err(error) =
                    escalate(agent, target_handle, target.position, reason, env, ctx)
                {
                    outcome.lost = Some(error);
                }
            }
        }
    }

    let jitter = (u64::from(agent.id.0).wrapping_add(ctx.tick.0) % 7) as i32;
    if step.remaining < FACE_TARGET_DISTANCE + jitter {
        agent.facing = outcome.facing;
    }

    outcome
}

/// Scores the current destination against two perturbed copies and pushes
/// the destination toward the cheaper ones.
fn push_destination<O>(
    agent: &mut AgentState,
    target: &AgentView,
    instruction: &FollowInstruction,
    entities: &O,
    ctx: &mut SimulationContext<'_>,
) where
    O: EntityOracle + ?Sized,
{
    // One draw decides both magnitude and sign for both axes.
    let draw = ctx.random_uint(8);
    let sign = if draw & 1 == 1 { 1 } else { -1 };
    let offset = (1 + (draw >> 1) as i32) * sign;

    let (ahead_x, ahead_y) = target.facing.scaled(instruction.forward_offset);
    let approach = (target.position.x + ahead_x, target.position.y + ahead_y);

    let (x, y) = (agent.destination.x, agent.destination.y);
    let mut candidates: [Candidate; FollowConfig::CANDIDATES] = [
        Candidate::at(x, y),
        Candidate::at(x + offset, y),
        Candidate::at(x, y + offset),
    ];

    let range = ctx.config.crowd_scan_range;
    let crowd = others(
        agent.id,
        entities.agents_within(
            (agent.position.x - range, agent.position.y - range),
            (agent.position.x + range, agent.position.y + range),
        ),
    );

    for candidate in &mut candidates {
        candidate.cost = approach_cost(
            candidate.x,
            candidate.y,
            approach,
            target,
            agent.position,
            instruction,
        ) + crowd_penalty(candidate.x, candidate.y, &crowd, instruction.crowd_weight);
    }

    let stay = candidates[0].cost - STAY_BIAS;
    if stay > candidates[1].cost {
        agent.destination.x += PUSH_STEP * sign;
    }
    if stay > candidates[2].cost {
        agent.destination.y += PUSH_STEP * sign;
    }
    agent.destination.tolerance = DESTINATION_TOLERANCE;
}

/// Keeps the destination inside the edges the agent's tile allows.
///
/// Off the walkway there is nothing to clamp against, so the agent heads
/// straight for the target instead.
fn clamp_destination<M>(
    agent: &mut AgentState,
    target: &AgentView,
    map: &M,
    capabilities: Capabilities,
    ctx: &SimulationContext<'_>,
) where
    M: MapOracle + ?Sized,
{
    let tile = agent.position.tile();
    let Some(path) = map.path_at(tile, agent.position.height()) else {
        let unavailable = FollowError::TileUnavailable {
            position: agent.position,
            context: ctx.error_context(agent),
        };
        tracing::trace!(agent = %agent.id, %unavailable, "steering straight at target");
        agent.destination.x = target.position.x;
        agent.destination.y = target.position.y;
        return;
    };

    let edges = path.passable_edges(capabilities.contains(Capabilities::BYPASS_BANNERS));
    let (origin_x, origin_y) = tile.origin();
    let destination = &mut agent.destination;
    if !edges.allows(Direction::West) {
        destination.x = destination.x.max(origin_x + 12);
    }
    if !edges.allows(Direction::South) {
        destination.y = destination.y.min(origin_y + 20);
    }
    if !edges.allows(Direction::East) {
        destination.x = destination.x.min(origin_x + 20);
    }
    if !edges.allows(Direction::North) {
        destination.y = destination.y.max(origin_y + 12);
    }
}

/// Places `next` on the walking surface, following slopes. Keeps the current
/// height when there is no walkway under the new point.
pub(crate) fn settle<M>(map: &M, current: WorldPoint, next: WorldPoint) -> WorldPoint
where
    M: MapOracle + ?Sized,
{
    let z = map
        .path_at(next.tile(), current.height() + 2)
        .map(|path| path.height_at(next.x, next.y))
        .unwrap_or(current.z);
    WorldPoint::new(next.x, next.y, z)
}
