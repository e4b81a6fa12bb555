//! Guests gathering to watch something odd happen.
use super::{BehaviorEffects, Reaction, may_react, terminate, tick_down};
use crate::context::SimulationContext;
use crate::env::{BroadcastKind, EntityOracle, ParkEnv};
use crate::follow::{FollowInstruction, update_following};
use crate::state::{AgentState, BehaviorState, Capabilities, EntityRef, PursuitMode};

const WITNESS_BASE_COUNTDOWN: u8 = 3;
const WITNESS_COUNTDOWN_SPREAD: u32 = 16;

/// Keeps a loose ring around the event without pressing toward it.
pub const fn witness_instruction() -> FollowInstruction {
    FollowInstruction::new(10, 64).gradient(0)
}

/// Starts watching the agent `target`.
pub fn start_witnessing(
    agent: &mut AgentState,
    target: EntityRef,
    ctx: &mut SimulationContext<'_>,
) {
    let fixed = agent.capabilities().contains(Capabilities::FIXED_COUNTDOWNS);
    agent.behavior = BehaviorState::WitnessingEvent;
    agent.follow.target = Some(target);
    agent.follow.mode = PursuitMode::Direct;
    agent.follow.event_countdown = if fixed {
        WITNESS_BASE_COUNTDOWN
    } else {
        WITNESS_BASE_COUNTDOWN + ctx.random_uint(WITNESS_COUNTDOWN_SPREAD) as u8
    };
    let countdown = agent.follow.event_countdown;
    tracing::debug!(agent = %agent.id, %target, countdown, "witnessing");
}

pub fn update_witness<O>(
    agent: &mut AgentState,
    entities: &O,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> BehaviorEffects
where
    O: EntityOracle + ?Sized,
{
    let outcome = update_following(agent, &witness_instruction(), entities, env, ctx);
    if let Some(error) = outcome.lost {
        return terminate(agent, &error);
    }

    if outcome.comfortable && may_react(agent, ctx) {
        agent.facing = outcome.facing;
        if ctx.random_uint(8) == 0 {
            agent.play(Reaction::TakePhoto);
            env.events().reaction_started(agent.id, Reaction::TakePhoto);
            env.events().broadcast(BroadcastKind::GenericVisualOddity, agent.id);
        }
    }

    if tick_down(&mut agent.follow.event_countdown, ctx) {
        return terminate(agent, &"lost interest");
    }
    BehaviorEffects::none()
}
