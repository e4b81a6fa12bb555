//! Fans trailing an entertainer around the park.
//!
//! Entertainers are unaware of their fans. A fan that stays close may claim
//! the entertainer's follower slot, which earns it a tighter spot right
//! behind the entertainer until another fan bumps it away.
use super::{BehaviorEffects, Reaction, TargetCommand, may_react, terminate, tick_down};
use crate::context::SimulationContext;
use crate::env::{BroadcastKind, EntityOracle, ParkEnv, Sound};
use crate::follow::{FollowInstruction, update_following};
use crate::state::{AgentState, BehaviorState, Capabilities, EntityRef, PursuitMode};

const BASE_COUNTDOWN: u8 = 10;
const COUNTDOWN_SPREAD: u32 = 128;
const COOLDOWN_BASE: u8 = 5;
const COOLDOWN_SPREAD: u32 = 64;
/// Cadence, staggered by the entertainer's id, of follower slot claims.
const CLAIM_PERIOD: u32 = 100;

/// Follow parameters for a fan; the favourite sticks much closer.
pub const fn entertainer_instruction(favourite: bool) -> FollowInstruction {
    if favourite {
        FollowInstruction::new(4, 12).forward(24).crowd(10)
    } else {
        FollowInstruction::new(20, 64).forward(32)
    }
}

/// Starts following the entertainer `target`.
///
/// Refused while the agent is busy with another behavior or still cooling
/// down from its last entertainer.
pub fn start_following_entertainer(
    agent: &mut AgentState,
    target: EntityRef,
    ctx: &mut SimulationContext<'_>,
) -> bool {
    if agent.behavior.is_following() || agent.follow.entertainer_countdown > 0 {
        return false;
    }
    agent.behavior = BehaviorState::FollowingEntertainer;
    agent.follow.target = Some(target);
    agent.follow.mode = PursuitMode::Direct;
    if agent.capabilities().contains(Capabilities::FIXED_COUNTDOWNS) {
        agent.follow.entertainer_countdown = BASE_COUNTDOWN;
        agent.follow.entertainer_interest = 0;
    } else {
        agent.follow.entertainer_countdown =
            BASE_COUNTDOWN + ctx.random_uint(COUNTDOWN_SPREAD) as u8;
        // Each new entertainer is a little less exciting than the last.
        let keep = ctx.random_uint(256);
        agent.follow.entertainer_interest =
            (u32::from(agent.follow.entertainer_interest) * keep / 255) as u8;
    }
    tracing::debug!(
        agent = %agent.id,
        %target,
        countdown = agent.follow.entertainer_countdown,
        interest = agent.follow.entertainer_interest,
        "following entertainer"
    );
    true
}

pub fn update_entertainer<O>(
    agent: &mut AgentState,
    entities: &O,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> BehaviorEffects
where
    O: EntityOracle + ?Sized,
{
    let me = entities.handle(agent.id);
    let target = agent
        .follow
        .target
        .and_then(|target| entities.resolve(target))
        .and_then(|view| view.as_pursuable().copied());
    let favourite = match (me, &target) {
        (Some(me), Some(view)) => view.is_favourite(me),
        _ => false,
    };

    let outcome = update_following(agent, &entertainer_instruction(favourite), entities, env, ctx);
    if let Some(error) = outcome.lost {
        return release(agent, &error, ctx);
    }

    let mut effects = BehaviorEffects::none();
    if outcome.comfortable {
        if let (Some(me), Some(view)) = (me, &target) {
            if ctx.tick.is_cadence(view.id().0, CLAIM_PERIOD) && ctx.random_uint(16) == 0 {
                effects.push(TargetCommand::ClaimFavourite {
                    target: view.handle,
                    follower: me,
                });
            }
        }

        if may_react(agent, ctx) {
            agent.facing = outcome.facing;
            cheer(agent, favourite, env, ctx);
        }
    }

    if tick_down(&mut agent.follow.entertainer_countdown, ctx) {
        let mut ended = release(agent, &"lost interest", ctx);
        ended.commands = effects.commands;
        return ended;
    }
    effects
}

/// Boosts happiness and rolls one of the cheering reactions.
fn cheer(
    agent: &mut AgentState,
    favourite: bool,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) {
    let boost = if favourite { 30 } else { 10 };
    agent.happiness_target = agent.happiness_target.saturating_add(boost);

    let roll = ctx.random_uint(if favourite { 8 } else { 16 });
    let reaction = match roll {
        0 => Some(Reaction::Jump),
        1..=3 => Some(Reaction::TakePhoto),
        4 => Some(Reaction::Wave),
        5 => Some(Reaction::Joy),
        6 => {
            let laugh = (ctx.rng.next_u32() & 31) as usize;
            if let Some(sound) = Sound::LAUGHS.get(laugh) {
                env.events().play_sound(*sound, agent.position);
            }
            None
        }
        _ => None,
    };
    if let Some(reaction) = reaction {
        agent.play(reaction);
        env.events().reaction_started(agent.id, reaction);
    }
    if matches!(roll, 0 | 6) {
        env.events()
            .broadcast(BroadcastKind::EntertainerSnare, agent.id);
    }
}

/// Ends following and arms the re-entry cooldown.
fn release(
    agent: &mut AgentState,
    cause: &dyn core::fmt::Display,
    ctx: &mut SimulationContext<'_>,
) -> BehaviorEffects {
    let effects = terminate(agent, cause);
    agent.follow.entertainer_countdown = COOLDOWN_BASE + ctx.random_uint(COOLDOWN_SPREAD) as u8;
    effects
}
