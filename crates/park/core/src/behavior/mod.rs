//! Per-state behavior drivers.
//!
//! Each following state configures a [`FollowInstruction`](crate::follow::FollowInstruction),
//! runs the optimizer once per tick and layers its own reactions, countdowns
//! and transitions on top. Drivers only write to the agent they update;
//! anything that must change another agent is returned as a
//! [`TargetCommand`] and applied by the engine once the driver is done.
mod command;
mod entertainer;
mod escort;
mod reaction;
mod security;
mod witness;

pub use command::TargetCommand;
pub use entertainer::{entertainer_instruction, start_following_entertainer, update_entertainer};
pub use escort::{escorted_instruction, update_escort_out, update_escorted};
pub use reaction::Reaction;
pub use security::{security_instruction, start_chasing, update_security_chase};
pub use witness::{start_witnessing, update_witness, witness_instruction};

use arrayvec::ArrayVec;

use crate::config::FollowConfig;
use crate::context::SimulationContext;
use crate::env::{EntityOracle, ParkEnv};
use crate::state::{AgentState, BehaviorState};

/// What a driver asks of the engine after updating its agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BehaviorEffects {
    pub commands: ArrayVec<TargetCommand, { FollowConfig::MAX_COMMANDS }>,
    /// The agent left its following state this tick.
    pub terminated: bool,
}

impl BehaviorEffects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn terminated() -> Self {
        Self {
            terminated: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, command: TargetCommand) {
        if self.commands.try_push(command).is_err() {
            tracing::warn!(?command, "behavior command dropped");
        }
    }
}

/// Runs the driver for the agent's current state.
pub fn update_agent<O>(
    agent: &mut AgentState,
    entities: &O,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> BehaviorEffects
where
    O: EntityOracle + ?Sized,
{
    match agent.behavior {
        BehaviorState::Walking | BehaviorState::Patrolling => {
            cool_down(agent, ctx);
            BehaviorEffects::none()
        }
        BehaviorState::WitnessingEvent => update_witness(agent, entities, env, ctx),
        BehaviorState::FollowingEntertainer => update_entertainer(agent, entities, env, ctx),
        BehaviorState::SecurityChasing => update_security_chase(agent, entities, env, ctx),
        BehaviorState::EscortedBySecurity => update_escorted(agent, entities, env, ctx),
        BehaviorState::SecurityEscortingOut => update_escort_out(agent, entities, env, ctx),
    }
}

/// Default states tick the entertainer re-entry cooldown down.
fn cool_down(agent: &mut AgentState, ctx: &SimulationContext<'_>) {
    if agent.follow.entertainer_countdown > 0 && ctx.countdown_due() {
        agent.follow.entertainer_countdown -= 1;
    }
}

/// Decrements `countdown` on the countdown cadence. True once it reaches zero.
pub(crate) fn tick_down(countdown: &mut u8, ctx: &SimulationContext<'_>) -> bool {
    if !ctx.countdown_due() {
        return false;
    }
    *countdown = countdown.saturating_sub(1);
    *countdown == 0
}

/// Whether a comfortable agent may roll for a crowd reaction this tick.
pub(crate) fn may_react(agent: &AgentState, ctx: &SimulationContext<'_>) -> bool {
    agent
        .capabilities()
        .contains(crate::state::Capabilities::CROWD_REACTIONS)
        && agent.is_at_rest()
        && ctx.agent_cadence(agent, ctx.config.reaction_period)
}

/// Ends the current following state.
pub(crate) fn terminate(agent: &mut AgentState, cause: &dyn core::fmt::Display) -> BehaviorEffects {
    tracing::debug!(
        agent = %agent.id,
        state = %agent.behavior,
        %cause,
        "behavior ended"
    );
    agent.return_to_default();
    BehaviorEffects::terminated()
}
