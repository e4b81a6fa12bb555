//! Tick pipeline.
//!
//! The [`ParkEngine`] advances every agent by one tick: it captures a
//! [`Roster`] of the committed state, runs each agent's driver in ascending
//! id order against that snapshot, and applies the commands a driver emits
//! right after that driver returns.
use crate::behavior::{TargetCommand, update_agent};
use crate::context::SimulationContext;
use crate::env::ParkEnv;
use crate::state::{EntitiesState, EntityId, Roster};

/// Summary of one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub agents: usize,
    /// Agents that left a following state.
    pub terminated: Vec<EntityId>,
    pub commands: Vec<TargetCommand>,
    /// Commands whose receiver had vanished.
    pub rejected: usize,
}

pub struct ParkEngine<'a> {
    entities: &'a mut EntitiesState,
}

impl<'a> ParkEngine<'a> {
    pub fn new(entities: &'a mut EntitiesState) -> Self {
        Self { entities }
    }

    /// Advances every agent by one tick.
    pub fn step(&mut self, env: &ParkEnv<'_>, ctx: &mut SimulationContext<'_>) -> TickReport {
        let roster = Roster::capture(self.entities);
        let mut report = TickReport::default();

        for id in self.entities.agent_ids() {
            let Some(agent) = self.entities.agent_mut(id) else {
                continue;
            };
            agent.advance_reaction();
            let effects = update_agent(agent, &roster, env, ctx);
            report.agents += 1;
            if effects.terminated {
                report.terminated.push(id);
            }

            for command in effects.commands {
                match command.apply(self.entities) {
                    Ok(()) => report.commands.push(command),
                    Err(error) => {
                        tracing::debug!(agent = %id, ?command, %error, "command rejected");
                        report.rejected += 1;
                    }
                }
            }
        }
        report
    }
}
