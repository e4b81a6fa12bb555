use crate::config::FollowConfig;
use crate::env::RngOracle;
use crate::error::ErrorContext;
use crate::state::{AgentState, Tick};

/// Per-tick inputs every core function receives explicitly.
pub struct SimulationContext<'a> {
    pub tick: Tick,
    pub rng: &'a mut dyn RngOracle,
    pub config: &'a FollowConfig,
}

impl<'a> SimulationContext<'a> {
    pub fn new(tick: Tick, rng: &'a mut dyn RngOracle, config: &'a FollowConfig) -> Self {
        Self { tick, rng, config }
    }

    #[inline]
    pub fn random_uint(&mut self, max: u32) -> u32 {
        self.rng.random_uint(max)
    }

    /// True on the agent's staggered slot of a `period`-tick cadence.
    #[inline]
    pub fn agent_cadence(&self, agent: &AgentState, period: u32) -> bool {
        self.tick.is_cadence(agent.id.0, period)
    }

    /// True on the global countdown cadence.
    #[inline]
    pub fn countdown_due(&self) -> bool {
        self.tick.is_cadence(0, self.config.countdown_period)
    }

    pub fn error_context(&self, agent: &AgentState) -> ErrorContext {
        ErrorContext::new(self.tick.0).with_position(agent.position)
    }
}

impl std::fmt::Debug for SimulationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("tick", &self.tick)
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
