//! Headless tick loop.
//!
//! [`Simulation`] owns the park state and the runtime services. Each
//! [`step`](Simulation::step) applies scenario starts that have come due,
//! runs the [`ParkEngine`] once, publishes behavior events on the bus and
//! advances the tick.
use park_core::{
    EntitiesState, Env, FollowConfig, ParkEngine, PcgRng, SimulationContext, Tick, TickReport,
    start_chasing, start_following_entertainer, start_witnessing,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::events::{BehaviorEvent, Event, EventBus, Topic};
use crate::oracle::{GridMap, GridPlanner, WalkingMotion};
use crate::scenario::{Scenario, ScheduledStart, StartKind};

/// Totals over a [`Simulation::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub terminations: usize,
    pub commands: usize,
    pub rejected: usize,
}

impl RunSummary {
    fn absorb(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.terminations += report.terminated.len();
        self.commands += report.commands.len();
        self.rejected += report.rejected;
    }
}

pub struct Simulation {
    map: GridMap,
    entities: EntitiesState,
    rng: PcgRng,
    config: FollowConfig,
    bus: EventBus,
    tick: Tick,
    walk_speed: i32,
    pending: Vec<ScheduledStart>,
}

impl Simulation {
    pub fn new(map: GridMap, entities: EntitiesState, seed: u64, config: FollowConfig) -> Self {
        Self {
            map,
            entities,
            rng: PcgRng::new(seed),
            config,
            bus: EventBus::new(),
            tick: Tick::ZERO,
            walk_speed: WalkingMotion::DEFAULT_SPEED,
            pending: Vec::new(),
        }
    }

    /// Builds the map, spawns every agent and schedules the starts.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let map = scenario.build_map()?;
        let mut entities = EntitiesState::new();
        let starts = scenario.populate(&mut entities)?;

        let mut simulation = Self::new(map, entities, scenario.seed, scenario.follow_config())
            .with_starts(starts);
        if let Some(speed) = scenario.walk_speed {
            simulation = simulation.with_walk_speed(speed);
        }
        Ok(simulation)
    }

    pub fn with_starts(mut self, starts: Vec<ScheduledStart>) -> Self {
        self.pending.extend(starts);
        self
    }

    pub fn with_walk_speed(mut self, speed: i32) -> Self {
        self.walk_speed = speed.max(1);
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn entities(&self) -> &EntitiesState {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntitiesState {
        &mut self.entities
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> Result<broadcast::Receiver<Event>> {
        self.bus.subscribe(topic)
    }

    /// Starts scheduled for later ticks.
    pub fn pending_starts(&self) -> &[ScheduledStart] {
        &self.pending
    }

    /// Advances the park by one tick.
    pub fn step(&mut self) -> TickReport {
        let tick = self.tick;
        // Only escorting officers consult the planner, and staff ignore banners.
        let planner = GridPlanner::new(&self.map).bypass_banners(true);
        let motion = WalkingMotion::new(&self.map).with_speed(self.walk_speed);
        let env = Env::new(&self.map, &motion, &planner, &self.bus);
        let env = env.as_park_env();
        let mut ctx = SimulationContext::new(tick, &mut self.rng, &self.config);

        apply_due_starts(&mut self.pending, &mut self.entities, &self.bus, &mut ctx);
        let report = ParkEngine::new(&mut self.entities).step(&env, &mut ctx);

        for &agent in &report.terminated {
            self.bus
                .publish(Event::Behavior(BehaviorEvent::Terminated { agent, tick }));
        }
        for &command in &report.commands {
            self.bus
                .publish(Event::Behavior(BehaviorEvent::CommandApplied { command, tick }));
        }
        if report.rejected > 0 {
            self.bus.publish(Event::Behavior(BehaviorEvent::CommandsRejected {
                count: report.rejected,
                tick,
            }));
        }

        tracing::trace!(
            %tick,
            agents = report.agents,
            terminated = report.terminated.len(),
            commands = report.commands.len(),
            "tick complete"
        );
        self.tick = tick + 1;
        report
    }

    /// Runs `ticks` steps and returns the totals.
    pub fn run(&mut self, ticks: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..ticks {
            let report = self.step();
            summary.absorb(&report);
        }
        tracing::info!(
            ticks = summary.ticks,
            terminations = summary.terminations,
            commands = summary.commands,
            rejected = summary.rejected,
            "run complete"
        );
        summary
    }
}

fn apply_due_starts(
    pending: &mut Vec<ScheduledStart>,
    entities: &mut EntitiesState,
    bus: &EventBus,
    ctx: &mut SimulationContext<'_>,
) {
    let tick = ctx.tick;
    let (due, later): (Vec<_>, Vec<_>) = pending.drain(..).partition(|start| start.at <= tick);
    *pending = later;

    for start in due {
        let agent = match entities.agent_by_ref_mut(start.agent) {
            Ok(agent) => agent,
            Err(error) => {
                tracing::warn!(agent = %start.agent, %error, "scheduled start dropped");
                continue;
            }
        };

        let accepted = match start.kind {
            StartKind::Witness(target) => {
                start_witnessing(agent, target, ctx);
                true
            }
            StartKind::FollowEntertainer(target) => start_following_entertainer(agent, target, ctx),
            StartKind::Chase(suspect) => start_chasing(agent, suspect),
        };

        if accepted {
            bus.publish(Event::Behavior(BehaviorEvent::Started {
                agent: agent.id,
                behavior: agent.behavior,
                tick,
            }));
        } else {
            tracing::warn!(agent = %start.agent, kind = ?start.kind, "scheduled start refused");
        }
    }
}
