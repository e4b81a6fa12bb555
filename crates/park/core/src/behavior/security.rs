//! Security officers chasing and arresting a suspect.
use super::{BehaviorEffects, TargetCommand, terminate};
use crate::context::SimulationContext;
use crate::env::{EntityOracle, ParkEnv};
use crate::follow::{FollowInstruction, update_following};
use crate::state::{AgentState, BehaviorState, Capabilities, EntityRef, PursuitMode};

const ARREST_BASE_COUNTDOWN: u8 = 10;
const ARREST_COUNTDOWN_SPREAD: u32 = 50;

/// Tight pursuit a step ahead of the suspect.
pub const fn security_instruction() -> FollowInstruction {
    FollowInstruction::new(8, 8).forward(16)
}

/// Starts chasing `suspect`. Only agents that can arrest may chase.
pub fn start_chasing(agent: &mut AgentState, suspect: EntityRef) -> bool {
    if !agent.capabilities().contains(Capabilities::ARRESTS) {
        return false;
    }
    agent.behavior = BehaviorState::SecurityChasing;
    agent.follow.target = Some(suspect);
    agent.follow.mode = PursuitMode::Direct;
    agent.follow.arrest_countdown = 0;
    tracing::debug!(agent = %agent.id, %suspect, "chasing");
    true
}

pub fn update_security_chase<O>(
    agent: &mut AgentState,
    entities: &O,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> BehaviorEffects
where
    O: EntityOracle + ?Sized,
{
    let suspect = agent
        .follow
        .target
        .and_then(|target| entities.resolve(target))
        .and_then(|view| view.as_pursuable().copied());

    let outcome = update_following(agent, &security_instruction(), entities, env, ctx);
    let (Some(suspect), None) = (suspect, outcome.lost) else {
        let cause = outcome
            .lost
            .map_or_else(|| "suspect gone".to_string(), |error| error.to_string());
        return terminate(agent, &cause);
    };

    let mut effects = BehaviorEffects::none();
    let free = suspect.behavior != BehaviorState::EscortedBySecurity && !suspect.leaving_park;
    if free && outcome.comfortable {
        if let Some(officer) = entities.handle(agent.id) {
            agent.follow.arrest_countdown =
                ARREST_BASE_COUNTDOWN + ctx.random_uint(ARREST_COUNTDOWN_SPREAD) as u8;
            effects.push(TargetCommand::Arrest {
                suspect: suspect.handle,
                officer,
            });
            tracing::debug!(agent = %agent.id, suspect = %suspect.handle, "arresting");
        }
    }

    if agent.follow.arrest_countdown > 0 && ctx.countdown_due() {
        agent.follow.arrest_countdown -= 1;
        if agent.follow.arrest_countdown <= 1 {
            start_escort_out(agent);
        }
    }
    effects
}

fn start_escort_out(agent: &mut AgentState) {
    agent.behavior = BehaviorState::SecurityEscortingOut;
    agent.reset_pathfind_goal();
    tracing::debug!(agent = %agent.id, "escorting out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FollowConfig;
    use crate::env::{Env, NoPathHint, NullEvents, ScriptedRng};
    use crate::state::{AgentKind, EntitiesState, Roster, StaffRole, Tick, WorldPoint};
    use crate::testing::{TestMap, TestMotion};

    /// Officer (id 0) standing right behind a west-facing guest (id 1).
    fn park() -> (EntitiesState, EntityRef, EntityRef) {
        let mut entities = EntitiesState::new();
        let officer =
            entities.spawn_agent(AgentKind::Staff(StaffRole::Security), WorldPoint::new(50, 48, 0));
        let guest = entities.spawn_agent(AgentKind::Guest, WorldPoint::new(40, 48, 0));
        entities.agent_mut(guest.id).unwrap().facing = crate::follow::Direction::West;
        assert!(start_chasing(entities.agent_mut(officer.id).unwrap(), guest));
        (entities, officer, guest)
    }

    #[test]
    fn only_security_may_chase() {
        let mut mechanic = AgentState::new(
            crate::state::EntityId(0),
            AgentKind::Staff(StaffRole::Mechanic),
            WorldPoint::ORIGIN,
        );
        assert!(!start_chasing(&mut mechanic, EntityRef::new(crate::state::EntityId(1), 0)));
        assert_eq!(mechanic.behavior, BehaviorState::Patrolling);
    }

    #[test]
    fn comfortable_officer_arrests_free_suspect() {
        let map = TestMap::open(0..4, 0..4);
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let (mut entities, officer, guest) = park();

        let mut rng = ScriptedRng::new([0, 7]);
        let roster = Roster::capture(&entities);
        let agent = entities.agent_mut(officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        let effects = update_security_chase(agent, &roster, &env, &mut ctx);

        assert_eq!(agent.follow.arrest_countdown, 17);
        assert_eq!(
            effects.commands.as_slice(),
            &[TargetCommand::Arrest {
                suspect: guest,
                officer,
            }]
        );
    }

    #[test]
    fn escorted_suspect_is_not_arrested_twice() {
        let map = TestMap::open(0..4, 0..4);
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let (mut entities, officer, guest) = park();
        entities.agent_mut(guest.id).unwrap().leaving_park = true;

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&entities);
        let agent = entities.agent_mut(officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        let effects = update_security_chase(agent, &roster, &env, &mut ctx);

        assert!(effects.commands.is_empty());
        assert_eq!(agent.follow.arrest_countdown, 0);
    }

    #[test]
    fn arrest_countdown_leads_to_escort_out() {
        let map = TestMap::open(0..4, 0..4);
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let (mut entities, officer, guest) = park();
        entities.agent_mut(guest.id).unwrap().behavior = BehaviorState::EscortedBySecurity;
        entities.agent_mut(officer.id).unwrap().follow.arrest_countdown = 3;

        let mut rng = ScriptedRng::new([0]);
        for tick in [11, 22] {
            let roster = Roster::capture(&entities);
            let agent = entities.agent_mut(officer.id).unwrap();
            let mut ctx = SimulationContext::new(Tick(tick), &mut rng, &config);
            update_security_chase(agent, &roster, &env, &mut ctx);
        }

        let agent = entities.agent(officer.id).unwrap();
        assert_eq!(agent.behavior, BehaviorState::SecurityEscortingOut);
        assert_eq!(agent.follow.arrest_countdown, 1);
        assert_eq!(agent.follow.target, Some(guest));
    }

    #[test]
    fn lost_suspect_returns_officer_to_patrol() {
        let map = TestMap::open(0..4, 0..4);
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let (mut entities, officer, guest) = park();
        entities.despawn(guest.id);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&entities);
        let agent = entities.agent_mut(officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        let effects = update_security_chase(agent, &roster, &env, &mut ctx);

        assert!(effects.terminated);
        assert_eq!(agent.behavior, BehaviorState::Patrolling);
        assert_eq!(agent.follow.target, None);
    }
}
