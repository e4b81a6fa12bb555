//! Both ends of an arrest: the suspect trailing its officer, and the officer
//! walking the suspect to the nearest exit.
use super::{BehaviorEffects, Reaction, TargetCommand, terminate};
use crate::context::SimulationContext;
use crate::env::{AgentView, EntityOracle, ParkEnv};
use crate::follow::{Direction, FollowInstruction, settle, update_following};
use crate::state::{AgentState, BehaviorState, WorldPoint};

/// The officer waits while the suspect is farther than this (squared).
const ESCORT_WAIT_DISTANCE_SQ: i64 = 16 * 16;
/// The suspect is let go once the officer is this close (squared) to an exit.
const EXIT_RELEASE_DISTANCE_SQ: i64 = 64 * 64;

pub const fn escorted_instruction() -> FollowInstruction {
    FollowInstruction::new(8, 8).forward(16)
}

/// Whether `escort` is an officer still holding on to its suspect.
fn escort_active(escort: &AgentView) -> bool {
    matches!(
        escort.behavior,
        BehaviorState::SecurityChasing | BehaviorState::SecurityEscortingOut
    )
}

pub fn update_escorted<O>(
    agent: &mut AgentState,
    entities: &O,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> BehaviorEffects
where
    O: EntityOracle + ?Sized,
{
    let escort = agent
        .follow
        .target
        .and_then(|target| entities.resolve(target))
        .and_then(|view| view.as_pursuable().copied());
    let arrested = escort.is_some_and(|view| view.kind.is_security());
    if let Some(view) = escort {
        if arrested && !escort_active(&view) {
            return terminate(agent, &"got away");
        }
    }

    let outcome = update_following(agent, &escorted_instruction(), entities, env, ctx);
    if let Some(error) = outcome.lost {
        return terminate(agent, &error);
    }

    let chasing = escort.is_some_and(|view| view.behavior == BehaviorState::SecurityChasing);
    if outcome.comfortable
        && arrested
        && chasing
        && agent.is_at_rest()
        && ctx.agent_cadence(agent, ctx.config.countdown_period)
    {
        agent.facing = outcome.facing;
        if let Some(reaction) = Reaction::escorted(ctx.random_uint(16)) {
            agent.play(reaction);
            env.events().reaction_started(agent.id, reaction);
        }
    }
    BehaviorEffects::none()
}

pub fn update_escort_out<O>(
    agent: &mut AgentState,
    entities: &O,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> BehaviorEffects
where
    O: EntityOracle + ?Sized,
{
    let Some(suspect) = agent
        .follow
        .target
        .and_then(|target| entities.resolve(target))
        .and_then(|view| view.as_pursuable().copied())
    else {
        return terminate(agent, &"suspect gone");
    };

    if agent.position.distance_sq(suspect.position) > ESCORT_WAIT_DISTANCE_SQ {
        let map = env.map();
        if map
            .path_at(agent.position.tile(), agent.position.height() + 2)
            .is_none()
        {
            return terminate(agent, &"lost the path");
        }
        return BehaviorEffects::none();
    }

    let step = env.motion().move_toward(agent.position, agent.destination);
    if let Some(next) = step.next {
        agent.position = settle(env.map(), agent.position, next);
        return BehaviorEffects::none();
    }

    let Some(exit) = env.map().nearest_exit(agent.position) else {
        let mut effects = terminate(agent, &"no exit");
        effects.push(TargetCommand::Release {
            suspect: suspect.handle,
        });
        return effects;
    };

    if agent.position.distance_sq(exit) < EXIT_RELEASE_DISTANCE_SQ {
        tracing::debug!(agent = %agent.id, suspect = %suspect.handle, "escorted out");
        let mut effects = terminate(agent, &"reached exit");
        effects.push(TargetCommand::Release {
            suspect: suspect.handle,
        });
        return effects;
    }

    head_for(agent, exit, env, ctx);
    BehaviorEffects::none()
}

/// Picks the next tile toward `exit`: the planner's choice, else a direct
/// step if the walkway allows it, else any open edge.
fn head_for(
    agent: &mut AgentState,
    exit: WorldPoint,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) {
    let tile = agent.position.tile();
    let height = agent.position.height();
    if let Some(direction) = env.planner().choose_direction(tile, height, exit) {
        env.motion().move_one_tile(agent, direction);
        return;
    }

    let Some(path) = env.map().path_at(tile, height) else {
        env.motion().surface_fallback(agent);
        return;
    };
    let direction = Direction::from_offset(exit.x - agent.position.x, exit.y - agent.position.y);
    if path.edges.allows(direction) {
        agent.facing = direction;
        env.motion().move_one_tile(agent, direction);
    } else {
        tracing::trace!(agent = %agent.id, %tile, "no way toward exit, wandering");
        env.motion().wander(agent, path.edges, &mut *ctx.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::update_agent;
    use crate::config::FollowConfig;
    use crate::env::{Env, NoPathHint, NullEvents, ScriptedRng};
    use crate::follow::EdgeSet;
    use crate::state::{
        AgentKind, Destination, EntitiesState, EntityRef, PursuitMode, Roster, StaffRole, Tick,
        TileCoord,
    };
    use crate::testing::{FixedPlanner, Recorded, RecordingEvents, TestMap, TestMotion};
    use crate::env::PathTile;

    struct Arrest {
        entities: EntitiesState,
        officer: EntityRef,
        suspect: EntityRef,
    }

    fn arrest(
        officer_at: (i32, i32),
        suspect_at: (i32, i32),
        officer_state: BehaviorState,
    ) -> Arrest {
        let mut entities = EntitiesState::new();
        let officer = entities.spawn_agent(
            AgentKind::Staff(StaffRole::Security),
            WorldPoint::new(officer_at.0, officer_at.1, 0),
        );
        let suspect = entities.spawn_agent(
            AgentKind::Guest,
            WorldPoint::new(suspect_at.0, suspect_at.1, 0),
        );
        {
            let agent = entities.agent_mut(officer.id).unwrap();
            agent.behavior = officer_state;
            agent.follow.target = Some(suspect);
            agent.destination = Destination::new(officer_at.0, officer_at.1, 2);
        }
        {
            let agent = entities.agent_mut(suspect.id).unwrap();
            agent.behavior = BehaviorState::EscortedBySecurity;
            agent.follow.target = Some(officer);
            agent.follow.mode = PursuitMode::Direct;
            agent.leaving_park = true;
        }
        Arrest {
            entities,
            officer,
            suspect,
        }
    }

    #[test]
    fn suspect_gets_away_when_officer_gives_up() {
        let map = TestMap::open(0..4, 0..4);
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((48, 48), (40, 48), BehaviorState::Patrolling);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.suspect.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        let effects = update_escorted(agent, &roster, &env, &mut ctx);

        assert!(effects.terminated);
        assert_eq!(agent.behavior, BehaviorState::Walking);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn escorted_suspect_shows_displeasure() {
        let map = TestMap::open(0..4, 0..4);
        let motion = TestMotion::default();
        let events = RecordingEvents::default();
        let env = Env::new(&map, &motion, &NoPathHint, &events).as_park_env();
        let config = FollowConfig::default();
        // Officer faces north by default; the suspect stands 16 units ahead
        // of it, exactly on the approach point.
        let mut arrest = arrest((48, 64), (48, 48), BehaviorState::SecurityChasing);

        // Suspect id 1: reaction slot at tick 10. Push draw, then roll 5.
        let mut rng = ScriptedRng::new([1, 5]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.suspect.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(10), &mut rng, &config);
        let effects = update_escorted(agent, &roster, &env, &mut ctx);

        assert!(!effects.terminated);
        assert_eq!(agent.reaction, Some(Reaction::EmptyPockets));
        assert_eq!(
            events.take(),
            vec![Recorded::Reaction(arrest.suspect.id, Reaction::EmptyPockets)]
        );
    }

    #[test]
    fn officer_waits_for_straggling_suspect() {
        let map = TestMap::open(0..4, 0..4);
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((16, 16), (80, 80), BehaviorState::SecurityEscortingOut);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.officer.id).unwrap();
        let before = agent.clone();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        let effects = update_escort_out(agent, &roster, &env, &mut ctx);

        assert_eq!(effects, BehaviorEffects::none());
        assert_eq!(*agent, before);
    }

    #[test]
    fn officer_off_path_while_waiting_gives_up() {
        let map = TestMap::default();
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((16, 16), (80, 80), BehaviorState::SecurityEscortingOut);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        let effects = update_escort_out(agent, &roster, &env, &mut ctx);

        assert!(effects.terminated);
        assert_eq!(agent.behavior, BehaviorState::Patrolling);
    }

    #[test]
    fn reaching_exit_releases_suspect() {
        let mut map = TestMap::open(0..4, 0..4);
        map.exits.push(WorldPoint::new(100, 48, 0));
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((48, 48), (40, 48), BehaviorState::SecurityEscortingOut);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        let effects = update_escort_out(agent, &roster, &env, &mut ctx);

        assert!(effects.terminated);
        assert_eq!(
            effects.commands.as_slice(),
            &[TargetCommand::Release {
                suspect: arrest.suspect
            }]
        );
        assert_eq!(agent.behavior, BehaviorState::Patrolling);

        for command in effects.commands {
            command.apply(&mut arrest.entities).unwrap();
        }
        let suspect = arrest.entities.agent(arrest.suspect.id).unwrap();
        assert_eq!(suspect.behavior, BehaviorState::Walking);
    }

    #[test]
    fn planner_choice_steers_toward_exit() {
        let mut map = TestMap::open(0..8, 0..4);
        map.exits.push(WorldPoint::new(240, 48, 0));
        let motion = TestMotion::default();
        let planner = FixedPlanner(Some(Direction::South));
        let env = Env::new(&map, &motion, &planner, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((48, 48), (40, 48), BehaviorState::SecurityEscortingOut);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        update_escort_out(agent, &roster, &env, &mut ctx);

        assert_eq!(agent.destination, Destination::tile_center(TileCoord::new(1, 2), 2));
    }

    #[test]
    fn without_planner_steps_straight_at_exit_when_edge_open() {
        let mut map = TestMap::open(0..8, 0..4);
        map.exits.push(WorldPoint::new(240, 48, 0));
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((48, 48), (40, 48), BehaviorState::SecurityEscortingOut);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        update_escort_out(agent, &roster, &env, &mut ctx);

        assert_eq!(agent.facing, Direction::East);
        assert_eq!(agent.destination, Destination::tile_center(TileCoord::new(2, 1), 2));
    }

    #[test]
    fn closed_edge_toward_exit_falls_back_to_wandering() {
        let mut map = TestMap::open(0..8, 0..4);
        map.insert(TileCoord::new(1, 1), PathTile::flat(EdgeSet::NORTH, 0));
        map.exits.push(WorldPoint::new(240, 48, 0));
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((48, 48), (40, 48), BehaviorState::SecurityEscortingOut);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        update_agent(agent, &roster, &env, &mut ctx);

        assert_eq!(agent.facing, Direction::North);
        assert_eq!(agent.destination, Destination::tile_center(TileCoord::new(1, 0), 2));
    }

    #[test]
    fn off_walkway_uses_surface_fallback() {
        let mut map = TestMap::default();
        map.exits.push(WorldPoint::new(240, 48, 0));
        let motion = TestMotion::default();
        let env = Env::new(&map, &motion, &NoPathHint, &NullEvents).as_park_env();
        let config = FollowConfig::default();
        let mut arrest = arrest((40, 40), (40, 48), BehaviorState::SecurityEscortingOut);

        let mut rng = ScriptedRng::new([0]);
        let roster = Roster::capture(&arrest.entities);
        let agent = arrest.entities.agent_mut(arrest.officer.id).unwrap();
        let mut ctx = SimulationContext::new(Tick(5), &mut rng, &config);
        update_escort_out(agent, &roster, &env, &mut ctx);

        assert_eq!(agent.destination, Destination::tile_center(TileCoord::new(1, 1), 2));
    }
}
