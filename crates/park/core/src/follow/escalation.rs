use super::{Direction, FollowError, SlideFailure};
use crate::context::SimulationContext;
use crate::env::ParkEnv;
use crate::state::{AgentState, EntityRef, PursuitMode, WorldPoint};

/// Recovers from a failed slide check by asking the planner for a hint.
///
/// With a hint the agent takes one tile step that way and drops to assisted
/// pursuit. Without one the target is lost.
pub fn escalate(
    agent: &mut AgentState,
    target: EntityRef,
    target_position: WorldPoint,
    reason: SlideFailure,
    env: &ParkEnv<'_>,
    ctx: &mut SimulationContext<'_>,
) -> Result<Direction, FollowError> {
    let unreachable = FollowError::Unreachable {
        target: target_position,
        reason,
        context: ctx.error_context(agent),
    };
    tracing::trace!(agent = %agent.id, %unreachable, "slide check failed");

    let hint = env.planner().find_path_hint(
        agent.position,
        target_position,
        ctx.config.hint_search_depth,
    );

    match hint {
        Some(direction) => {
            let next_tile = direction.step(agent.position.tile());
            env.motion()
                .move_one_tile_best_effort(agent, next_tile, direction);
            agent.follow.mode = PursuitMode::Assisted;
            tracing::debug!(agent = %agent.id, %direction, "following by planner hint");
            Ok(direction)
        }
        None => Err(FollowError::TargetLost {
            target,
            context: ctx.error_context(agent),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FollowConfig;
    use crate::env::{Env, NullEvents, PcgRng};
    use crate::state::{AgentKind, Destination, EntityId, Tick, TileCoord};
    use crate::testing::{FixedPlanner, TestMap, TestMotion};

    fn agent() -> AgentState {
        AgentState::new(EntityId(1), AgentKind::Guest, WorldPoint::new(48, 48, 0))
    }

    #[test]
    fn hint_moves_one_tile_and_switches_to_assisted() {
        let map = TestMap::default();
        let motion = TestMotion::default();
        let planner = FixedPlanner(Some(Direction::South));
        let events = NullEvents;
        let env = Env::new(&map, &motion, &planner, &events).as_park_env();
        let config = FollowConfig::default();
        let mut rng = PcgRng::new(1);
        let mut ctx = SimulationContext::new(Tick(1), &mut rng, &config);

        let mut agent = agent();
        let target = EntityRef::new(EntityId(2), 0);
        let result = escalate(
            &mut agent,
            target,
            WorldPoint::new(48, 200, 0),
            SlideFailure::Blocked {
                tile: TileCoord::new(1, 1),
            },
            &env,
            &mut ctx,
        );

        assert_eq!(result, Ok(Direction::South));
        assert_eq!(agent.follow.mode, PursuitMode::Assisted);
        assert_eq!(agent.destination, Destination::tile_center(TileCoord::new(1, 2), 2));
    }

    #[test]
    fn missing_hint_loses_target() {
        let map = TestMap::default();
        let motion = TestMotion::default();
        let planner = crate::env::NoPathHint;
        let events = NullEvents;
        let env = Env::new(&map, &motion, &planner, &events).as_park_env();
        let config = FollowConfig::default();
        let mut rng = PcgRng::new(1);
        let mut ctx = SimulationContext::new(Tick(1), &mut rng, &config);

        let mut agent = agent();
        let before = agent.clone();
        let target = EntityRef::new(EntityId(2), 0);
        let result = escalate(
            &mut agent,
            target,
            WorldPoint::new(48, 200, 0),
            SlideFailure::NoPath {
                tile: TileCoord::new(1, 1),
            },
            &env,
            &mut ctx,
        );

        assert!(matches!(result, Err(FollowError::TargetLost { .. })));
        assert_eq!(agent, before);
    }
}
