use std::io::Write;
use std::path::Path;

use park_core::{
    AgentKind, AgentState, BehaviorState, Direction, EntitiesState, EntityId, FollowConfig,
    ParkError, StaffRole, TargetCommand, Tick, TileCoord, WorldPoint,
};
use park_runtime::{BehaviorEvent, Event, GridMap, Scenario, ScenarioError, Simulation, Topic};

/// Officer (id 0) right behind a guest (id 1) on an open plaza.
const ARREST: &str = r#"(
    seed: 11,
    plazas: [(min: (x: 0, y: 0), max: (x: 9, y: 9))],
    exits: [(x: 16, y: 16, z: 0)],
    agents: [
        (
            name: "officer",
            kind: Staff(Security),
            position: (x: 140, y: 144, z: 0),
            start: Some(Chase(suspect: "guest")),
        ),
        (name: "guest", kind: Guest, position: (x: 150, y: 144, z: 0), facing: East),
    ],
)"#;

fn agent(simulation: &Simulation, id: u32) -> &AgentState {
    simulation.entities().agent(EntityId(id)).unwrap()
}

#[test]
fn chase_arrests_on_first_comfortable_tick() {
    let scenario = Scenario::from_ron(ARREST).unwrap();
    let mut simulation = Simulation::from_scenario(&scenario).unwrap();

    let report = simulation.step();

    assert!(matches!(
        report.commands.as_slice(),
        [TargetCommand::Arrest { .. }]
    ));
    let guest = agent(&simulation, 1);
    assert_eq!(guest.behavior, BehaviorState::EscortedBySecurity);
    assert!(guest.leaving_park);
    assert_eq!(guest.follow.target.map(|target| target.id), Some(EntityId(0)));

    let countdown = agent(&simulation, 0).follow.arrest_countdown;
    // Armed with 10..=59, then ticked once since tick 0 is a countdown tick.
    assert!((9..=58).contains(&countdown), "countdown {countdown}");
}

#[test]
fn arrest_countdown_hands_over_to_escort_out() {
    let scenario = Scenario::from_ron(ARREST).unwrap();
    let mut simulation = Simulation::from_scenario(&scenario).unwrap();

    let mut escorting_from = None;
    for _ in 0..700 {
        let tick = simulation.tick();
        simulation.step();
        if agent(&simulation, 0).behavior == BehaviorState::SecurityEscortingOut {
            escorting_from = Some(tick);
            break;
        }
    }

    let tick = escorting_from.expect("officer never started escorting");
    assert_eq!(tick.0 % 11, 0);
    assert_eq!(agent(&simulation, 0).follow.arrest_countdown, 1);
}

#[test]
fn escort_at_exit_releases_suspect() {
    let map = GridMap::open_plaza(TileCoord::new(0, 0), TileCoord::new(3, 3), 0)
        .and_then(|mut map| map.add_exit(WorldPoint::new(48, 48, 0)).map(|()| map))
        .unwrap();
    let mut entities = EntitiesState::new();
    let officer =
        entities.spawn_agent(AgentKind::Staff(StaffRole::Security), WorldPoint::new(60, 48, 0));
    let suspect = entities.spawn_agent(AgentKind::Guest, WorldPoint::new(70, 48, 0));
    {
        let agent = entities.agent_mut(officer.id).unwrap();
        agent.behavior = BehaviorState::SecurityEscortingOut;
        agent.follow.target = Some(suspect);
    }
    {
        let agent = entities.agent_mut(suspect.id).unwrap();
        agent.behavior = BehaviorState::EscortedBySecurity;
        agent.follow.target = Some(officer);
        agent.leaving_park = true;
    }

    let mut simulation = Simulation::new(map, entities, 5, FollowConfig::default());
    let report = simulation.step();

    assert_eq!(report.terminated, vec![officer.id]);
    assert_eq!(report.commands, vec![TargetCommand::Release { suspect }]);
    assert_eq!(agent(&simulation, 0).behavior, BehaviorState::Patrolling);
    let released = agent(&simulation, 1);
    assert_eq!(released.behavior, BehaviorState::Walking);
    assert_eq!(released.follow.target, None);
}

#[test]
fn staff_witness_loses_interest_after_three_countdown_ticks() {
    let scenario = Scenario::from_ron(
        r#"(
            seed: 3,
            plazas: [(min: (x: 0, y: 0), max: (x: 7, y: 7))],
            agents: [
                (
                    name: "handyman",
                    kind: Staff(Handyman),
                    position: (x: 48, y: 48, z: 0),
                    start: Some(Witness(target: "juggler")),
                    start_tick: 1,
                ),
                (name: "juggler", kind: Staff(Entertainer), position: (x: 120, y: 48, z: 0)),
            ],
        )"#,
    )
    .unwrap();
    let mut simulation = Simulation::from_scenario(&scenario).unwrap();
    let mut behavior = simulation.subscribe(Topic::Behavior).unwrap();

    simulation.run(40);

    let mut ended = Vec::new();
    while let Ok(event) = behavior.try_recv() {
        if let Event::Behavior(BehaviorEvent::Terminated { agent, tick }) = event {
            ended.push((agent, tick));
        }
    }
    assert_eq!(ended, vec![(EntityId(0), Tick(33))]);
    assert_eq!(agent(&simulation, 0).behavior, BehaviorState::Patrolling);
}

#[test]
fn same_seed_replays_identically() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/arrest.ron");
    let scenario = Scenario::load_from_file(&path).unwrap();

    let mut first = Simulation::from_scenario(&scenario).unwrap();
    let mut second = Simulation::from_scenario(&scenario).unwrap();
    let summary_a = first.run(300);
    let summary_b = second.run(300);

    assert_eq!(summary_a, summary_b);
    let agents_a: Vec<AgentState> = first.entities().agents().cloned().collect();
    let agents_b: Vec<AgentState> = second.entities().agents().cloned().collect();
    assert_eq!(agents_a, agents_b);
}

#[test]
fn scenario_loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ARREST.as_bytes()).unwrap();

    let scenario = Scenario::load_from_file(file.path()).unwrap();
    assert_eq!(scenario.seed, 11);
    assert_eq!(scenario.ticks, Scenario::DEFAULT_TICKS);
    assert_eq!(scenario.agents[1].facing, Direction::East);
    assert_eq!(scenario.agents[1].kind, AgentKind::Guest);
}

#[test]
fn missing_scenario_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = Scenario::load_from_file(&dir.path().join("absent.ron")).unwrap_err();
    assert!(matches!(error, ScenarioError::Read { .. }));
    assert_eq!(error.error_code(), "SCENARIO_READ");
}

#[tokio::test]
async fn behavior_topic_reports_the_arrest() {
    let scenario = Scenario::from_ron(ARREST).unwrap();
    let mut simulation = Simulation::from_scenario(&scenario).unwrap();
    let mut behavior = simulation.subscribe(Topic::Behavior).unwrap();

    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Ok(event) = behavior.recv().await {
            events.push(event);
        }
        events
    });

    simulation.run(5);
    drop(simulation);

    let events = collector.await.unwrap();
    assert!(matches!(
        events.first(),
        Some(Event::Behavior(BehaviorEvent::Started {
            behavior: BehaviorState::SecurityChasing,
            ..
        }))
    ));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Behavior(BehaviorEvent::CommandApplied {
            command: TargetCommand::Arrest { .. },
            tick: Tick(0),
        })
    )));
}
