use engine::{InputAction, InputSnapshot, LoopConfig, Scene, Vec2};
use survival::app::{run_demo, scripted_input};
use survival::content::{
    builtin_special_roster, ContentBundle, MapNode, ScenarioDefinition, StageDefinition,
    StageTrigger,
};
use survival::director::{ScenarioState, SPECIAL_POOL_CAPACITY};
use survival::hud::MAX_PENDING_FLASHES;
use survival::{GameScene, SceneConfig};

const TICK_MS: f32 = 1000.0 / 60.0;

fn builtin_scene(seed: u64) -> GameScene {
    GameScene::new(
        SceneConfig {
            seed,
            ..SceneConfig::default()
        },
        ContentBundle::builtin().expect("builtin content"),
    )
}

fn short_scenario() -> ContentBundle {
    let stage = |id: &str, node_id: &str| StageDefinition {
        id: id.to_string(),
        label: id.to_string(),
        node_id: node_id.to_string(),
        duration_ms: 1000.0,
        description: String::new(),
        trigger: StageTrigger::Time,
        special_combos: Vec::new(),
        common_range: [0, 5],
    };
    let scenario = ScenarioDefinition {
        id: "drill".to_string(),
        name: "Drill".to_string(),
        nodes: vec![
            MapNode {
                id: "start".to_string(),
                label: "Start".to_string(),
                position: Vec2::new(0.0, 0.0),
                radius: 100.0,
            },
            MapNode {
                id: "exit".to_string(),
                label: "Exit".to_string(),
                position: Vec2::new(400.0, 0.0),
                radius: 100.0,
            },
        ],
        stages: vec![stage("warmup", "start"), stage("run", "exit")],
    };
    ContentBundle::new(scenario, builtin_special_roster().expect("roster")).expect("valid drill")
}

#[test]
fn same_seed_replays_identically() {
    let config = LoopConfig::default();
    let mut first = builtin_scene(7);
    let mut second = builtin_scene(7);

    let first_report = run_demo(&config, &mut first, 20);
    let second_report = run_demo(&config, &mut second, 20);

    assert_eq!(first_report, second_report);
    assert_eq!(first_report.ticks, 20 * 60);
    assert!(first_report.shots_fired > 0);
}

#[test]
fn first_stage_hands_over_exactly_at_its_duration() {
    let mut scene = builtin_scene(3);
    scene.load();
    let idle = InputSnapshot::empty();

    scene.update(29_999.0, &idle);
    assert_eq!(scene.hud().stage_id(), Some("stage-safehouse"));
    assert_eq!(scene.scenario().stage_index(), Some(0));

    scene.update(1.0, &idle);
    assert_eq!(scene.hud().stage_id(), Some("stage-corridor"));
    assert_eq!(scene.scenario().stage_index(), Some(1));
    assert_eq!(scene.player().position, Vec2::new(-200.0, 80.0));
}

#[test]
fn pools_stay_within_capacity_under_scripted_play() {
    let mut scene = builtin_scene(11);
    scene.load();
    let pool_size = scene.spawner().config().pool_size;

    for tick in 0..(150 * 60) {
        scene.update(TICK_MS, &scripted_input(tick));
        assert!(scene.spawner().active_count() <= pool_size);
        assert!(scene.spawner().hostiles().len() <= pool_size);
        assert!(scene.special_director().active_count() <= SPECIAL_POOL_CAPACITY);
        assert!(scene.projectiles().active_count() <= scene.projectiles().capacity());
        assert!(scene.hud().pending_flashes().len() <= MAX_PENDING_FLASHES);
    }
    let lifetime = scene.events().lifetime_counts();
    assert_eq!(lifetime.throwable_detonated, 2);
    assert_eq!(lifetime.area_slow, 1);
    assert!(scene.scenario().stage_index().is_some_and(|index| index >= 1));
}

#[test]
fn short_scenario_completes_once_with_monotonic_stages() {
    let mut scene = GameScene::new(SceneConfig::default(), short_scenario());
    scene.load();

    let mut last_index = 0;
    for _ in 0..(5 * 60) {
        scene.update(TICK_MS, &InputSnapshot::empty());
        if let Some(index) = scene.scenario().stage_index() {
            assert!(index >= last_index);
            last_index = index;
        }
    }

    assert_eq!(scene.scenario().state(), ScenarioState::Completed);
    assert_eq!(scene.hud().stage_id(), Some("completed"));
    let lifetime = scene.events().lifetime_counts();
    assert_eq!(lifetime.stage_started, 2);
    assert_eq!(lifetime.scenario_completed, 1);
    assert!(scene
        .hud()
        .pending_flashes()
        .iter()
        .any(|flash| flash.label == "Rescue complete"));
}

#[test]
fn paused_scene_does_not_move() {
    let mut scene = builtin_scene(5);
    scene.load();
    for _ in 0..30 {
        scene.update(TICK_MS, &InputSnapshot::empty());
    }

    scene.update(
        TICK_MS,
        &InputSnapshot::empty().with_action_pressed(InputAction::TogglePause, true),
    );
    let frozen_at = scene.now_ms();
    let positions: Vec<Vec2> = scene
        .spawner()
        .hostiles()
        .iter_active()
        .map(|(_, infected)| infected.position)
        .collect();

    for tick in 0..120 {
        scene.update(TICK_MS, &scripted_input(tick));
    }

    assert_eq!(scene.now_ms(), frozen_at);
    let after: Vec<Vec2> = scene
        .spawner()
        .hostiles()
        .iter_active()
        .map(|(_, infected)| infected.position)
        .collect();
    assert_eq!(positions, after);
}

#[test]
fn demo_report_serializes_to_json() {
    let mut scene = builtin_scene(1);
    let report = run_demo(&LoopConfig::default(), &mut scene, 2);
    let json = serde_json::to_value(&report).expect("json");
    assert_eq!(json["ticks"], 120);
    assert_eq!(json["stage_id"], "stage-safehouse");
}
