use std::process::ExitCode;

use engine::{run_headless, InputAction, InputSnapshot, LoopConfig, Scene, Vec2};
use serde::Serialize;
use tracing::{debug, error, info};

use super::bootstrap::{build_app, init_tracing, DemoSettings};
use crate::scene::GameScene;

const SHOVE_EVERY_TICKS: u64 = 300;
const RELOAD_EVERY_TICKS: u64 = 720;
const THROW_AT_TICK: u64 = 900;
const SHOCK_AT_TICK: u64 = 1200;
const HEAL_AT_TICK: u64 = 1800;
const WEAPON_SWAP_EVERY_TICKS: u64 = 2400;

/// Outcome of one scripted headless session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub frames: u32,
    pub ticks: u64,
    pub scene_time_ms: f64,
    pub kills: u32,
    pub player_health: f32,
    pub stage_id: Option<String>,
    pub scenario_completed: bool,
    pub shots_fired: u32,
    pub hostiles_active: usize,
    pub specials_active: usize,
}

/// Deterministic stand-in for a human: circles, sweeps the aim stick, and uses every action.
pub fn scripted_input(tick: u64) -> InputSnapshot {
    let t = tick as f32;
    let mut input = InputSnapshot::empty()
        .with_move_vector(Vec2::from_angle(t * 0.01).scaled(0.6))
        .with_aim_vector(Vec2::from_angle(t * 0.05));

    let actions = [
        (InputAction::Shove, tick > 0 && tick % SHOVE_EVERY_TICKS == 0),
        (InputAction::Reload, tick > 0 && tick % RELOAD_EVERY_TICKS == 0),
        (InputAction::UseThrowable, tick == THROW_AT_TICK),
        (InputAction::UseShockThrowable, tick == SHOCK_AT_TICK),
        (InputAction::UseHealItem, tick == HEAL_AT_TICK),
        (InputAction::Fire, tick == HEAL_AT_TICK + 1),
        (
            InputAction::SwitchWeapon,
            tick > 0 && tick % WEAPON_SWAP_EVERY_TICKS == 0,
        ),
    ];
    for (action, pressed) in actions {
        if pressed {
            input = input.with_action_pressed(action, true);
        }
    }
    input
}

/// Runs `scene` headless for `seconds` of simulated time at the configured tick rate.
pub fn run_demo(config: &LoopConfig, scene: &mut GameScene, seconds: u32) -> DemoReport {
    let frames = seconds.saturating_mul(config.target_tps.max(1));
    let summary = run_headless(config, scene, frames, scripted_input);

    let lifetime = scene.events().lifetime_counts();
    DemoReport {
        frames: summary.frames,
        ticks: summary.ticks,
        scene_time_ms: scene.now_ms(),
        kills: scene.kills(),
        player_health: scene.player().health(),
        stage_id: scene.hud().stage_id().map(str::to_string),
        scenario_completed: scene.scenario().is_completed(),
        shots_fired: lifetime.projectile_fired,
        hostiles_active: scene.spawner().active_count(),
        specials_active: scene.special_director().active_count(),
    }
}

pub fn run() -> ExitCode {
    init_tracing();
    info!("=== Survival Startup ===");

    let settings = DemoSettings::from_env();
    let mut app = match build_app(settings) {
        Ok(app) => app,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let report = run_demo(&app.config, &mut app.scene, app.settings.seconds);
    info!(
        ticks = report.ticks,
        scene_time_ms = report.scene_time_ms,
        kills = report.kills,
        player_health = report.player_health,
        stage = report.stage_id.as_deref().unwrap_or("-"),
        completed = report.scenario_completed,
        shots_fired = report.shots_fired,
        "demo_finished"
    );
    match serde_json::to_string(app.scene.hud()) {
        Ok(hud) => debug!(hud = %hud, "final_hud"),
        Err(err) => debug!(error = %err, "final_hud_unserializable"),
    }
    if let Some(title) = app.scene.debug_title() {
        info!(title = %title, "final_state");
    }

    ExitCode::SUCCESS
}
