use tracing::{info, warn};

use super::special_director::SpecialDirector;
use super::spawner::EnemySpawner;
use crate::actors::Player;
use crate::content::{ScenarioDefinition, StageDefinition};
use crate::events::{CombatEvent, CombatEventBus};
use crate::hud::{HudState, StageHud};
use crate::rng::GameRng;

pub const COMMON_WAVE_DELAY_MS: (i32, i32) = (4000, 9000);
pub const SPECIAL_WAVE_DELAY_MS: (i32, i32) = (12_000, 20_000);
/// Stage commons are drawn from the stage range and divided by this before spawning.
const COMMON_COUNT_DIVISOR: f64 = 5.0;

pub const STAGE_FLASH_COLOR: u32 = 0x3b82f6;
pub const STAGE_FLASH_MS: f64 = 1200.0;
pub const COMPLETION_FLASH_COLOR: u32 = 0x22c55e;
pub const COMPLETION_FLASH_MS: f64 = 1500.0;
pub const COMPLETED_STAGE_ID: &str = "completed";
pub const COMPLETED_STAGE_LABEL: &str = "Rescue complete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    Inactive,
    Active(usize),
    Completed,
}

/// Everything a stage transition touches.
pub struct ScenarioContext<'a> {
    pub now_ms: f64,
    pub player: &'a mut Player,
    pub spawner: &'a mut EnemySpawner,
    pub specials: &'a mut SpecialDirector,
    pub rng: &'a mut GameRng,
    pub events: &'a mut CombatEventBus,
    pub hud: &'a mut HudState,
}

/// Time-gated stage sequencer. Declared stage triggers are not evaluated.
#[derive(Debug, Clone)]
pub struct ScenarioDirector {
    scenario: ScenarioDefinition,
    state: ScenarioState,
    stage_elapsed_ms: f64,
    next_common_at: f64,
    next_special_at: f64,
}

impl ScenarioDirector {
    pub fn new(scenario: ScenarioDefinition) -> Self {
        Self {
            scenario,
            state: ScenarioState::Inactive,
            stage_elapsed_ms: 0.0,
            next_common_at: 0.0,
            next_special_at: 0.0,
        }
    }

    pub fn start(&mut self, ctx: &mut ScenarioContext<'_>) {
        if self.state != ScenarioState::Inactive {
            return;
        }
        info!(scenario_id = %self.scenario.id, stages = self.scenario.stages.len(), "scenario_started");
        self.advance_stage(ctx);
    }

    pub fn update(&mut self, delta_ms: f32, ctx: &mut ScenarioContext<'_>) {
        let ScenarioState::Active(index) = self.state else {
            return;
        };
        let Some(duration_ms) = self.scenario.stages.get(index).map(|stage| stage.duration_ms)
        else {
            return;
        };

        self.stage_elapsed_ms += f64::from(delta_ms);
        if self.stage_elapsed_ms >= duration_ms {
            self.advance_stage(ctx);
            return;
        }

        if self.stage_elapsed_ms >= self.next_common_at {
            self.spawn_commons(index, ctx);
            self.schedule_next_common(ctx.rng);
        }
        if self.stage_elapsed_ms >= self.next_special_at {
            self.spawn_specials(index, ctx);
            self.schedule_next_special(index, ctx.rng);
        }
    }

    /// Moves to the next stage, or to the terminal completed state after the last one.
    pub fn advance_stage(&mut self, ctx: &mut ScenarioContext<'_>) {
        let index = match self.state {
            ScenarioState::Inactive => 0,
            ScenarioState::Active(index) => index + 1,
            ScenarioState::Completed => return,
        };
        self.stage_elapsed_ms = 0.0;

        let Some(stage) = self.scenario.stages.get(index) else {
            self.complete(ctx);
            return;
        };
        self.state = ScenarioState::Active(index);

        ctx.hud.set_stage(StageHud {
            id: stage.id.clone(),
            label: stage.label.clone(),
            duration_ms: stage.duration_ms,
            started_at_ms: ctx.now_ms,
        });
        ctx.hud.flash(STAGE_FLASH_COLOR, STAGE_FLASH_MS, stage.label.clone());
        ctx.events.emit(CombatEvent::StageStarted { stage_index: index });
        info!(
            stage_id = %stage.id,
            stage_index = index,
            duration_ms = stage.duration_ms,
            "stage_started"
        );

        match self.scenario.node(&stage.node_id) {
            Some(node) => ctx.player.teleport(node.position),
            None => warn!(stage_id = %stage.id, node_id = %stage.node_id, "stage_node_missing"),
        }
        ctx.spawner.start(ctx.now_ms);

        self.spawn_commons(index, ctx);
        self.spawn_specials(index, ctx);
        self.schedule_next_common(ctx.rng);
        self.schedule_next_special(index, ctx.rng);
    }

    fn complete(&mut self, ctx: &mut ScenarioContext<'_>) {
        self.state = ScenarioState::Completed;
        ctx.hud.set_stage(StageHud {
            id: COMPLETED_STAGE_ID.to_string(),
            label: COMPLETED_STAGE_LABEL.to_string(),
            duration_ms: 0.0,
            started_at_ms: ctx.now_ms,
        });
        ctx.hud.flash(COMPLETION_FLASH_COLOR, COMPLETION_FLASH_MS, COMPLETED_STAGE_LABEL);
        ctx.events.emit(CombatEvent::ScenarioCompleted);
        info!(scenario_id = %self.scenario.id, "scenario_completed");
    }

    fn spawn_commons(&self, index: usize, ctx: &mut ScenarioContext<'_>) {
        let Some(stage) = self.scenario.stages.get(index) else {
            return;
        };
        let [low, high] = stage.common_range;
        let drawn = ctx.rng.int_between(
            i32::try_from(low).unwrap_or(i32::MAX),
            i32::try_from(high).unwrap_or(i32::MAX),
        );
        let count = (f64::from(drawn) / COMMON_COUNT_DIVISOR).round().max(1.0) as u32;
        ctx.spawner.force_spawn(count, ctx.player.position, ctx.rng);
    }

    fn spawn_specials(&self, index: usize, ctx: &mut ScenarioContext<'_>) {
        let Some(stage) = self.scenario.stages.get(index) else {
            return;
        };
        for kind in stage.summoned_specials() {
            ctx.specials
                .spawn_now(kind, None, ctx.player.position, ctx.now_ms, ctx.rng);
        }
    }

    fn schedule_next_common(&mut self, rng: &mut GameRng) {
        let (low, high) = COMMON_WAVE_DELAY_MS;
        self.next_common_at = self.stage_elapsed_ms + f64::from(rng.int_between(low, high));
    }

    fn schedule_next_special(&mut self, index: usize, rng: &mut GameRng) {
        let Some(stage) = self.scenario.stages.get(index) else {
            return;
        };
        if stage.special_combos.is_empty() {
            self.next_special_at = self.stage_elapsed_ms + stage.duration_ms + 1.0;
            return;
        }
        let (low, high) = SPECIAL_WAVE_DELAY_MS;
        self.next_special_at = self.stage_elapsed_ms + f64::from(rng.int_between(low, high));
    }

    pub fn state(&self) -> ScenarioState {
        self.state
    }

    pub fn stage_index(&self) -> Option<usize> {
        match self.state {
            ScenarioState::Active(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_stage(&self) -> Option<&StageDefinition> {
        self.stage_index()
            .and_then(|index| self.scenario.stages.get(index))
    }

    pub fn is_completed(&self) -> bool {
        self.state == ScenarioState::Completed
    }

    pub fn stage_elapsed_ms(&self) -> f64 {
        self.stage_elapsed_ms
    }

    pub fn next_common_at(&self) -> f64 {
        self.next_common_at
    }

    pub fn next_special_at(&self) -> f64 {
        self.next_special_at
    }

    pub fn scenario(&self) -> &ScenarioDefinition {
        &self.scenario
    }
}
