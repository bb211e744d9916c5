use engine::{InputAction, InputSnapshot, Scene, SceneClock, SceneCommand, Vec2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::actors::{InfectedConfig, Player, PlayerConfig};
use crate::combat::{DamageZone, ProjectilePool, ThrowableKind, ThrowableSystem, ZonePulse};
use crate::content::{AbilityParams, ContentBundle, SpecialKind};
use crate::director::{
    EnemySpawner, ScenarioContext, ScenarioDirector, SpawnConfig, SpecialDirector,
};
use crate::events::CombatEventBus;
use crate::hud::HudState;
use crate::rng::{GameRng, DEFAULT_SEED};

mod actions;
mod combat;
#[cfg(test)]
mod tests;

pub use actions::{HEAL_FLASH_COLOR, INFECTED_MODE_FLASH_COLOR, SURVIVOR_MODE_FLASH_COLOR};
pub use combat::POUNCE_CONTACT_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub heal_items: u32,
    /// Kind launched by the HUD throw shoot mode.
    pub equipped_throwable: ThrowableKind,
    pub molotovs: u32,
    pub shocks: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            heal_items: 1,
            equipped_throwable: ThrowableKind::Molotov,
            molotovs: 1,
            shocks: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShoveConfig {
    pub cooldown_ms: f64,
    pub radius: f32,
    pub knockback_speed: f32,
    pub impulse_ms: f64,
}

impl Default for ShoveConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 900.0,
            radius: 140.0,
            knockback_speed: 420.0,
            impulse_ms: 150.0,
        }
    }
}

/// Every tunable of a scene, with defaults matching the shipped content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub seed: u64,
    pub player: PlayerConfig,
    pub infected: InfectedConfig,
    pub spawn: SpawnConfig,
    pub inventory: InventoryConfig,
    pub shove: ShoveConfig,
    pub heal_amount: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            player: PlayerConfig::default(),
            infected: InfectedConfig::default(),
            spawn: SpawnConfig::default(),
            inventory: InventoryConfig::default(),
            shove: ShoveConfig::default(),
            heal_amount: 35.0,
        }
    }
}

/// Fixed order of the per-tick systems.
///
/// Stage timers run first, then the hostile directors, then player actions, so combat
/// resolution sees one consistent set of positions and payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneSystemId {
    Scenario,
    HostileAi,
    PlayerIntent,
    Throwables,
    ProjectileExpiry,
    CombatResolution,
    Movement,
    Cleanup,
}

pub const SCENE_SYSTEM_ORDER: [SceneSystemId; 8] = [
    SceneSystemId::Scenario,
    SceneSystemId::HostileAi,
    SceneSystemId::PlayerIntent,
    SceneSystemId::Throwables,
    SceneSystemId::ProjectileExpiry,
    SceneSystemId::CombatResolution,
    SceneSystemId::Movement,
    SceneSystemId::Cleanup,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inventory {
    pub heal_items: u32,
    pub molotovs: u32,
    pub shocks: u32,
}

impl Inventory {
    pub fn throwables(&self, kind: ThrowableKind) -> u32 {
        match kind {
            ThrowableKind::Molotov => self.molotovs,
            ThrowableKind::Shock => self.shocks,
        }
    }

    fn throwables_mut(&mut self, kind: ThrowableKind) -> &mut u32 {
        match kind {
            ThrowableKind::Molotov => &mut self.molotovs,
            ThrowableKind::Shock => &mut self.shocks,
        }
    }

    /// Uses up one throwable of `kind`; false when none are left.
    pub(crate) fn take_throwable(&mut self, kind: ThrowableKind) -> bool {
        let count = self.throwables_mut(kind);
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }
}

/// Damage-over-time from a ride, paid out in fixed increments.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DamageTicker {
    per_tick: f32,
    remaining: u32,
    interval_ms: f64,
    next_at: f64,
}

/// The survival combat scene: owns every subsystem and runs them in `SCENE_SYSTEM_ORDER`.
pub struct GameScene {
    config: SceneConfig,
    content: ContentBundle,
    clock: SceneClock,
    rng: GameRng,
    player: Player,
    projectiles: ProjectilePool,
    throwables: ThrowableSystem,
    spawner: EnemySpawner,
    specials: SpecialDirector,
    scenario: ScenarioDirector,
    events: CombatEventBus,
    hud: HudState,
    pending_pulses: Vec<ZonePulse>,
    hazard_zones: Vec<DamageZone>,
    ride_tickers: Vec<DamageTicker>,
    inventory: Inventory,
    aim_assist: Vec2,
    last_shove_at: Option<f64>,
    hunter_pounce_ready_at: f64,
    hunter_ability: Option<AbilityParams>,
    kills: u32,
    loaded: bool,
    last_tick_order: Vec<SceneSystemId>,
}

impl GameScene {
    pub fn new(config: SceneConfig, content: ContentBundle) -> Self {
        let hunter_ability = content
            .specials
            .get(SpecialKind::Hunter)
            .map(|definition| definition.ability.params);
        Self {
            clock: SceneClock::new(),
            rng: GameRng::new(config.seed),
            player: Player::new(config.player.clone()),
            projectiles: ProjectilePool::default(),
            throwables: ThrowableSystem::default(),
            spawner: EnemySpawner::new(config.infected, config.spawn),
            specials: SpecialDirector::new(&content.specials),
            scenario: ScenarioDirector::new(content.scenario.clone()),
            events: CombatEventBus::default(),
            hud: HudState::default(),
            pending_pulses: Vec::new(),
            hazard_zones: Vec::new(),
            ride_tickers: Vec::new(),
            inventory: Inventory {
                heal_items: config.inventory.heal_items,
                molotovs: config.inventory.molotovs,
                shocks: config.inventory.shocks,
            },
            aim_assist: Vec2::ZERO,
            last_shove_at: None,
            hunter_pounce_ready_at: 0.0,
            hunter_ability,
            kills: 0,
            loaded: false,
            last_tick_order: Vec::with_capacity(SCENE_SYSTEM_ORDER.len()),
            config,
            content,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut HudState {
        &mut self.hud
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn spawner(&self) -> &EnemySpawner {
        &self.spawner
    }

    pub fn special_director(&self) -> &SpecialDirector {
        &self.specials
    }

    pub fn scenario(&self) -> &ScenarioDirector {
        &self.scenario
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn throwables(&self) -> &ThrowableSystem {
        &self.throwables
    }

    pub fn hazard_zones(&self) -> &[DamageZone] {
        &self.hazard_zones
    }

    pub fn events(&self) -> &CombatEventBus {
        &self.events
    }

    pub fn inventory(&self) -> Inventory {
        self.inventory
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn last_tick_order(&self) -> &[SceneSystemId] {
        &self.last_tick_order
    }

    fn scenario_context(&mut self) -> (&mut ScenarioDirector, ScenarioContext<'_>) {
        (
            &mut self.scenario,
            ScenarioContext {
                now_ms: self.clock.now_ms(),
                player: &mut self.player,
                spawner: &mut self.spawner,
                specials: &mut self.specials,
                rng: &mut self.rng,
                events: &mut self.events,
                hud: &mut self.hud,
            },
        )
    }

    fn toggle_pause(&mut self) {
        let paused = !self.clock.is_paused();
        self.clock.set_paused(paused);
        self.hud.paused = paused;
        info!(paused, now_ms = self.clock.now_ms(), "pause_toggled");
    }

    fn run_system(&mut self, system: SceneSystemId, fixed_dt_ms: f32, input: &InputSnapshot) {
        self.last_tick_order.push(system);
        let now_ms = self.clock.now_ms();
        match system {
            SceneSystemId::Scenario => {
                let (scenario, mut ctx) = self.scenario_context();
                scenario.update(fixed_dt_ms, &mut ctx);
            }
            SceneSystemId::PlayerIntent => self.apply_player_intents(input, now_ms),
            SceneSystemId::Throwables => {
                self.pending_pulses = self
                    .throwables
                    .update(fixed_dt_ms, now_ms, &mut self.events);
            }
            SceneSystemId::ProjectileExpiry => {
                self.projectiles.expire(now_ms);
            }
            SceneSystemId::HostileAi => {
                let target = self.player.position;
                self.spawner
                    .update(target, now_ms, &mut self.rng, &mut self.events);
                self.specials
                    .update(target, now_ms, &mut self.rng, &mut self.events);
            }
            SceneSystemId::CombatResolution => self.resolve_combat(fixed_dt_ms, now_ms),
            SceneSystemId::Movement => self.integrate_movement(fixed_dt_ms, now_ms),
            SceneSystemId::Cleanup => {
                self.events.finish_tick_rollover();
                self.sync_hud();
            }
        }
    }
}

impl Scene for GameScene {
    fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        self.hud.clear_messages();
        let (scenario, mut ctx) = self.scenario_context();
        scenario.start(&mut ctx);
        self.sync_hud();
        info!(
            seed = self.rng.seed(),
            scenario_id = %self.content.scenario.id,
            "game_scene_loaded"
        );
    }

    fn update(&mut self, fixed_dt_ms: f32, input: &InputSnapshot) -> SceneCommand {
        if input.is_pressed(InputAction::Quit) {
            return SceneCommand::Quit;
        }
        if input.is_pressed(InputAction::TogglePause) {
            self.toggle_pause();
        }
        if !self.clock.advance(fixed_dt_ms) {
            self.sync_hud();
            return SceneCommand::None;
        }

        self.last_tick_order.clear();
        for system in SCENE_SYSTEM_ORDER {
            self.run_system(system, fixed_dt_ms, input);
        }
        SceneCommand::None
    }

    fn unload(&mut self) {
        self.spawner.stop();
        self.specials.clear();
        self.hazard_zones.clear();
        self.ride_tickers.clear();
        info!(
            kills = self.kills,
            now_ms = self.clock.now_ms(),
            completed = self.scenario.is_completed(),
            "game_scene_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        let stage = self
            .hud
            .stage
            .as_ref()
            .map_or("-", |stage| stage.label.as_str());
        Some(format!(
            "{stage} | hp {:.0} | hostiles {} | specials {} | kills {}",
            self.player.health(),
            self.spawner.active_count(),
            self.specials.active_count(),
            self.kills
        ))
    }
}
