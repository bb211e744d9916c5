use engine::{InputAction, InputSnapshot, Vec2};
use tracing::{debug, info};

use super::{GameScene, ShoveConfig};
use crate::actors::Faction;
use crate::combat::{FireContext, ThrowableKind};
use crate::hud::{InventoryCounts, ShootMode, ShoveCooldown};
use crate::rng::GameRng;

pub const INFECTED_MODE_FLASH_COLOR: u32 = 0x22c55e;
pub const SURVIVOR_MODE_FLASH_COLOR: u32 = 0x38bdf8;
pub const HEAL_FLASH_COLOR: u32 = 0x39ff8c;
const FACTION_FLASH_MS: f64 = 900.0;
const HEAL_FLASH_MS: f64 = 150.0;
const COOLDOWN_FLASH_COLOR: u32 = 0xf97316;
const COOLDOWN_FLASH_MS: f64 = 600.0;

const AIM_SMOOTHING: f32 = 0.25;
const AIM_DECAY: f32 = 0.85;
const AIM_INPUT_DEADZONE_SQUARED: f32 = 0.0004;
const DIRECTION_DEADZONE_SQUARED: f32 = 0.01;
const AUTO_FIRE_THRESHOLD: f32 = 0.2;
const DEFAULT_POUNCE_SPEED: f32 = 720.0;
const DEFAULT_POUNCE_DURATION_MS: f64 = 1800.0;

/// Raw stick direction for one-off actions; falls back to facing right.
fn input_direction(raw_aim: Vec2) -> Vec2 {
    if raw_aim.length_squared() > DIRECTION_DEADZONE_SQUARED {
        raw_aim.normalized()
    } else {
        Vec2::new(1.0, 0.0)
    }
}

fn shove_velocity(target: Vec2, origin: Vec2, shove: &ShoveConfig, rng: &mut GameRng) -> Option<Vec2> {
    if target.distance(origin) > shove.radius {
        return None;
    }
    let mut direction = target - origin;
    if direction.length_squared() == 0.0 {
        direction = Vec2::new(rng.float_between(-0.5, 0.5), rng.float_between(-0.5, 0.5));
    }
    if direction.length_squared() == 0.0 {
        direction = Vec2::new(1.0, 0.0);
    }
    Some(direction.normalized().scaled(shove.knockback_speed))
}

impl GameScene {
    pub(super) fn apply_player_intents(&mut self, input: &InputSnapshot, now_ms: f64) {
        self.player.update_movement(input.move_vector());
        let raw_aim = input.aim_vector();
        self.aim_assist = if raw_aim.length_squared() > AIM_INPUT_DEADZONE_SQUARED {
            self.aim_assist.lerp(raw_aim, AIM_SMOOTHING)
        } else {
            self.aim_assist * AIM_DECAY
        };
        self.player.update_aim(self.aim_assist);

        if input.is_pressed(InputAction::ToggleFaction) {
            self.toggle_faction();
        }

        let survivor = self.player.faction() == Faction::Survivor;
        if survivor {
            if input.is_pressed(InputAction::SwitchWeapon) {
                let slot = self.player.weapons.cycle_weapon();
                debug!(?slot, "weapon_switched");
            }
            if input.is_pressed(InputAction::Reload) && self.player.weapons.start_active_reload(now_ms)
            {
                self.hud.push_message("Reloading");
            }
            if input.is_pressed(InputAction::Shove) && !self.perform_shove(now_ms) {
                self.hud.push_message("Shove on cooldown");
            }
            if input.is_pressed(InputAction::UseHealItem) {
                self.arm_shoot_mode(ShootMode::HealSelf);
            }
            if input.is_pressed(InputAction::UseThrowable) {
                self.throw_throwable(ThrowableKind::Molotov, raw_aim, now_ms);
            }
            if input.is_pressed(InputAction::UseShockThrowable) {
                self.throw_throwable(ThrowableKind::Shock, raw_aim, now_ms);
            }
            if input.is_pressed(InputAction::Fire) {
                self.execute_shoot_mode(raw_aim, now_ms);
            }
        } else if input.is_pressed(InputAction::SpecialAbility) {
            self.try_hunter_pounce(raw_aim, now_ms);
        }

        self.player.update(now_ms);
        if survivor && self.aim_assist.length() > AUTO_FIRE_THRESHOLD {
            self.fire_active_weapon(now_ms);
        }
        self.player.weapons.update(now_ms);
    }

    /// Selects what the next Fire press does. Selecting the armed mode again returns to `Fire`.
    ///
    /// The throw mode launches the equipped throwable; the throw actions bypass it.
    pub fn arm_shoot_mode(&mut self, mode: ShootMode) {
        let current = self.hud.shoot_mode;
        if mode == ShootMode::Fire || mode == current {
            self.hud.shoot_mode = ShootMode::Fire;
            if current != ShootMode::Fire {
                self.hud.push_message("Fire mode restored");
            }
            return;
        }
        let (available, armed, exhausted) = match mode {
            ShootMode::HealSelf => (
                self.inventory.heal_items > 0,
                "Heal mode armed",
                "No medical item available",
            ),
            _ => (
                self.inventory
                    .throwables(self.config.inventory.equipped_throwable)
                    > 0,
                "Throw mode armed",
                "Throwables depleted",
            ),
        };
        if !available {
            self.hud.push_message(exhausted);
            return;
        }
        self.hud.shoot_mode = mode;
        self.hud.push_message(armed);
    }

    fn execute_shoot_mode(&mut self, raw_aim: Vec2, now_ms: f64) {
        match self.hud.shoot_mode {
            ShootMode::HealSelf => {
                self.heal_self();
                self.hud.shoot_mode = ShootMode::Fire;
            }
            ShootMode::Throw => {
                self.throw_throwable(self.config.inventory.equipped_throwable, raw_aim, now_ms);
                self.hud.shoot_mode = ShootMode::Fire;
            }
            ShootMode::Fire => {
                if !self.fire_active_weapon(now_ms) {
                    self.hud.push_message("Weapon not ready or reloading");
                }
            }
        }
    }

    fn fire_active_weapon(&mut self, now_ms: f64) -> bool {
        let origin = self.player.position;
        let direction = self.player.aim_vector();
        let mut ctx = FireContext {
            now_ms,
            rng: &mut self.rng,
            projectiles: &mut self.projectiles,
            events: &mut self.events,
        };
        self.player
            .weapons
            .try_fire(&mut ctx, origin, direction, &self.config.player.id)
    }

    fn heal_self(&mut self) {
        if self.inventory.heal_items == 0 {
            self.hud.push_message("No medical item available");
            return;
        }
        if self.player.health() >= self.player.max_health() {
            self.hud.push_message("Health already full");
            return;
        }
        let gained = self.player.heal(self.config.heal_amount);
        self.inventory.heal_items -= 1;
        self.hud.flash(HEAL_FLASH_COLOR, HEAL_FLASH_MS, "");
        self.hud.push_message(format!("Healed +{}", gained.round()));
        info!(gained, health = self.player.health(), "player_healed");
    }

    /// Launches one `kind` along the aim stick. The item is used up only when it actually flies.
    fn throw_throwable(&mut self, kind: ThrowableKind, raw_aim: Vec2, now_ms: f64) -> bool {
        if self.inventory.throwables(kind) == 0 {
            self.hud.push_message("Throwables depleted");
            return false;
        }
        let direction = input_direction(raw_aim);
        if !self
            .throwables
            .throw(kind, self.player.position, direction, now_ms)
        {
            return false;
        }
        self.inventory.take_throwable(kind);
        self.hud
            .push_message(format!("{} thrown", kind.display_name()));
        info!(
            kind = kind.as_str(),
            remaining = self.inventory.throwables(kind),
            "throwable_thrown"
        );
        true
    }

    /// Knocks back every hostile near the player. Returns false while on cooldown.
    fn perform_shove(&mut self, now_ms: f64) -> bool {
        let shove = self.config.shove;
        if let Some(last) = self.last_shove_at {
            if now_ms - last < shove.cooldown_ms {
                return false;
            }
        }
        self.last_shove_at = Some(now_ms);

        let origin = self.player.position;
        let mut pushed = 0u32;
        for (_, infected) in self.spawner.hostiles_mut().iter_active_mut() {
            if let Some(velocity) = shove_velocity(infected.position, origin, &shove, &mut self.rng) {
                infected.apply_impulse(velocity, now_ms, shove.impulse_ms);
                pushed += 1;
            }
        }
        for (_, special) in self.specials.specials_mut().iter_active_mut() {
            let position = special.body.position;
            if let Some(velocity) = shove_velocity(position, origin, &shove, &mut self.rng) {
                special.body.apply_impulse(velocity, now_ms, shove.impulse_ms);
                pushed += 1;
            }
        }
        debug!(pushed, "shove_performed");
        self.hud.push_message("Shove knocked back nearby targets");
        true
    }

    fn toggle_faction(&mut self) {
        let faction = self.player.faction().toggled();
        self.player.set_faction(faction);
        let (color, label) = match faction {
            Faction::Infected => (INFECTED_MODE_FLASH_COLOR, "Infected mode"),
            Faction::Survivor => (SURVIVOR_MODE_FLASH_COLOR, "Survivor mode"),
        };
        self.hud.flash(color, FACTION_FLASH_MS, label);
        self.hud.push_message(label);
        info!(faction = faction.as_str(), "faction_toggled");
    }

    fn try_hunter_pounce(&mut self, raw_aim: Vec2, now_ms: f64) {
        let Some(ability) = self.hunter_ability else {
            debug!("hunter_pounce_unavailable");
            return;
        };
        if now_ms < self.hunter_pounce_ready_at {
            let seconds = ((self.hunter_pounce_ready_at - now_ms) / 1000.0).ceil();
            let label = format!("Cooling down {seconds}s");
            self.hud.flash(COOLDOWN_FLASH_COLOR, COOLDOWN_FLASH_MS, label.clone());
            self.hud.push_message(label);
            return;
        }
        let speed = ability.special_speed.unwrap_or(DEFAULT_POUNCE_SPEED);
        let duration_ms = ability.duration_ms.unwrap_or(DEFAULT_POUNCE_DURATION_MS);
        if self
            .player
            .start_hunter_pounce(speed, duration_ms, input_direction(raw_aim), now_ms)
        {
            self.hunter_pounce_ready_at = now_ms + ability.cooldown_ms;
            info!(speed, duration_ms, "hunter_pounce_started");
        }
    }

    /// Rebuilds the HUD projection; an armed mode that can no longer run falls back to `Fire`.
    pub(super) fn sync_hud(&mut self) {
        let now_ms = self.clock.now_ms();
        let survivor = self.player.faction() == Faction::Survivor;
        let weapons = &self.player.weapons;
        let active = weapons.active_weapon();
        let fire_ready = survivor && !active.is_reloading() && active.ammo_in_magazine() > 0;

        self.hud.weapon = weapons.weapon_summary();
        self.hud.reload = weapons.reload_progress(weapons.active_slot(), now_ms);

        let cooldown_ms = self.config.shove.cooldown_ms;
        self.hud.shove = ShoveCooldown {
            duration_ms: cooldown_ms,
            remaining_ms: self
                .last_shove_at
                .map_or(0.0, |last| (cooldown_ms - (now_ms - last)).max(0.0)),
        };

        let heal_ready = survivor
            && self.inventory.heal_items > 0
            && self.player.health() < self.player.max_health();
        let throw_ready = survivor
            && self
                .inventory
                .throwables(self.config.inventory.equipped_throwable)
                > 0;
        self.hud.shoot_enabled = match self.hud.shoot_mode {
            ShootMode::HealSelf if heal_ready => true,
            ShootMode::Throw if throw_ready => true,
            _ => {
                self.hud.shoot_mode = ShootMode::Fire;
                fire_ready
            }
        };

        self.hud.health = self.player.health();
        self.hud.max_health = self.player.max_health();
        self.hud.position = self.player.position;
        self.hud.faction = self.player.faction();
        self.hud.inventory = InventoryCounts {
            heal_items: self.inventory.heal_items,
            molotovs: self.inventory.molotovs,
            shocks: self.inventory.shocks,
        };
        self.hud.paused = self.clock.is_paused();
        self.hud.kills = self.kills;
        self.hud.bile_covered = self.player.is_bile_covered(now_ms);
    }
}
