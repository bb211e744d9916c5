use engine::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::projectile::{ProjectileLaunch, ProjectilePool};
use crate::events::CombatEventBus;
use crate::rng::GameRng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: String,
    pub display_name: String,
    /// Shots per second.
    pub fire_rate: f32,
    pub damage: f32,
    pub projectile_speed: f32,
    /// Half-angle of the random spread cone, in degrees.
    pub spread_degrees: f32,
    pub automatic: bool,
    pub magazine_size: u32,
    pub reload_time_ms: f64,
}

impl WeaponDefinition {
    pub fn carbine() -> Self {
        Self {
            id: "ar".to_string(),
            display_name: "M416 Carbine".to_string(),
            fire_rate: 9.0,
            damage: 16.0,
            projectile_speed: 1200.0,
            spread_degrees: 3.0,
            automatic: true,
            magazine_size: 30,
            reload_time_ms: 1600.0,
        }
    }

    pub fn pistol() -> Self {
        Self {
            id: "pistol".to_string(),
            display_name: "Ranger Pistol".to_string(),
            fire_rate: 4.0,
            damage: 24.0,
            projectile_speed: 900.0,
            spread_degrees: 1.5,
            automatic: false,
            magazine_size: 12,
            reload_time_ms: 1200.0,
        }
    }

    pub fn fire_interval_ms(&self) -> f64 {
        if self.fire_rate > 0.0 {
            1000.0 / f64::from(self.fire_rate)
        } else {
            f64::INFINITY
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSlot {
    #[default]
    Primary,
    Secondary,
}

impl WeaponSlot {
    pub fn other(self) -> Self {
        match self {
            WeaponSlot::Primary => WeaponSlot::Secondary,
            WeaponSlot::Secondary => WeaponSlot::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponRuntime {
    definition: WeaponDefinition,
    ammo_in_magazine: u32,
    is_reloading: bool,
    last_shot_at: Option<f64>,
    reload_started_at: f64,
}

impl WeaponRuntime {
    fn new(definition: WeaponDefinition) -> Self {
        Self {
            ammo_in_magazine: definition.magazine_size,
            definition,
            is_reloading: false,
            last_shot_at: None,
            reload_started_at: 0.0,
        }
    }

    pub fn definition(&self) -> &WeaponDefinition {
        &self.definition
    }

    pub fn ammo_in_magazine(&self) -> u32 {
        self.ammo_in_magazine
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    pub fn last_shot_at(&self) -> Option<f64> {
        self.last_shot_at
    }

    fn queue_reload(&mut self, now_ms: f64) {
        if self.is_reloading {
            return;
        }
        self.is_reloading = true;
        self.reload_started_at = now_ms;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WeaponSummary {
    pub id: String,
    pub display_name: String,
    pub ammo_in_magazine: u32,
    pub magazine_size: u32,
    pub slot: WeaponSlot,
    pub automatic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReloadProgress {
    pub duration_ms: f64,
    pub elapsed_ms: f64,
    pub is_reloading: bool,
}

/// What a shot needs from the rest of the scene.
pub struct FireContext<'a> {
    pub now_ms: f64,
    pub rng: &'a mut GameRng,
    pub projectiles: &'a mut ProjectilePool,
    pub events: &'a mut CombatEventBus,
}

/// Two independently stated weapon slots, one of them active.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSystem {
    primary: WeaponRuntime,
    secondary: WeaponRuntime,
    active_slot: WeaponSlot,
}

impl WeaponSystem {
    pub fn new(primary: WeaponDefinition, secondary: WeaponDefinition) -> Self {
        Self {
            primary: WeaponRuntime::new(primary),
            secondary: WeaponRuntime::new(secondary),
            active_slot: WeaponSlot::Primary,
        }
    }

    pub fn active_slot(&self) -> WeaponSlot {
        self.active_slot
    }

    pub fn weapon(&self, slot: WeaponSlot) -> &WeaponRuntime {
        match slot {
            WeaponSlot::Primary => &self.primary,
            WeaponSlot::Secondary => &self.secondary,
        }
    }

    fn weapon_mut(&mut self, slot: WeaponSlot) -> &mut WeaponRuntime {
        match slot {
            WeaponSlot::Primary => &mut self.primary,
            WeaponSlot::Secondary => &mut self.secondary,
        }
    }

    pub fn active_weapon(&self) -> &WeaponRuntime {
        self.weapon(self.active_slot)
    }

    /// Changes the active slot. The other slot keeps its reload running.
    pub fn switch_weapon(&mut self, slot: WeaponSlot) {
        self.active_slot = slot;
    }

    pub fn cycle_weapon(&mut self) -> WeaponSlot {
        self.active_slot = self.active_slot.other();
        self.active_slot
    }

    /// Fires the active weapon along `direction`.
    ///
    /// Returns false and queues a reload when reloading or empty. Returns false with no side
    /// effects while the minimum shot interval has not elapsed.
    pub fn try_fire(
        &mut self,
        ctx: &mut FireContext<'_>,
        origin: Vec2,
        direction: Vec2,
        owner_id: &str,
    ) -> bool {
        let slot = self.active_slot;
        let weapon = self.weapon_mut(slot);
        if weapon.is_reloading || weapon.ammo_in_magazine == 0 {
            weapon.queue_reload(ctx.now_ms);
            debug!(weapon = %weapon.definition.id, "shot_rejected_reloading");
            return false;
        }

        if let Some(last_shot_at) = weapon.last_shot_at {
            if ctx.now_ms - last_shot_at < weapon.definition.fire_interval_ms() {
                return false;
            }
        }

        let spread = weapon.definition.spread_degrees;
        let spread_degrees = if spread > 0.0 {
            ctx.rng.float_between(-spread, spread)
        } else {
            0.0
        };
        let mut aim = direction.normalized();
        if aim == Vec2::ZERO {
            aim = Vec2::new(1.0, 0.0);
        }
        let velocity = aim
            .rotated(spread_degrees.to_radians())
            .scaled(weapon.definition.projectile_speed);

        ctx.projectiles.fire(
            ProjectileLaunch {
                origin,
                velocity,
                damage: weapon.definition.damage,
                owner_id,
                lifespan_ms: None,
            },
            ctx.now_ms,
            ctx.events,
        );

        weapon.ammo_in_magazine -= 1;
        weapon.last_shot_at = Some(ctx.now_ms);
        if weapon.ammo_in_magazine == 0 {
            weapon.queue_reload(ctx.now_ms);
        }
        true
    }

    /// Completes any reload, in either slot, whose duration has elapsed.
    pub fn update(&mut self, now_ms: f64) {
        for weapon in [&mut self.primary, &mut self.secondary] {
            if !weapon.is_reloading {
                continue;
            }
            if now_ms - weapon.reload_started_at >= weapon.definition.reload_time_ms {
                weapon.ammo_in_magazine = weapon.definition.magazine_size;
                weapon.is_reloading = false;
                weapon.reload_started_at = 0.0;
                weapon.last_shot_at = Some(now_ms);
                debug!(weapon = %weapon.definition.id, "reload_completed");
            }
        }
    }

    /// No-op returning false when the slot is already reloading or full.
    pub fn start_reload(&mut self, slot: WeaponSlot, now_ms: f64) -> bool {
        let weapon = self.weapon_mut(slot);
        if weapon.is_reloading || weapon.ammo_in_magazine == weapon.definition.magazine_size {
            return false;
        }
        weapon.queue_reload(now_ms);
        true
    }

    pub fn start_active_reload(&mut self, now_ms: f64) -> bool {
        self.start_reload(self.active_slot, now_ms)
    }

    /// Aborts a reload without refilling the magazine.
    pub fn cancel_reload(&mut self, slot: WeaponSlot) {
        let weapon = self.weapon_mut(slot);
        if !weapon.is_reloading {
            return;
        }
        weapon.is_reloading = false;
        weapon.reload_started_at = 0.0;
    }

    pub fn reload_progress(&self, slot: WeaponSlot, now_ms: f64) -> ReloadProgress {
        let weapon = self.weapon(slot);
        let duration_ms = weapon.definition.reload_time_ms;
        if !weapon.is_reloading {
            return ReloadProgress {
                duration_ms,
                elapsed_ms: 0.0,
                is_reloading: false,
            };
        }
        ReloadProgress {
            duration_ms,
            elapsed_ms: (now_ms - weapon.reload_started_at).clamp(0.0, duration_ms),
            is_reloading: true,
        }
    }

    pub fn weapon_summary(&self) -> WeaponSummary {
        let weapon = self.active_weapon();
        WeaponSummary {
            id: weapon.definition.id.clone(),
            display_name: weapon.definition.display_name.clone(),
            ammo_in_magazine: weapon.ammo_in_magazine,
            magazine_size: weapon.definition.magazine_size,
            slot: self.active_slot,
            automatic: weapon.definition.automatic,
        }
    }
}
