use engine::{Pool, Poolable, Vec2, OFF_WORLD};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::damage_zone::{DamageZone, DamageZoneOptions, ZoneRole, ZoneStyle};
use crate::events::{CombatEvent, CombatEventBus};

pub const THROWABLE_POOL_CAPACITY: usize = 12;
/// In-flight throwables slower than this detonate early.
pub const DETONATION_MIN_SPEED: f32 = 50.0;
pub const SHOCK_SLOW_RADIUS: f32 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowableKind {
    Molotov,
    Shock,
}

impl ThrowableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ThrowableKind::Molotov => "molotov",
            ThrowableKind::Shock => "shock",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ThrowableKind::Molotov => "Molotov",
            ThrowableKind::Shock => "Shock grenade",
        }
    }

    pub fn config(self) -> ThrowableConfig {
        match self {
            ThrowableKind::Molotov => ThrowableConfig {
                speed: 720.0,
                fuse_ms: 500.0,
                zone: DamageZoneOptions {
                    style: ZoneStyle {
                        color: 0xf97316,
                        border_color: 0xfb923c,
                    },
                    radius: 180.0,
                    duration_ms: 6000.0,
                    total_damage: 220.0,
                },
            },
            ThrowableKind::Shock => ThrowableConfig {
                speed: 820.0,
                fuse_ms: 450.0,
                zone: DamageZoneOptions {
                    style: ZoneStyle {
                        color: 0x7c3aed,
                        border_color: 0xc084fc,
                    },
                    radius: 200.0,
                    duration_ms: 3000.0,
                    total_damage: 40.0,
                },
            },
        }
    }

    fn zone_role(self) -> ZoneRole {
        match self {
            ThrowableKind::Molotov => ZoneRole::Molotov,
            ThrowableKind::Shock => ZoneRole::Shock,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowableConfig {
    pub speed: f32,
    pub fuse_ms: f64,
    pub zone: DamageZoneOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Throwable {
    active: bool,
    kind: ThrowableKind,
    pub position: Vec2,
    pub velocity: Vec2,
    spawn_at: f64,
    fuse_ms: f64,
}

impl Default for Throwable {
    fn default() -> Self {
        Self {
            active: false,
            kind: ThrowableKind::Molotov,
            position: OFF_WORLD,
            velocity: Vec2::ZERO,
            spawn_at: 0.0,
            fuse_ms: 0.0,
        }
    }
}

impl Poolable for Throwable {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.velocity = Vec2::ZERO;
        self.position = OFF_WORLD;
    }
}

impl Throwable {
    pub fn kind(&self) -> ThrowableKind {
        self.kind
    }

    fn should_detonate(&self, now_ms: f64) -> bool {
        now_ms - self.spawn_at >= self.fuse_ms || self.velocity.length() < DETONATION_MIN_SPEED
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveZone {
    pub kind: ThrowableKind,
    pub zone: DamageZone,
}

/// One zone's contribution for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZonePulse {
    pub kind: ThrowableKind,
    pub position: Vec2,
    pub radius: f32,
    pub damage: f32,
}

impl ZonePulse {
    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.radius
    }

    pub fn stuns(&self) -> bool {
        self.kind == ThrowableKind::Shock
    }
}

#[derive(Debug, Clone)]
pub struct ThrowableSystem {
    projectiles: Pool<Throwable>,
    zones: Vec<ActiveZone>,
}

impl Default for ThrowableSystem {
    fn default() -> Self {
        Self {
            projectiles: Pool::new(THROWABLE_POOL_CAPACITY),
            zones: Vec::new(),
        }
    }
}

impl ThrowableSystem {
    /// Launches a throwable; returns false when the pool is saturated.
    pub fn throw(&mut self, kind: ThrowableKind, origin: Vec2, direction: Vec2, now_ms: f64) -> bool {
        let config = kind.config();
        let Some((_, throwable)) = self.projectiles.acquire_with(Throwable::default) else {
            debug!(kind = kind.as_str(), "throwable_dropped_pool_saturated");
            return false;
        };
        throwable.active = true;
        throwable.kind = kind;
        throwable.position = origin;
        throwable.velocity = direction.normalized().scaled(config.speed);
        throwable.spawn_at = now_ms;
        throwable.fuse_ms = config.fuse_ms;
        true
    }

    /// Detonates due throwables, then advances every zone and drops the finished ones.
    ///
    /// Returns the damage each zone deals this tick to anything inside it.
    pub fn update(
        &mut self,
        delta_ms: f32,
        now_ms: f64,
        events: &mut CombatEventBus,
    ) -> Vec<ZonePulse> {
        for (_, throwable) in self.projectiles.iter_active_mut() {
            if !throwable.should_detonate(now_ms) {
                continue;
            }
            let kind = throwable.kind;
            let position = throwable.position;
            self.zones.push(ActiveZone {
                kind,
                zone: DamageZone::new(kind.zone_role(), position, kind.config().zone),
            });
            events.emit(CombatEvent::ThrowableDetonated { kind, position });
            if kind == ThrowableKind::Shock {
                events.emit(CombatEvent::AreaSlow {
                    center: position,
                    radius: SHOCK_SLOW_RADIUS,
                });
            }
            debug!(kind = kind.as_str(), x = position.x, y = position.y, "throwable_detonated");
            throwable.deactivate();
        }

        let mut pulses = Vec::new();
        self.zones.retain_mut(|entry| {
            let consumed = entry.zone.update(delta_ms);
            if consumed > 0.0 {
                pulses.push(ZonePulse {
                    kind: entry.kind,
                    position: entry.zone.position(),
                    radius: entry.zone.radius(),
                    damage: entry.zone.sample_damage(consumed),
                });
            }
            entry.zone.is_active()
        });
        pulses
    }

    pub fn integrate(&mut self, dt_ms: f32) {
        let dt_seconds = dt_ms / 1000.0;
        for (_, throwable) in self.projectiles.iter_active_mut() {
            throwable.position += throwable.velocity * dt_seconds;
        }
    }

    pub fn zones(&self) -> &[ActiveZone] {
        &self.zones
    }

    pub fn in_flight(&self) -> usize {
        self.projectiles.active_count()
    }
}
