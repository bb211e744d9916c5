use engine::Vec2;

use super::damage_zone::{DamageZoneOptions, ZoneRole, ZoneStyle};
use crate::content::{AbilityKind, AbilityParams, SpecialKind};

pub const VOMIT_HORDE_SIZE: u32 = 12;
pub const POUNCE_HIT_RADIUS: f32 = 80.0;
pub const CHARGE_DAMAGE_MULTIPLIER: f32 = 1.5;
pub const RIDE_TICK_INTERVAL_MS: f64 = 500.0;
pub const ROCK_ZONE_DURATION_MS: f32 = 2000.0;

const ACID_STYLE: ZoneStyle = ZoneStyle {
    color: 0x15803d,
    border_color: 0x22c55e,
};
const ROCK_STYLE: ZoneStyle = ZoneStyle {
    color: 0x4b5563,
    border_color: 0x94a3b8,
};

/// A triggered special ability, as emitted by the special director.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityPayload {
    pub special: SpecialKind,
    /// Slot of the attacker in the special pool.
    pub slot: usize,
    pub ability: AbilityParams,
    pub attacker_position: Vec2,
    pub target_position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    ForceCommonSpawn {
        count: u32,
    },
    MarkBileCovered {
        duration_ms: f64,
    },
    OverlayFlash {
        color: u32,
        duration_ms: f64,
        label: &'static str,
    },
    AttackerImpulse {
        velocity: Vec2,
        duration_ms: f64,
    },
    DamagePlayer {
        amount: f32,
    },
    DragPlayer {
        toward: Vec2,
        duration_ms: f64,
    },
    DamageOverTime {
        per_tick: f32,
        ticks: u32,
        interval_ms: f64,
    },
    SpawnHazardZone {
        role: ZoneRole,
        position: Vec2,
        options: DamageZoneOptions,
    },
}

/// Maps a triggered ability onto its world effects.
///
/// Depends only on the payload and where the player stands at resolution time.
pub fn resolve_ability(payload: &AbilityPayload, player_position: Vec2) -> Vec<AbilityEffect> {
    let ability = &payload.ability;
    let attacker = payload.attacker_position;
    let target = payload.target_position;
    let mut effects = Vec::new();

    match ability.kind {
        AbilityKind::Vomit => {
            let duration_ms = ability.duration_ms.unwrap_or(1500.0);
            effects.push(AbilityEffect::OverlayFlash {
                color: 0x65a30d,
                duration_ms,
                label: "Covered in bile!",
            });
            effects.push(AbilityEffect::MarkBileCovered { duration_ms });
            effects.push(AbilityEffect::ForceCommonSpawn {
                count: VOMIT_HORDE_SIZE,
            });
        }
        AbilityKind::Pounce => {
            let speed = ability.special_speed.unwrap_or(720.0);
            effects.push(AbilityEffect::AttackerImpulse {
                velocity: (target - attacker).normalized().scaled(speed),
                duration_ms: ability.duration_ms.unwrap_or(800.0),
            });
            if target.distance(player_position) < POUNCE_HIT_RADIUS {
                effects.push(AbilityEffect::DamagePlayer {
                    amount: ability.damage.unwrap_or(20.0),
                });
            }
        }
        AbilityKind::Tongue => {
            let duration_ms = ability.duration_ms.unwrap_or(1500.0);
            effects.push(AbilityEffect::OverlayFlash {
                color: 0x93c5fd,
                duration_ms,
                label: "Being dragged",
            });
            effects.push(AbilityEffect::DamagePlayer {
                amount: ability.damage.unwrap_or(10.0),
            });
            effects.push(AbilityEffect::DragPlayer {
                toward: attacker,
                duration_ms,
            });
        }
        AbilityKind::Ride => {
            effects.push(AbilityEffect::OverlayFlash {
                color: 0x312e81,
                duration_ms: ability.duration_ms.unwrap_or(1800.0),
                label: "Jockey control",
            });
            let duration_ms = ability.duration_ms.unwrap_or(3000.0);
            let ticks = ((duration_ms / RIDE_TICK_INTERVAL_MS).floor() as u32).max(1);
            effects.push(AbilityEffect::DamageOverTime {
                per_tick: ability.damage.unwrap_or(12.0) / ticks as f32,
                ticks,
                interval_ms: RIDE_TICK_INTERVAL_MS,
            });
        }
        AbilityKind::Charge => {
            let speed = ability.special_speed.unwrap_or(520.0);
            effects.push(AbilityEffect::AttackerImpulse {
                velocity: (target - attacker).normalized().scaled(speed),
                duration_ms: ability.duration_ms.unwrap_or(1400.0),
            });
            if attacker.distance(player_position) < ability.range {
                effects.push(AbilityEffect::DamagePlayer {
                    amount: ability.damage.unwrap_or(15.0) * CHARGE_DAMAGE_MULTIPLIER,
                });
            }
        }
        AbilityKind::Acid => {
            effects.push(AbilityEffect::SpawnHazardZone {
                role: ZoneRole::Acid,
                position: target,
                options: DamageZoneOptions {
                    style: ACID_STYLE,
                    radius: ability.area_radius.unwrap_or(200.0),
                    duration_ms: ability.duration_ms.unwrap_or(8000.0) as f32,
                    total_damage: ability.damage.unwrap_or(68.0),
                },
            });
        }
        AbilityKind::Rock => {
            let radius = ability.area_radius.unwrap_or(140.0);
            let damage = ability.damage.unwrap_or(60.0);
            effects.push(AbilityEffect::SpawnHazardZone {
                role: ZoneRole::Rock,
                position: target,
                options: DamageZoneOptions {
                    style: ROCK_STYLE,
                    radius,
                    duration_ms: ROCK_ZONE_DURATION_MS,
                    total_damage: damage,
                },
            });
            if target.distance(player_position) <= radius {
                effects.push(AbilityEffect::DamagePlayer { amount: damage });
            }
        }
        AbilityKind::Enrage => {
            effects.push(AbilityEffect::OverlayFlash {
                color: 0xea580c,
                duration_ms: 700.0,
                label: "Witch enraged!",
            });
            if attacker.distance(player_position) < ability.range {
                effects.push(AbilityEffect::DamagePlayer {
                    amount: ability.damage.unwrap_or(120.0),
                });
            }
        }
    }

    effects
}
