use engine::{Poolable, Vec2};
use tracing::debug;

use super::infected::{Infected, InfectedConfig};
use crate::combat::AbilityPayload;
use crate::content::{AbilityParams, SpecialDefinition, SpecialKind};

/// Grace period after spawning before the first ability may fire.
pub const ABILITY_SPAWN_GRACE_MS: f64 = 1200.0;
/// Fraction of ability range a special closes to before it stops and casts.
pub const ENGAGE_RANGE_FACTOR: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialProfile {
    pub kind: SpecialKind,
    pub health: f32,
    pub movement_speed: f32,
    pub ability: AbilityParams,
}

impl SpecialProfile {
    pub fn from_definition(definition: &SpecialDefinition) -> Self {
        Self {
            kind: definition.id,
            health: definition.health,
            movement_speed: definition.movement_speed,
            ability: definition.ability.params,
        }
    }

    fn body_config(&self) -> InfectedConfig {
        InfectedConfig {
            speed: self.movement_speed,
            max_health: self.health,
            damage: self.ability.damage.unwrap_or(12.0),
            attack_cooldown_ms: 900.0,
        }
    }

    pub fn engage_range(&self) -> f32 {
        self.ability.range * ENGAGE_RANGE_FACTOR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialInfected {
    pub body: Infected,
    profile: SpecialProfile,
    ability_ready_at: f64,
    ability_spent: bool,
}

impl SpecialInfected {
    pub fn new(profile: SpecialProfile) -> Self {
        Self {
            body: Infected::new(profile.body_config()),
            profile,
            ability_ready_at: 0.0,
            ability_spent: false,
        }
    }

    /// Swaps the profile of a recycled slot before it spawns again.
    pub fn configure(&mut self, profile: SpecialProfile) {
        self.profile = profile;
        self.body.reconfigure(profile.body_config());
    }

    pub fn spawn(&mut self, position: Vec2, now_ms: f64) {
        self.body.spawn(position);
        self.ability_ready_at = now_ms + ABILITY_SPAWN_GRACE_MS;
        self.ability_spent = false;
    }

    /// Either closes in, casts, or holds still; never moves on the tick it casts.
    pub fn update_ai(&mut self, slot: usize, target: Vec2, now_ms: f64) -> Option<AbilityPayload> {
        if !self.body.is_active() || self.body.impulse_active(now_ms) {
            return None;
        }
        let offset = target - self.body.position;
        if offset.length() > self.profile.engage_range() {
            let factor = if self.body.is_slowed(now_ms) {
                super::infected::SLOW_FACTOR
            } else {
                1.0
            };
            self.body.velocity = offset
                .normalized()
                .scaled(self.profile.movement_speed * factor);
            return None;
        }

        self.body.velocity = Vec2::ZERO;
        if self.ability_spent || now_ms < self.ability_ready_at {
            return None;
        }

        self.ability_ready_at = now_ms + self.profile.ability.cooldown_ms;
        if self.profile.ability.cooldown_ms <= 0.0 {
            self.ability_spent = true;
        }
        debug!(
            special = %self.profile.kind,
            ability = self.profile.ability.kind.as_str(),
            slot,
            "special_ability_triggered"
        );
        Some(AbilityPayload {
            special: self.profile.kind,
            slot,
            ability: self.profile.ability,
            attacker_position: self.body.position,
            target_position: target,
        })
    }

    pub fn profile(&self) -> &SpecialProfile {
        &self.profile
    }

    pub fn kind(&self) -> SpecialKind {
        self.profile.kind
    }

    pub fn ability_ready_at(&self) -> f64 {
        self.ability_ready_at
    }
}

impl Poolable for SpecialInfected {
    fn is_active(&self) -> bool {
        self.body.is_active()
    }

    fn deactivate(&mut self) {
        self.body.deactivate();
    }
}
