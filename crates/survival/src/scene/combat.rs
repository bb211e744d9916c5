use engine::{Poolable, Vec2};
use tracing::debug;

use super::{DamageTicker, GameScene};
use crate::actors::{HostileRef, Infected};
use crate::combat::{
    resolve_ability, AbilityEffect, AbilityPayload, DamageZone, ZonePulse, PROJECTILE_HIT_RADIUS,
};
use crate::events::CombatEvent;

/// Distance at which a pouncing player connects with a hostile.
pub const POUNCE_CONTACT_RADIUS: f32 = 40.0;
const DEFAULT_POUNCE_CONTACT_DAMAGE: f32 = 25.0;

impl GameScene {
    /// Applies everything producers put on the bus this tick, then the time-based damage sources.
    pub(super) fn resolve_combat(&mut self, delta_ms: f32, now_ms: f64) {
        for event in self.events.snapshot_from(0) {
            match event {
                CombatEvent::SpecialAbility(payload) => {
                    for effect in resolve_ability(&payload, self.player.position) {
                        self.apply_ability_effect(&payload, effect, now_ms);
                    }
                }
                CombatEvent::AreaSlow { center, radius } => {
                    self.slow_hostiles(center, radius, now_ms);
                }
                CombatEvent::InfectedAttack { damage, .. } => self.damage_player(damage),
                _ => {}
            }
        }

        let pulses = std::mem::take(&mut self.pending_pulses);
        for pulse in &pulses {
            self.apply_zone_pulse(pulse);
        }
        self.update_hazard_zones(delta_ms);
        self.update_ride_tickers(now_ms);
    }

    fn apply_ability_effect(&mut self, payload: &AbilityPayload, effect: AbilityEffect, now_ms: f64) {
        match effect {
            AbilityEffect::ForceCommonSpawn { count } => {
                let spawned = self
                    .spawner
                    .force_spawn(count, self.player.position, &mut self.rng);
                debug!(requested = count, spawned, "horde_summoned");
            }
            AbilityEffect::MarkBileCovered { duration_ms } => {
                self.player.mark_bile_covered(now_ms + duration_ms);
            }
            AbilityEffect::OverlayFlash {
                color,
                duration_ms,
                label,
            } => self.hud.flash(color, duration_ms, label),
            AbilityEffect::AttackerImpulse {
                velocity,
                duration_ms,
            } => {
                if let Some(special) = self.specials.specials_mut().get_mut(payload.slot) {
                    special.body.apply_impulse(velocity, now_ms, duration_ms);
                }
            }
            AbilityEffect::DamagePlayer { amount } => self.damage_player(amount),
            AbilityEffect::DragPlayer {
                toward,
                duration_ms,
            } => self.player.start_drag(toward, duration_ms, now_ms),
            AbilityEffect::DamageOverTime {
                per_tick,
                ticks,
                interval_ms,
            } => self.ride_tickers.push(DamageTicker {
                per_tick,
                remaining: ticks,
                interval_ms,
                next_at: now_ms + interval_ms,
            }),
            AbilityEffect::SpawnHazardZone {
                role,
                position,
                options,
            } => self
                .hazard_zones
                .push(DamageZone::new(role, position, options)),
        }
    }

    fn slow_hostiles(&mut self, center: Vec2, radius: f32, now_ms: f64) {
        for (_, infected) in self.spawner.hostiles_mut().iter_active_mut() {
            if infected.position.distance(center) <= radius {
                infected.apply_slow(now_ms);
            }
        }
        for (_, special) in self.specials.specials_mut().iter_active_mut() {
            if special.body.position.distance(center) <= radius {
                special.body.apply_slow(now_ms);
            }
        }
    }

    fn apply_zone_pulse(&mut self, pulse: &ZonePulse) {
        let inside: Vec<HostileRef> = self
            .active_hostiles()
            .into_iter()
            .filter(|(_, position)| pulse.contains(*position))
            .map(|(target, _)| target)
            .collect();
        for target in inside {
            if pulse.stuns() {
                if let Some(hostile) = self.hostile_mut(target) {
                    hostile.stun();
                }
            }
            self.damage_hostile(target, pulse.damage);
        }
    }

    /// Ability zones only ever hurt the player.
    fn update_hazard_zones(&mut self, delta_ms: f32) {
        let player_position = self.player.position;
        let mut damage = 0.0;
        self.hazard_zones.retain_mut(|zone| {
            let consumed = zone.update(delta_ms);
            if consumed > 0.0 && zone.contains(player_position) {
                damage += zone.sample_damage(consumed);
            }
            zone.is_active()
        });
        self.damage_player(damage);
    }

    fn update_ride_tickers(&mut self, now_ms: f64) {
        let mut damage = 0.0;
        self.ride_tickers.retain_mut(|ticker| {
            while ticker.remaining > 0 && now_ms >= ticker.next_at {
                damage += ticker.per_tick;
                ticker.remaining -= 1;
                ticker.next_at += ticker.interval_ms;
            }
            ticker.remaining > 0
        });
        self.damage_player(damage);
    }

    pub(super) fn integrate_movement(&mut self, dt_ms: f32, now_ms: f64) {
        self.player.integrate(dt_ms, now_ms);
        self.projectiles.integrate(dt_ms);
        self.throwables.integrate(dt_ms);
        for (_, infected) in self.spawner.hostiles_mut().iter_active_mut() {
            infected.integrate(dt_ms);
        }
        for (_, special) in self.specials.specials_mut().iter_active_mut() {
            special.body.integrate(dt_ms);
        }
        self.resolve_projectile_hits();
        self.resolve_pounce_contact();
    }

    /// Each projectile stops at the first live hostile inside its hit radius, commons first.
    fn resolve_projectile_hits(&mut self) {
        let flying: Vec<(usize, Vec2, f32)> = self
            .projectiles
            .iter_active()
            .map(|(slot, projectile)| (slot, projectile.position, projectile.damage))
            .collect();
        for (slot, position, damage) in flying {
            let Some(target) = self.first_hostile_within(position, PROJECTILE_HIT_RADIUS) else {
                continue;
            };
            self.projectiles.kill(slot);
            self.events.emit(CombatEvent::ProjectileHit { target, damage });
            self.damage_hostile(target, damage);
        }
    }

    fn resolve_pounce_contact(&mut self) {
        if !self.player.is_hunter_pouncing() {
            return;
        }
        let Some(target) = self.first_hostile_within(self.player.position, POUNCE_CONTACT_RADIUS)
        else {
            return;
        };
        let damage = self
            .hunter_ability
            .and_then(|ability| ability.damage)
            .unwrap_or(DEFAULT_POUNCE_CONTACT_DAMAGE);
        self.damage_hostile(target, damage);
        self.player.end_hunter_pounce();
        debug!(?target, damage, "hunter_pounce_landed");
    }

    pub(super) fn damage_player(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        self.player.apply_damage(amount);
        self.events.emit(CombatEvent::PlayerDamaged { amount });
    }

    /// Returns true when the hit killed the target.
    pub(super) fn damage_hostile(&mut self, target: HostileRef, amount: f32) -> bool {
        let Some(hostile) = self.hostile_mut(target) else {
            return false;
        };
        if !hostile.is_active() || !hostile.receive_damage(amount) {
            return false;
        }
        self.kills += 1;
        self.events.emit(CombatEvent::HostileKilled { target });
        debug!(?target, kills = self.kills, "hostile_killed");
        true
    }

    fn hostile_mut(&mut self, target: HostileRef) -> Option<&mut Infected> {
        match target {
            HostileRef::Common(slot) => self.spawner.hostiles_mut().get_mut(slot),
            HostileRef::Special(slot) => self
                .specials
                .specials_mut()
                .get_mut(slot)
                .map(|special| &mut special.body),
        }
    }

    pub(super) fn active_hostiles(&self) -> Vec<(HostileRef, Vec2)> {
        let commons = self
            .spawner
            .hostiles()
            .iter_active()
            .map(|(slot, infected)| (HostileRef::Common(slot), infected.position));
        let specials = self
            .specials
            .specials()
            .iter_active()
            .map(|(slot, special)| (HostileRef::Special(slot), special.body.position));
        commons.chain(specials).collect()
    }

    fn first_hostile_within(&self, point: Vec2, radius: f32) -> Option<HostileRef> {
        self.active_hostiles()
            .into_iter()
            .find(|(_, position)| position.distance(point) <= radius)
            .map(|(target, _)| target)
    }
}
