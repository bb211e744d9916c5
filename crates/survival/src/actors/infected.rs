use engine::{Poolable, Vec2, OFF_WORLD};
use serde::{Deserialize, Serialize};

/// Melee reach of a common infected.
pub const ATTACK_RANGE: f32 = 48.0;
pub const SLOW_FACTOR: f32 = 0.2;
pub const SLOW_DURATION_MS: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfectedConfig {
    pub speed: f32,
    pub max_health: f32,
    pub damage: f32,
    pub attack_cooldown_ms: f64,
}

impl Default for InfectedConfig {
    fn default() -> Self {
        Self {
            speed: 160.0,
            max_health: 60.0,
            damage: 10.0,
            attack_cooldown_ms: 900.0,
        }
    }
}

/// Externally imposed velocity that overrides pursuit until `until_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    pub velocity: Vec2,
    pub until_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Infected {
    active: bool,
    config: InfectedConfig,
    pub position: Vec2,
    pub velocity: Vec2,
    health: f32,
    last_attack_at: f64,
    impulse: Option<Impulse>,
    slowed_until: f64,
}

impl Infected {
    pub fn new(config: InfectedConfig) -> Self {
        Self {
            active: false,
            config,
            position: OFF_WORLD,
            velocity: Vec2::ZERO,
            health: config.max_health,
            last_attack_at: 0.0,
            impulse: None,
            slowed_until: 0.0,
        }
    }

    pub(crate) fn reconfigure(&mut self, config: InfectedConfig) {
        self.config = config;
    }

    /// Resets health and timers and activates at `position`.
    pub fn spawn(&mut self, position: Vec2) {
        self.active = true;
        self.health = self.config.max_health;
        self.last_attack_at = 0.0;
        self.impulse = None;
        self.slowed_until = 0.0;
        self.position = position;
        self.velocity = Vec2::ZERO;
    }

    /// Returns true when the hit killed it; a dead infected is deactivated immediately.
    pub fn receive_damage(&mut self, amount: f32) -> bool {
        if !self.active {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.deactivate();
            return true;
        }
        false
    }

    /// Pursues `target`; returns the melee damage when an attack lands this tick.
    pub fn update_ai(&mut self, target: Vec2, now_ms: f64) -> Option<f32> {
        if !self.active || self.impulse_active(now_ms) {
            return None;
        }
        let offset = target - self.position;
        let distance = offset.length();
        if distance == 0.0 {
            return None;
        }
        self.velocity = offset.normalized().scaled(self.config.speed * self.speed_factor(now_ms));

        if distance < ATTACK_RANGE && now_ms - self.last_attack_at >= self.config.attack_cooldown_ms
        {
            self.last_attack_at = now_ms;
            return Some(self.config.damage);
        }
        None
    }

    /// Holds `impulse.velocity` until it expires, then stops.
    pub(crate) fn impulse_active(&mut self, now_ms: f64) -> bool {
        match self.impulse {
            Some(impulse) if now_ms < impulse.until_ms => {
                self.velocity = impulse.velocity;
                true
            }
            Some(_) => {
                self.impulse = None;
                self.velocity = Vec2::ZERO;
                false
            }
            None => false,
        }
    }

    pub fn apply_impulse(&mut self, velocity: Vec2, now_ms: f64, duration_ms: f64) {
        if !self.active {
            return;
        }
        self.velocity = velocity;
        self.impulse = Some(Impulse {
            velocity,
            until_ms: now_ms + duration_ms,
        });
    }

    pub fn apply_slow(&mut self, now_ms: f64) {
        if !self.active {
            return;
        }
        self.velocity = self.velocity * SLOW_FACTOR;
        self.slowed_until = now_ms + SLOW_DURATION_MS;
    }

    pub fn stun(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn is_slowed(&self, now_ms: f64) -> bool {
        now_ms < self.slowed_until
    }

    fn speed_factor(&self, now_ms: f64) -> f32 {
        if self.is_slowed(now_ms) {
            SLOW_FACTOR
        } else {
            1.0
        }
    }

    pub fn integrate(&mut self, dt_ms: f32) {
        if self.active {
            self.position += self.velocity * (dt_ms / 1000.0);
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn config(&self) -> &InfectedConfig {
        &self.config
    }

    pub fn impulse(&self) -> Option<Impulse> {
        self.impulse
    }
}

impl Poolable for Infected {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.velocity = Vec2::ZERO;
        self.position = OFF_WORLD;
        self.impulse = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned_at(position: Vec2) -> Infected {
        let mut infected = Infected::new(InfectedConfig::default());
        infected.spawn(position);
        infected
    }

    #[test]
    fn chases_at_config_speed() {
        let mut infected = spawned_at(Vec2::new(300.0, 0.0));
        assert_eq!(infected.update_ai(Vec2::ZERO, 1000.0), None);
        assert!((infected.velocity.x + 160.0).abs() < 1e-3);
    }

    #[test]
    fn attacks_in_range_respecting_cooldown() {
        let mut infected = spawned_at(Vec2::new(40.0, 0.0));
        assert_eq!(infected.update_ai(Vec2::ZERO, 900.0), Some(10.0));
        assert_eq!(infected.update_ai(Vec2::ZERO, 1500.0), None);
        assert_eq!(infected.update_ai(Vec2::ZERO, 1800.0), Some(10.0));
    }

    #[test]
    fn death_deactivates_and_parks() {
        let mut infected = spawned_at(Vec2::new(10.0, 10.0));
        assert!(!infected.receive_damage(59.0));
        assert!(infected.receive_damage(1.0));
        assert!(!infected.is_active());
        assert_eq!(infected.position, OFF_WORLD);
        assert!(!infected.receive_damage(100.0));
    }

    #[test]
    fn respawn_restores_health() {
        let mut infected = spawned_at(Vec2::ZERO);
        infected.receive_damage(100.0);
        infected.spawn(Vec2::new(5.0, 5.0));
        assert!(infected.is_active());
        assert_eq!(infected.health(), 60.0);
    }

    #[test]
    fn impulse_overrides_pursuit_until_expiry() {
        let mut infected = spawned_at(Vec2::new(300.0, 0.0));
        infected.apply_impulse(Vec2::new(0.0, 420.0), 0.0, 150.0);

        infected.update_ai(Vec2::ZERO, 100.0);
        assert_eq!(infected.velocity, Vec2::new(0.0, 420.0));

        infected.update_ai(Vec2::ZERO, 150.0);
        assert!(infected.impulse().is_none());
        assert!(infected.velocity.x < 0.0);
    }

    #[test]
    fn slow_cuts_speed_for_a_while() {
        let mut infected = spawned_at(Vec2::new(300.0, 0.0));
        infected.apply_slow(1000.0);

        infected.update_ai(Vec2::ZERO, 1200.0);
        assert!((infected.velocity.length() - 32.0).abs() < 1e-3);

        infected.update_ai(Vec2::ZERO, 1400.0);
        assert!((infected.velocity.length() - 160.0).abs() < 1e-3);
    }
}
