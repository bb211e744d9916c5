use engine::{Pool, Poolable, Vec2, OFF_WORLD};
use tracing::debug;

use crate::events::{CombatEvent, CombatEventBus};

pub const PROJECTILE_POOL_CAPACITY: usize = 150;
pub const DEFAULT_PROJECTILE_LIFESPAN_MS: f64 = 1000.0;
pub const PROJECTILE_HIT_RADIUS: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    active: bool,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    owner_id: String,
    birth_ms: f64,
    lifespan_ms: f64,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            active: false,
            position: OFF_WORLD,
            velocity: Vec2::ZERO,
            damage: 0.0,
            owner_id: String::new(),
            birth_ms: 0.0,
            lifespan_ms: DEFAULT_PROJECTILE_LIFESPAN_MS,
        }
    }
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.velocity = Vec2::ZERO;
        self.position = OFF_WORLD;
    }
}

impl Projectile {
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn birth_ms(&self) -> f64 {
        self.birth_ms
    }

    pub fn lifespan_ms(&self) -> f64 {
        self.lifespan_ms
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.birth_ms > self.lifespan_ms
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileLaunch<'a> {
    pub origin: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub owner_id: &'a str,
    pub lifespan_ms: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ProjectilePool {
    pool: Pool<Projectile>,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::with_capacity(PROJECTILE_POOL_CAPACITY)
    }
}

impl ProjectilePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: Pool::new(capacity),
        }
    }

    /// Activates a pooled projectile. A saturated pool drops the shot and returns `None`.
    pub fn fire(
        &mut self,
        launch: ProjectileLaunch<'_>,
        now_ms: f64,
        events: &mut CombatEventBus,
    ) -> Option<usize> {
        let capacity = self.pool.capacity();
        let Some((slot, projectile)) = self.pool.acquire_with(Projectile::default) else {
            debug!(capacity, "projectile_dropped_pool_saturated");
            return None;
        };
        projectile.active = true;
        projectile.position = launch.origin;
        projectile.velocity = launch.velocity;
        projectile.damage = launch.damage;
        projectile.owner_id.clear();
        projectile.owner_id.push_str(launch.owner_id);
        projectile.birth_ms = now_ms;
        projectile.lifespan_ms = launch.lifespan_ms.unwrap_or(DEFAULT_PROJECTILE_LIFESPAN_MS);

        events.emit(CombatEvent::ProjectileFired {
            origin: launch.origin,
            velocity: launch.velocity,
            damage: launch.damage,
        });
        Some(slot)
    }

    /// Releases every projectile that outlived its lifespan; returns how many were released.
    pub fn expire(&mut self, now_ms: f64) -> usize {
        let mut released = 0;
        for (_, projectile) in self.pool.iter_active_mut() {
            if projectile.is_expired(now_ms) {
                projectile.deactivate();
                released += 1;
            }
        }
        released
    }

    pub fn integrate(&mut self, dt_ms: f32) {
        let dt_seconds = dt_ms / 1000.0;
        for (_, projectile) in self.pool.iter_active_mut() {
            projectile.position += projectile.velocity * dt_seconds;
        }
    }

    pub fn kill(&mut self, slot: usize) {
        self.pool.release(slot);
    }

    pub fn get(&self, slot: usize) -> Option<&Projectile> {
        self.pool.get(slot)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Projectile)> {
        self.pool.iter_active()
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(origin: Vec2) -> ProjectileLaunch<'static> {
        ProjectileLaunch {
            origin,
            velocity: Vec2::new(1200.0, 0.0),
            damage: 16.0,
            owner_id: "player-local",
            lifespan_ms: None,
        }
    }

    #[test]
    fn fire_emits_event_and_tags_owner() {
        let mut pool = ProjectilePool::default();
        let mut events = CombatEventBus::default();

        let slot = pool
            .fire(launch(Vec2::new(5.0, 5.0)), 100.0, &mut events)
            .expect("slot");

        let projectile = pool.get(slot).expect("projectile");
        assert_eq!(projectile.owner_id(), "player-local");
        assert_eq!(projectile.birth_ms(), 100.0);
        assert_eq!(projectile.lifespan_ms(), DEFAULT_PROJECTILE_LIFESPAN_MS);
        assert_eq!(events.iter_emitted_so_far().count(), 1);
    }

    #[test]
    fn saturated_pool_drops_shot() {
        let mut pool = ProjectilePool::with_capacity(2);
        let mut events = CombatEventBus::default();
        pool.fire(launch(Vec2::ZERO), 0.0, &mut events);
        pool.fire(launch(Vec2::ZERO), 0.0, &mut events);

        assert!(pool.fire(launch(Vec2::ZERO), 0.0, &mut events).is_none());
        assert_eq!(pool.active_count(), 2);
        assert_eq!(events.iter_emitted_so_far().count(), 2);
    }

    #[test]
    fn expiry_is_strictly_after_lifespan() {
        let mut pool = ProjectilePool::default();
        let mut events = CombatEventBus::default();
        pool.fire(launch(Vec2::ZERO), 0.0, &mut events);

        assert_eq!(pool.expire(1000.0), 0);
        assert_eq!(pool.expire(1000.5), 1);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn killed_projectile_is_parked_and_reused() {
        let mut pool = ProjectilePool::default();
        let mut events = CombatEventBus::default();
        let slot = pool
            .fire(launch(Vec2::new(1.0, 1.0)), 0.0, &mut events)
            .expect("slot");
        pool.kill(slot);

        let parked = pool.get(slot).expect("parked");
        assert!(!parked.is_active());
        assert_eq!(parked.position, OFF_WORLD);

        let reused = pool
            .fire(launch(Vec2::new(2.0, 2.0)), 10.0, &mut events)
            .expect("reused");
        assert_eq!(reused, slot);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn integrate_moves_by_velocity() {
        let mut pool = ProjectilePool::default();
        let mut events = CombatEventBus::default();
        let slot = pool
            .fire(launch(Vec2::ZERO), 0.0, &mut events)
            .expect("slot");

        pool.integrate(500.0);

        let projectile = pool.get(slot).expect("projectile");
        assert!((projectile.position.x - 600.0).abs() < 1e-3);
    }
}
