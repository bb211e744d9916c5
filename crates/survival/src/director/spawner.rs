use engine::{Pool, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actors::{Infected, InfectedConfig};
use crate::events::{CombatEvent, CombatEventBus};
use crate::rng::GameRng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub pool_size: usize,
    pub spawn_radius: f32,
    pub spawn_interval_ms: f64,
    pub initial_delay_ms: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            pool_size: 40,
            spawn_radius: 1200.0,
            spawn_interval_ms: 4200.0,
            initial_delay_ms: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WaveSchedule {
    Stopped,
    Initial { fire_at: f64 },
    Looping { next_at: f64 },
}

/// Wave generator for common infected around a moving target.
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    config: SpawnConfig,
    infected: InfectedConfig,
    hostiles: Pool<Infected>,
    schedule: WaveSchedule,
}

impl EnemySpawner {
    pub fn new(infected: InfectedConfig, config: SpawnConfig) -> Self {
        Self {
            hostiles: Pool::new(config.pool_size),
            config,
            infected,
            schedule: WaveSchedule::Stopped,
        }
    }

    /// Restarts the wave timer: first wave after the initial delay, then on a fixed interval.
    pub fn start(&mut self, now_ms: f64) {
        self.stop();
        self.schedule = WaveSchedule::Initial {
            fire_at: now_ms + self.config.initial_delay_ms,
        };
    }

    pub fn stop(&mut self) {
        self.schedule = WaveSchedule::Stopped;
    }

    pub fn is_running(&self) -> bool {
        self.schedule != WaveSchedule::Stopped
    }

    /// Out-of-band wave; returns how many actually spawned.
    pub fn force_spawn(&mut self, count: u32, target: Vec2, rng: &mut GameRng) -> u32 {
        self.spawn_wave(count, target, rng)
    }

    pub fn update(
        &mut self,
        target: Vec2,
        now_ms: f64,
        rng: &mut GameRng,
        events: &mut CombatEventBus,
    ) {
        self.run_schedule(target, now_ms, rng);

        for (slot, infected) in self.hostiles.iter_active_mut() {
            if let Some(damage) = infected.update_ai(target, now_ms) {
                events.emit(CombatEvent::InfectedAttack { slot, damage });
            }
        }
    }

    fn run_schedule(&mut self, target: Vec2, now_ms: f64, rng: &mut GameRng) {
        let interval = self.config.spawn_interval_ms;
        if let WaveSchedule::Initial { fire_at } = self.schedule {
            if now_ms < fire_at {
                return;
            }
            let count = 1 + rng.int_between(2, 4) as u32;
            self.spawn_wave(count, target, rng);
            self.schedule = WaveSchedule::Looping {
                next_at: fire_at + interval,
            };
        }
        if interval <= 0.0 {
            return;
        }
        while let WaveSchedule::Looping { next_at } = self.schedule {
            if now_ms < next_at {
                break;
            }
            let count = rng.int_between(1, 3) as u32;
            self.spawn_wave(count, target, rng);
            self.schedule = WaveSchedule::Looping {
                next_at: next_at + interval,
            };
        }
    }

    fn spawn_wave(&mut self, count: u32, target: Vec2, rng: &mut GameRng) -> u32 {
        let mut spawned = 0;
        for _ in 0..count {
            let position = target + Vec2::from_angle(rng.angle()).scaled(self.config.spawn_radius);
            let infected_config = self.infected;
            let Some((_, infected)) = self
                .hostiles
                .acquire_with(|| Infected::new(infected_config))
            else {
                debug!(
                    requested = count,
                    spawned,
                    pool_size = self.config.pool_size,
                    "spawn_dropped_pool_saturated"
                );
                break;
            };
            infected.spawn(position);
            spawned += 1;
        }
        spawned
    }

    pub fn hostiles(&self) -> &Pool<Infected> {
        &self.hostiles
    }

    pub fn hostiles_mut(&mut self) -> &mut Pool<Infected> {
        &mut self.hostiles
    }

    pub fn active_count(&self) -> usize {
        self.hostiles.active_count()
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }
}
