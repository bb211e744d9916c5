use std::collections::HashMap;

use engine::{Pool, Poolable, Vec2};
use tracing::{debug, warn};

use crate::actors::{SpecialInfected, SpecialProfile};
use crate::content::{SpecialKind, SpecialRoster};
use crate::events::{CombatEvent, CombatEventBus};
use crate::rng::GameRng;

pub const SPECIAL_POOL_CAPACITY: usize = 16;
/// Per-axis bound of the random offset used when no spawn position is given.
pub const SPECIAL_SPAWN_OFFSET: i32 = 600;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub kind: SpecialKind,
    pub position: Option<Vec2>,
    /// Scene time at which the order becomes due; `None` means the next update.
    pub due_at: Option<f64>,
}

/// Spawn queue and AI driver for named specials.
#[derive(Debug, Clone)]
pub struct SpecialDirector {
    profiles: HashMap<SpecialKind, SpecialProfile>,
    specials: Pool<SpecialInfected>,
    pending: Vec<SpawnOrder>,
}

impl SpecialDirector {
    pub fn new(roster: &SpecialRoster) -> Self {
        Self::with_capacity(roster, SPECIAL_POOL_CAPACITY)
    }

    pub fn with_capacity(roster: &SpecialRoster, capacity: usize) -> Self {
        let profiles = roster
            .specials
            .iter()
            .map(|definition| (definition.id, SpecialProfile::from_definition(definition)))
            .collect();
        Self {
            profiles,
            specials: Pool::new(capacity),
            pending: Vec::new(),
        }
    }

    /// Defers a spawn by `delay_ms` of scene time, or to the next update when `None`.
    pub fn schedule_spawn(
        &mut self,
        kind: SpecialKind,
        position: Option<Vec2>,
        delay_ms: Option<f64>,
        now_ms: f64,
    ) {
        self.pending.push(SpawnOrder {
            kind,
            position,
            due_at: delay_ms.map(|delay| now_ms + delay),
        });
    }

    /// Spawns one special at `position`, or at a random offset from `target`.
    ///
    /// Returns the pool slot, or `None` when the kind is unknown or the pool is saturated.
    pub fn spawn_now(
        &mut self,
        kind: SpecialKind,
        position: Option<Vec2>,
        target: Vec2,
        now_ms: f64,
        rng: &mut GameRng,
    ) -> Option<usize> {
        let Some(profile) = self.profiles.get(&kind).copied() else {
            warn!(special = %kind, "special_spawn_unknown_kind");
            return None;
        };
        let spawn_position = position.unwrap_or_else(|| {
            target
                + Vec2::new(
                    rng.int_between(-SPECIAL_SPAWN_OFFSET, SPECIAL_SPAWN_OFFSET) as f32,
                    rng.int_between(-SPECIAL_SPAWN_OFFSET, SPECIAL_SPAWN_OFFSET) as f32,
                )
        });

        let capacity = self.specials.capacity();
        let Some((slot, special)) = self
            .specials
            .acquire_with(|| SpecialInfected::new(profile))
        else {
            debug!(special = %kind, capacity, "special_spawn_dropped_pool_saturated");
            return None;
        };
        special.configure(profile);
        special.spawn(spawn_position, now_ms);
        debug!(special = %kind, slot, x = spawn_position.x, y = spawn_position.y, "special_spawned");
        Some(slot)
    }

    /// Flushes due orders, then runs every special's AI; triggered abilities go on the bus.
    pub fn update(
        &mut self,
        target: Vec2,
        now_ms: f64,
        rng: &mut GameRng,
        events: &mut CombatEventBus,
    ) {
        self.flush_queue(target, now_ms, rng);

        for (slot, special) in self.specials.iter_active_mut() {
            if let Some(payload) = special.update_ai(slot, target, now_ms) {
                events.emit(CombatEvent::SpecialAbility(payload));
            }
        }
    }

    fn flush_queue(&mut self, target: Vec2, now_ms: f64, rng: &mut GameRng) {
        if self.pending.is_empty() {
            return;
        }
        let (due, waiting): (Vec<SpawnOrder>, Vec<SpawnOrder>) = self
            .pending
            .drain(..)
            .partition(|order| order.due_at.map_or(true, |due_at| due_at <= now_ms));
        self.pending = waiting;
        for order in due {
            self.spawn_now(order.kind, order.position, target, now_ms, rng);
        }
    }

    /// Deactivates every special and forgets queued orders.
    pub fn clear(&mut self) {
        for (_, special) in self.specials.iter_active_mut() {
            special.deactivate();
        }
        self.pending.clear();
    }

    pub fn specials(&self) -> &Pool<SpecialInfected> {
        &self.specials
    }

    pub fn specials_mut(&mut self) -> &mut Pool<SpecialInfected> {
        &mut self.specials
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn active_count(&self) -> usize {
        self.specials.active_count()
    }
}
