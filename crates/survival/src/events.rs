use engine::Vec2;

use crate::actors::HostileRef;
use crate::combat::{AbilityPayload, ThrowableKind};

/// Same-tick side channel between producers (AI, throwables, director) and combat resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    ProjectileFired {
        origin: Vec2,
        velocity: Vec2,
        damage: f32,
    },
    ProjectileHit {
        target: HostileRef,
        damage: f32,
    },
    HostileKilled {
        target: HostileRef,
    },
    InfectedAttack {
        slot: usize,
        damage: f32,
    },
    SpecialAbility(AbilityPayload),
    ThrowableDetonated {
        kind: ThrowableKind,
        position: Vec2,
    },
    AreaSlow {
        center: Vec2,
        radius: f32,
    },
    PlayerDamaged {
        amount: f32,
    },
    StageStarted {
        stage_index: usize,
    },
    ScenarioCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEventKind {
    ProjectileFired,
    ProjectileHit,
    HostileKilled,
    InfectedAttack,
    SpecialAbility,
    ThrowableDetonated,
    AreaSlow,
    PlayerDamaged,
    StageStarted,
    ScenarioCompleted,
}

impl CombatEvent {
    pub fn kind(&self) -> CombatEventKind {
        match self {
            Self::ProjectileFired { .. } => CombatEventKind::ProjectileFired,
            Self::ProjectileHit { .. } => CombatEventKind::ProjectileHit,
            Self::HostileKilled { .. } => CombatEventKind::HostileKilled,
            Self::InfectedAttack { .. } => CombatEventKind::InfectedAttack,
            Self::SpecialAbility(_) => CombatEventKind::SpecialAbility,
            Self::ThrowableDetonated { .. } => CombatEventKind::ThrowableDetonated,
            Self::AreaSlow { .. } => CombatEventKind::AreaSlow,
            Self::PlayerDamaged { .. } => CombatEventKind::PlayerDamaged,
            Self::StageStarted { .. } => CombatEventKind::StageStarted,
            Self::ScenarioCompleted => CombatEventKind::ScenarioCompleted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatEventCounts {
    pub total: u32,
    pub projectile_fired: u32,
    pub projectile_hit: u32,
    pub hostile_killed: u32,
    pub infected_attack: u32,
    pub special_ability: u32,
    pub throwable_detonated: u32,
    pub area_slow: u32,
    pub player_damaged: u32,
    pub stage_started: u32,
    pub scenario_completed: u32,
}

impl CombatEventCounts {
    fn record(&mut self, kind: CombatEventKind) {
        self.total = self.total.saturating_add(1);
        let counter = match kind {
            CombatEventKind::ProjectileFired => &mut self.projectile_fired,
            CombatEventKind::ProjectileHit => &mut self.projectile_hit,
            CombatEventKind::HostileKilled => &mut self.hostile_killed,
            CombatEventKind::InfectedAttack => &mut self.infected_attack,
            CombatEventKind::SpecialAbility => &mut self.special_ability,
            CombatEventKind::ThrowableDetonated => &mut self.throwable_detonated,
            CombatEventKind::AreaSlow => &mut self.area_slow,
            CombatEventKind::PlayerDamaged => &mut self.player_damaged,
            CombatEventKind::StageStarted => &mut self.stage_started,
            CombatEventKind::ScenarioCompleted => &mut self.scenario_completed,
        };
        *counter = counter.saturating_add(1);
    }

    fn absorb(&mut self, other: &CombatEventCounts) {
        self.total = self.total.saturating_add(other.total);
        self.projectile_fired = self.projectile_fired.saturating_add(other.projectile_fired);
        self.projectile_hit = self.projectile_hit.saturating_add(other.projectile_hit);
        self.hostile_killed = self.hostile_killed.saturating_add(other.hostile_killed);
        self.infected_attack = self.infected_attack.saturating_add(other.infected_attack);
        self.special_ability = self.special_ability.saturating_add(other.special_ability);
        self.throwable_detonated = self
            .throwable_detonated
            .saturating_add(other.throwable_detonated);
        self.area_slow = self.area_slow.saturating_add(other.area_slow);
        self.player_damaged = self.player_damaged.saturating_add(other.player_damaged);
        self.stage_started = self.stage_started.saturating_add(other.stage_started);
        self.scenario_completed = self
            .scenario_completed
            .saturating_add(other.scenario_completed);
    }
}

#[derive(Debug, Default)]
pub struct CombatEventBus {
    current_tick_events: Vec<CombatEvent>,
    last_tick_counts: CombatEventCounts,
    lifetime_counts: CombatEventCounts,
}

impl CombatEventBus {
    pub fn emit(&mut self, event: CombatEvent) {
        self.current_tick_events.push(event);
    }

    pub fn iter_emitted_so_far(&self) -> impl Iterator<Item = &CombatEvent> {
        self.current_tick_events.iter()
    }

    pub fn emitted_len(&self) -> usize {
        self.current_tick_events.len()
    }

    /// Events emitted from `start` onward, copied out so the caller may keep emitting.
    pub fn snapshot_from(&self, start: usize) -> Vec<CombatEvent> {
        self.current_tick_events
            .get(start..)
            .map(<[CombatEvent]>::to_vec)
            .unwrap_or_default()
    }

    pub fn finish_tick_rollover(&mut self) {
        let mut counts = CombatEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.lifetime_counts.absorb(&counts);
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    pub fn last_tick_counts(&self) -> CombatEventCounts {
        self.last_tick_counts
    }

    pub fn lifetime_counts(&self) -> CombatEventCounts {
        self.lifetime_counts
    }
}
