use std::f32::consts::PI;

use engine::Vec2;
use serde::{Deserialize, Serialize};

use crate::combat::{WeaponDefinition, WeaponSystem};

pub const PLAYER_MAX_HEALTH: f32 = 100.0;
/// Aim inputs shorter than this keep the previous aim.
const AIM_DEADZONE_SQUARED: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    #[default]
    Survivor,
    Infected,
}

impl Faction {
    pub fn toggled(self) -> Self {
        match self {
            Faction::Survivor => Faction::Infected,
            Faction::Infected => Faction::Survivor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Survivor => "survivor",
            Faction::Infected => "infected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub id: String,
    pub speed: f32,
    pub max_health: f32,
    pub primary: WeaponDefinition,
    pub secondary: WeaponDefinition,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            id: "player-local".to_string(),
            speed: 320.0,
            max_health: PLAYER_MAX_HEALTH,
            primary: WeaponDefinition::carbine(),
            secondary: WeaponDefinition::pistol(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pounce {
    direction: Vec2,
    speed: f32,
    ends_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    from: Vec2,
    to: Vec2,
    started_at: f64,
    duration_ms: f64,
}

fn sine_in_out(t: f32) -> f32 {
    -((PI * t).cos() - 1.0) / 2.0
}

#[derive(Debug, Clone)]
pub struct Player {
    id: String,
    speed: f32,
    max_health: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    move_vector: Vec2,
    aim_vector: Vec2,
    health: f32,
    faction: Faction,
    pub weapons: WeaponSystem,
    pounce: Option<Pounce>,
    drag: Option<Drag>,
    bile_until: f64,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            weapons: WeaponSystem::new(config.primary, config.secondary),
            id: config.id,
            speed: config.speed,
            max_health: config.max_health,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            move_vector: Vec2::ZERO,
            aim_vector: Vec2::new(1.0, 0.0),
            health: config.max_health,
            faction: Faction::Survivor,
            pounce: None,
            drag: None,
            bile_until: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn update_movement(&mut self, vector: Vec2) {
        self.move_vector = vector;
    }

    pub fn update_aim(&mut self, vector: Vec2) {
        if vector.length_squared() > AIM_DEADZONE_SQUARED {
            self.aim_vector = vector;
        }
    }

    pub fn aim_vector(&self) -> Vec2 {
        self.aim_vector
    }

    /// Resolves this tick's velocity from the pounce or the movement stick.
    pub fn update(&mut self, now_ms: f64) {
        if let Some(pounce) = self.pounce {
            self.velocity = pounce.direction.scaled(pounce.speed);
            if now_ms >= pounce.ends_at {
                self.end_hunter_pounce();
            }
            return;
        }
        let mut direction = self.move_vector;
        if direction.length() > 1.0 {
            direction = direction.normalized();
        }
        self.velocity = direction.scaled(self.speed);
    }

    pub fn integrate(&mut self, dt_ms: f32, now_ms: f64) {
        if let Some(drag) = self.drag {
            let progress = if drag.duration_ms > 0.0 {
                ((now_ms - drag.started_at) / drag.duration_ms).clamp(0.0, 1.0) as f32
            } else {
                1.0
            };
            self.position = drag.from.lerp(drag.to, sine_in_out(progress));
            if progress >= 1.0 {
                self.drag = None;
            }
            return;
        }
        self.position += self.velocity * (dt_ms / 1000.0);
    }

    /// Moves the player to `position`, dropping any drag or pounce in progress.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.drag = None;
        self.pounce = None;
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn set_faction(&mut self, faction: Faction) {
        self.faction = faction;
        if faction != Faction::Infected {
            self.end_hunter_pounce();
        }
    }

    /// Returns false when already pouncing or when `direction` is zero.
    pub fn start_hunter_pounce(
        &mut self,
        speed: f32,
        duration_ms: f64,
        direction: Vec2,
        now_ms: f64,
    ) -> bool {
        if self.pounce.is_some() || direction.length_squared() == 0.0 {
            return false;
        }
        self.pounce = Some(Pounce {
            direction: direction.normalized(),
            speed,
            ends_at: now_ms + duration_ms,
        });
        true
    }

    pub fn end_hunter_pounce(&mut self) {
        if self.pounce.take().is_some() {
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn is_hunter_pouncing(&self) -> bool {
        self.pounce.is_some()
    }

    pub fn start_drag(&mut self, toward: Vec2, duration_ms: f64, now_ms: f64) {
        self.drag = Some(Drag {
            from: self.position,
            to: toward,
            started_at: now_ms,
            duration_ms,
        });
    }

    pub fn is_dragged(&self) -> bool {
        self.drag.is_some()
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn mark_bile_covered(&mut self, until_ms: f64) {
        self.bile_until = self.bile_until.max(until_ms);
    }

    pub fn is_bile_covered(&self, now_ms: f64) -> bool {
        now_ms < self.bile_until
    }
}
