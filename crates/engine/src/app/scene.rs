use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Per-tick input sample.
///
/// Movement and aim are the normalized stick vectors sampled once per tick. Actions are
/// edge-triggered: a pressed action is visible to exactly one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    move_vector: Vec2,
    aim_vector: Vec2,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn move_vector(&self) -> Vec2 {
        self.move_vector
    }

    pub fn aim_vector(&self) -> Vec2 {
        self.aim_vector
    }

    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.actions.is_pressed(action)
    }

    pub fn with_move_vector(mut self, move_vector: Vec2) -> Self {
        self.move_vector = move_vector;
        self
    }

    pub fn with_aim_vector(mut self, aim_vector: Vec2) -> Self {
        self.aim_vector = aim_vector;
        self
    }

    pub fn with_action_pressed(mut self, action: InputAction, is_pressed: bool) -> Self {
        self.actions.set(action, is_pressed);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Where released pooled objects are parked.
pub const OFF_WORLD: Vec2 = Vec2 {
    x: -9999.0,
    y: -9999.0,
};

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(radians: f32) -> Self {
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length <= f32::EPSILON {
            return Self::ZERO;
        }
        Self {
            x: self.x / length,
            y: self.y / length,
        }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn rotated(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn lerp(self, target: Vec2, t: f32) -> Self {
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        self.scaled(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_ms: f32, input: &InputSnapshot) -> SceneCommand;
    fn unload(&mut self) {}
    fn debug_title(&self) -> Option<String> {
        None
    }
}
