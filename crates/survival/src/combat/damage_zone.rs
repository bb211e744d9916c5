use engine::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRole {
    Molotov,
    Shock,
    Acid,
    Rock,
}

/// Presentation colors carried along for the renderer; the simulation never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneStyle {
    pub color: u32,
    pub border_color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageZoneOptions {
    pub style: ZoneStyle,
    pub radius: f32,
    pub duration_ms: f32,
    pub total_damage: f32,
}

/// Circular area that spreads `total_damage` evenly over `duration_ms`.
///
/// The zone holds no references to the entities it hurts. Callers test `contains` for each
/// candidate and apply `sample_damage` once per entity per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageZone {
    role: ZoneRole,
    style: ZoneStyle,
    position: Vec2,
    radius: f32,
    dps: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    active: bool,
}

impl DamageZone {
    pub fn new(role: ZoneRole, position: Vec2, options: DamageZoneOptions) -> Self {
        let has_lifetime = options.duration_ms > 0.0;
        let dps = if has_lifetime {
            options.total_damage / (options.duration_ms / 1000.0)
        } else {
            0.0
        };
        Self {
            role,
            style: options.style,
            position,
            radius: options.radius,
            dps,
            duration_ms: options.duration_ms.max(0.0),
            elapsed_ms: 0.0,
            active: has_lifetime,
        }
    }

    /// Advances the zone and returns how much of `delta_ms` fell inside its lifetime.
    ///
    /// Sampling damage with the returned amount makes the cumulative damage equal the
    /// configured total regardless of tick size. A finished zone returns zero.
    pub fn update(&mut self, delta_ms: f32) -> f32 {
        if !self.active || delta_ms <= 0.0 {
            return 0.0;
        }
        let remaining = (self.duration_ms - self.elapsed_ms).max(0.0);
        let consumed = delta_ms.min(remaining);
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.duration_ms {
            self.active = false;
        }
        consumed
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.radius
    }

    pub fn sample_damage(&self, delta_ms: f32) -> f32 {
        self.dps * delta_ms / 1000.0
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn role(&self) -> ZoneRole {
        self.role
    }

    pub fn style(&self) -> ZoneStyle {
        self.style
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn dps(&self) -> f32 {
        self.dps
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }
}
