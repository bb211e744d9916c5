/// Monotonic scene time in milliseconds.
///
/// Every timed component reads this clock instead of wall time, so suspending it freezes
/// cooldowns, reloads and stage timers together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneClock {
    now_ms: f64,
    paused: bool,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            paused: false,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Returns false without moving when paused or when the delta is not a positive number.
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        if self.paused || !delta_ms.is_finite() || delta_ms <= 0.0 {
            return false;
        }
        self.now_ms += f64::from(delta_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_deltas() {
        let mut clock = SceneClock::new();
        assert!(clock.advance(16.0));
        assert!(clock.advance(17.0));
        assert_eq!(clock.now_ms(), 33.0);
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut clock = SceneClock::starting_at(1000.0);
        clock.set_paused(true);

        assert!(!clock.advance(500.0));
        assert_eq!(clock.now_ms(), 1000.0);

        clock.set_paused(false);
        assert!(clock.advance(500.0));
        assert_eq!(clock.now_ms(), 1500.0);
    }

    #[test]
    fn non_positive_or_nan_delta_is_ignored() {
        let mut clock = SceneClock::new();
        assert!(!clock.advance(0.0));
        assert!(!clock.advance(-5.0));
        assert!(!clock.advance(f32::NAN));
        assert_eq!(clock.now_ms(), 0.0);
    }
}
