use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::warn;

static POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_poisoned_once(operation: &'static str) {
    if !POISON_WARNED.swap(true, Ordering::Relaxed) {
        warn!(operation, "metrics_lock_poisoned");
    }
}

/// Rates over the last metrics window plus run-wide totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub dropped_backlog_ms: f32,
    pub total_ticks: u64,
    pub sim_time_ms: f64,
}

/// Shared read side of the loop metrics. Cloning shares the same slot.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *self.latest.read().unwrap_or_else(|poisoned| {
            warn_poisoned_once("read");
            poisoned.into_inner()
        })
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        let mut slot = self.latest.write().unwrap_or_else(|poisoned| {
            warn_poisoned_once("write");
            poisoned.into_inner()
        });
        *slot = snapshot;
    }
}

#[derive(Debug, Default)]
struct Window {
    elapsed: Duration,
    frames: u32,
    ticks: u32,
    dropped_backlog: Duration,
}

/// Rolls frame and tick counts into rates over a fixed window of driven frame time.
///
/// The window is measured in the frame deltas handed to the driver rather than wall time,
/// so a headless run reports the same rates on every machine.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval: Duration,
    window: Window,
    total_ticks: u64,
    sim_time: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            window: Window::default(),
            total_ticks: 0,
            sim_time: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.window.frames = self.window.frames.saturating_add(1);
        self.window.elapsed = self.window.elapsed.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self, fixed_dt: Duration) {
        self.window.ticks = self.window.ticks.saturating_add(1);
        self.total_ticks = self.total_ticks.saturating_add(1);
        self.sim_time = self.sim_time.saturating_add(fixed_dt);
    }

    pub(crate) fn record_dropped_backlog(&mut self, dropped: Duration) {
        self.window.dropped_backlog = self.window.dropped_backlog.saturating_add(dropped);
    }

    /// Closes the window once it spans the interval.
    pub(crate) fn maybe_snapshot(&mut self) -> Option<LoopMetricsSnapshot> {
        if self.window.elapsed < self.interval {
            return None;
        }
        let window = std::mem::take(&mut self.window);
        let seconds = window.elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match window.frames {
            0 => 0.0,
            frames => window.elapsed.as_secs_f32() * 1000.0 / frames as f32,
        };

        Some(LoopMetricsSnapshot {
            fps: window.frames as f32 / seconds,
            tps: window.ticks as f32 / seconds,
            frame_time_ms,
            dropped_backlog_ms: window.dropped_backlog.as_secs_f32() * 1000.0,
            total_ticks: self.total_ticks,
            sim_time_ms: self.sim_time.as_secs_f64() * 1000.0,
        })
    }
}
