use std::time::Duration;

use tracing::{info, warn};

use super::metrics::MetricsAccumulator;
use super::{InputSnapshot, MetricsHandle, Scene, SceneCommand};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    /// Frame delta fed to the driver by `run_headless`. Zero means one fixed tick per frame.
    pub headless_frame_delta: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            headless_frame_delta: Duration::ZERO,
        }
    }
}

/// Outcome of a single driven frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub ticks_run: u32,
    pub dropped_backlog: Duration,
    pub quit_requested: bool,
}

/// Totals of a `run_headless` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadlessRunSummary {
    pub frames: u32,
    pub ticks: u64,
    pub quit_requested: bool,
}

/// Fixed-step accumulator that turns variable frame deltas into scene ticks.
#[derive(Debug)]
pub struct FrameDriver {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    tick_index: u64,
    metrics: MetricsAccumulator,
    metrics_handle: MetricsHandle,
}

impl FrameDriver {
    pub fn new(config: &LoopConfig) -> Self {
        Self::with_metrics(config, MetricsHandle::default())
    }

    pub fn with_metrics(config: &LoopConfig, metrics_handle: MetricsHandle) -> Self {
        let target_tps = config.target_tps.max(1);
        let max_frame_delta =
            normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
        let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
        let metrics_log_interval =
            normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));

        info!(
            target_tps,
            max_frame_delta_ms = max_frame_delta.as_millis() as u64,
            max_ticks_per_frame,
            metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
            "loop_config"
        );

        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / target_tps as f64),
            max_frame_delta,
            max_ticks_per_frame,
            accumulator: Duration::ZERO,
            tick_index: 0,
            metrics: MetricsAccumulator::new(metrics_log_interval),
            metrics_handle,
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub fn fixed_dt_ms(&self) -> f32 {
        self.fixed_dt.as_secs_f32() * 1000.0
    }

    pub fn ticks_run(&self) -> u64 {
        self.tick_index
    }

    pub fn metrics_handle(&self) -> &MetricsHandle {
        &self.metrics_handle
    }

    /// Runs as many fixed ticks as the accumulated time allows, up to the per-frame cap.
    ///
    /// `input_for_tick` is called once per tick with the global tick index. The frame stops
    /// early when the scene asks to quit.
    pub fn frame<S, F>(
        &mut self,
        scene: &mut S,
        raw_frame_dt: Duration,
        mut input_for_tick: F,
    ) -> FrameReport
    where
        S: Scene + ?Sized,
        F: FnMut(u64) -> InputSnapshot,
    {
        let frame_dt = clamp_frame_delta(raw_frame_dt, self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(frame_dt);

        let step_plan = plan_sim_steps(self.accumulator, self.fixed_dt, self.max_ticks_per_frame);
        self.accumulator = step_plan.remaining_accumulator;

        let fixed_dt_ms = self.fixed_dt_ms();
        let mut ticks_run = 0u32;
        let mut quit_requested = false;
        for _ in 0..step_plan.ticks_to_run {
            let input = input_for_tick(self.tick_index);
            let command = scene.update(fixed_dt_ms, &input);
            self.tick_index = self.tick_index.saturating_add(1);
            self.metrics.record_tick(self.fixed_dt);
            ticks_run = ticks_run.saturating_add(1);
            if command == SceneCommand::Quit {
                info!(reason = "scene_command", "shutdown_requested");
                quit_requested = true;
                break;
            }
        }

        if !step_plan.dropped_backlog.is_zero() {
            self.metrics.record_dropped_backlog(step_plan.dropped_backlog);
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "sim_backlog_dropped"
            );
        }

        self.metrics.record_frame(frame_dt);
        if let Some(snapshot) = self.metrics.maybe_snapshot() {
            self.metrics_handle.publish(snapshot);
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                total_ticks = snapshot.total_ticks,
                sim_time_ms = snapshot.sim_time_ms,
                scene = scene.debug_title().as_deref().unwrap_or("scene"),
                "loop_metrics"
            );
        }

        FrameReport {
            ticks_run,
            dropped_backlog: step_plan.dropped_backlog,
            quit_requested,
        }
    }
}

/// Loads the scene, drives it for `frames` frames without a window, then unloads it.
pub fn run_headless<S, F>(
    config: &LoopConfig,
    scene: &mut S,
    frames: u32,
    mut input_for_tick: F,
) -> HeadlessRunSummary
where
    S: Scene + ?Sized,
    F: FnMut(u64) -> InputSnapshot,
{
    let mut driver = FrameDriver::new(config);
    let frame_delta = normalize_non_zero_duration(config.headless_frame_delta, driver.fixed_dt());

    scene.load();
    info!(
        scene = scene.debug_title().as_deref().unwrap_or("scene"),
        frames,
        frame_delta_ms = frame_delta.as_secs_f32() * 1000.0,
        "scene_loaded"
    );

    let mut summary = HeadlessRunSummary::default();
    for _ in 0..frames {
        let report = driver.frame(scene, frame_delta, &mut input_for_tick);
        summary.frames = summary.frames.saturating_add(1);
        if report.quit_requested {
            summary.quit_requested = true;
            break;
        }
    }
    summary.ticks = driver.ticks_run();

    scene.unload();
    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        quit_requested = summary.quit_requested,
        "shutdown"
    );
    summary
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
