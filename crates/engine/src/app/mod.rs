mod clock;
mod input;
mod loop_runner;
mod metrics;
mod pool;
mod scene;

pub use clock::SceneClock;
pub use input::InputAction;
pub use loop_runner::{run_headless, FrameDriver, FrameReport, HeadlessRunSummary, LoopConfig};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use pool::{Pool, Poolable};
pub use scene::{InputSnapshot, Scene, SceneCommand, Vec2, OFF_WORLD};
