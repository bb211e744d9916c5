use engine::StartupError;
use thiserror::Error;

use crate::content::ContentError;

mod bootstrap;
mod loop_runner;

pub use bootstrap::{
    build_app, parse_override, AppWiring, DemoSettings, DEFAULT_DEMO_SECONDS,
    DEMO_SECONDS_ENV_VAR, SCENARIO_ENV_VAR, SEED_ENV_VAR,
};
pub use loop_runner::{run, run_demo, scripted_input, DemoReport};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
