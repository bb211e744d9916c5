use std::fmt::Display;
use std::str::FromStr;

use engine::{resolve_app_paths, LoopConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::AppError;
use crate::content::ContentBundle;
use crate::rng::DEFAULT_SEED;
use crate::scene::{GameScene, SceneConfig};

pub const SEED_ENV_VAR: &str = "SURVIVAL_SEED";
pub const DEMO_SECONDS_ENV_VAR: &str = "SURVIVAL_DEMO_SECONDS";
pub const SCENARIO_ENV_VAR: &str = "SURVIVAL_SCENARIO";
pub const DEFAULT_DEMO_SECONDS: u32 = 120;

/// Knobs read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSettings {
    pub seed: u64,
    pub seconds: u32,
    /// Scenario file under the data directory; `None` uses the built-in content.
    pub scenario_file: Option<String>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            seconds: DEFAULT_DEMO_SECONDS,
            scenario_file: None,
        }
    }
}

impl DemoSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            seed: parse_override(SEED_ENV_VAR, lookup(SEED_ENV_VAR).as_deref(), defaults.seed),
            seconds: parse_override(
                DEMO_SECONDS_ENV_VAR,
                lookup(DEMO_SECONDS_ENV_VAR).as_deref(),
                defaults.seconds,
            ),
            scenario_file: lookup(SCENARIO_ENV_VAR)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty()),
        }
    }
}

/// Unparseable overrides are logged and replaced by `default`.
pub fn parse_override<T>(var: &'static str, raw: Option<&str>, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            warn!(var, value = raw, error = %err, "env_override_ignored");
            default
        }
    }
}

pub struct AppWiring {
    pub config: LoopConfig,
    pub scene: GameScene,
    pub settings: DemoSettings,
}

pub fn build_app(settings: DemoSettings) -> Result<AppWiring, AppError> {
    let content = load_content(&settings)?;
    info!(
        seed = settings.seed,
        seconds = settings.seconds,
        scenario_id = %content.scenario.id,
        stages = content.scenario.stages.len(),
        specials = content.specials.specials.len(),
        "content_ready"
    );

    let scene = GameScene::new(
        SceneConfig {
            seed: settings.seed,
            ..SceneConfig::default()
        },
        content,
    );
    Ok(AppWiring {
        config: LoopConfig::default(),
        scene,
        settings,
    })
}

fn load_content(settings: &DemoSettings) -> Result<ContentBundle, AppError> {
    let Some(scenario_file) = settings.scenario_file.as_deref() else {
        return Ok(ContentBundle::builtin()?);
    };
    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        data_dir = %paths.data_dir.display(),
        scenario_file,
        "content_loading_from_disk"
    );
    Ok(ContentBundle::load_from_dir(&paths.data_dir, scenario_file)?)
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
