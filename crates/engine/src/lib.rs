use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;

pub use app::{
    run_headless, FrameDriver, FrameReport, HeadlessRunSummary, InputAction, InputSnapshot,
    LoopConfig, LoopMetricsSnapshot, MetricsHandle, Pool, Poolable, Scene, SceneClock,
    SceneCommand, Vec2, OFF_WORLD,
};

pub const ROOT_ENV_VAR: &str = "SURVIVAL_ROOT";
pub const DATA_DIR_NAME: &str = "data";

/// Where a run reads its content from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    fn at(root: PathBuf) -> Self {
        let data_dir = root.join(DATA_DIR_NAME);
        Self { root, data_dir }
    }

    pub fn data_file(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "{var} points to {path}, which is not a project root \
(expected Cargo.toml next to a data/ directory)"
    )]
    InvalidEnvRoot { var: &'static str, path: PathBuf },
    #[error(
        "no project root above {start_dir} (expected Cargo.toml next to a data/ directory); \
set {var} to the checkout, e.g. export {var}=\"/path/to/survival\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        var: &'static str,
    },
}

/// Resolves the project root from `SURVIVAL_ROOT`, or by walking up from the executable.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = match env::var(ROOT_ENV_VAR) {
        Ok(value) => root_from_override(Path::new(&value))?,
        Err(env::VarError::NotPresent) => discover_root(&executable_dir()?)?,
        Err(source) => {
            return Err(StartupError::EnvVar {
                var: ROOT_ENV_VAR,
                source,
            })
        }
    };
    Ok(AppPaths::at(root))
}

fn root_from_override(path: &Path) -> Result<PathBuf, StartupError> {
    let path = canonical_or_raw(path);
    if is_project_root(&path) {
        Ok(path)
    } else {
        Err(StartupError::InvalidEnvRoot {
            var: ROOT_ENV_VAR,
            path,
        })
    }
}

fn executable_dir() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or(StartupError::ExeHasNoParent(exe))
}

fn discover_root(start_dir: &Path) -> Result<PathBuf, StartupError> {
    start_dir
        .ancestors()
        .find(|candidate| is_project_root(candidate))
        .map(canonical_or_raw)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: canonical_or_raw(start_dir),
            var: ROOT_ENV_VAR,
        })
}

fn is_project_root(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join(DATA_DIR_NAME).is_dir()
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
