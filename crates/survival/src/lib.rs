pub mod actors;
pub mod app;
pub mod combat;
pub mod content;
pub mod director;
pub mod events;
pub mod hud;
pub mod rng;
pub mod scene;

pub use scene::{GameScene, SceneConfig};
