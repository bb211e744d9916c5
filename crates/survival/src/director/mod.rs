mod scenario;
mod spawner;
mod special_director;

pub use scenario::{
    ScenarioContext, ScenarioDirector, ScenarioState, COMMON_WAVE_DELAY_MS, COMPLETED_STAGE_ID,
    COMPLETED_STAGE_LABEL, SPECIAL_WAVE_DELAY_MS,
};
pub use spawner::{EnemySpawner, SpawnConfig};
pub use special_director::{
    SpawnOrder, SpecialDirector, SPECIAL_POOL_CAPACITY, SPECIAL_SPAWN_OFFSET,
};
