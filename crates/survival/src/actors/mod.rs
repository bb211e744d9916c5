mod infected;
mod player;
mod special;

pub use infected::{
    Impulse, Infected, InfectedConfig, ATTACK_RANGE, SLOW_DURATION_MS, SLOW_FACTOR,
};
pub use player::{Faction, Player, PlayerConfig, PLAYER_MAX_HEALTH};
pub use special::{SpecialInfected, SpecialProfile, ABILITY_SPAWN_GRACE_MS, ENGAGE_RANGE_FACTOR};

/// Which pool a hostile lives in, and at which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostileRef {
    Common(usize),
    Special(usize),
}
