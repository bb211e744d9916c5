mod ability;
mod damage_zone;
mod projectile;
mod throwable;
mod weapon;

pub use ability::{
    resolve_ability, AbilityEffect, AbilityPayload, POUNCE_HIT_RADIUS, RIDE_TICK_INTERVAL_MS,
    VOMIT_HORDE_SIZE,
};
pub use damage_zone::{DamageZone, DamageZoneOptions, ZoneRole, ZoneStyle};
pub use projectile::{
    Projectile, ProjectileLaunch, ProjectilePool, DEFAULT_PROJECTILE_LIFESPAN_MS,
    PROJECTILE_HIT_RADIUS, PROJECTILE_POOL_CAPACITY,
};
pub use throwable::{
    ActiveZone, Throwable, ThrowableConfig, ThrowableKind, ThrowableSystem, ZonePulse,
    SHOCK_SLOW_RADIUS, THROWABLE_POOL_CAPACITY,
};
pub use weapon::{
    FireContext, ReloadProgress, WeaponDefinition, WeaponRuntime, WeaponSlot, WeaponSummary,
    WeaponSystem,
};
