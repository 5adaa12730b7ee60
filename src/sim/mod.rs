//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete steps only; `dt` feeds the clock, not the physics
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod scale;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use collision::{crossing_bonus, landing_points};
pub use scale::{DeviceClass, DeviceScales, World};
pub use snapshot::{EnemyView, HudSnapshot, PlatformView, PlayerView, ProjectileView, WorldSnapshot};
pub use state::{
    Enemy, EnemyKind, FinalResult, GameEvent, GamePhase, GameState, Platform, PlatformKind, Player,
    PowerUp, Projectile, RunState, Spring, level_for_score,
};
pub use tick::{TickInput, autopilot, step, tick};
