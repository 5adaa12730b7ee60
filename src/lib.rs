//! TommyJumper - an arcade vertical platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, world generation, collisions, scoring)
//! - `highscores`: Local score table fed by finished runs
//! - `settings`: Device class, seed and driver configuration
//! - `error`: Errors raised by the configuration surface

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::SettingsError;
pub use highscores::{HighScores, ScoreSubmission};
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants (desktop scale, before device multipliers)
pub mod consts {
    /// Logical world size
    pub const WORLD_WIDTH: f32 = 400.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Base gravity added to vertical velocity each step
    pub const GRAVITY: f32 = 0.28;
    /// Base jump velocity (negative = upward)
    pub const JUMP_VELOCITY: f32 = -10.8;
    /// Player is pinned at this y once the world starts scrolling
    pub const SCROLL_TRIGGER_Y: f32 = 260.0;
    /// Vertical gap between successive platforms (half-open range)
    pub const PLATFORM_GAP_MIN: i32 = 55;
    pub const PLATFORM_GAP_MAX: i32 = 85;
    /// Platforms seeded at run start
    pub const INITIAL_PLATFORM_COUNT: usize = 16;
    /// Distance past either edge before the player wraps around
    pub const WRAP_MARGIN: f32 = 24.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 46.0;
    pub const PLAYER_ACCEL: f32 = 0.55;
    pub const PLAYER_BASE_MAX_SPEED: f32 = 3.8;
    pub const PLAYER_MAX_SPEED_PER_LEVEL: f32 = 0.12;
    /// Idle friction multiplier applied to vx with no input
    pub const PLAYER_FRICTION: f32 = 0.9;
    /// Extra gravity per level above 1
    pub const GRAVITY_PER_LEVEL: f32 = 0.08;
    pub const JETPACK_VELOCITY: f32 = -12.8;
    pub const JETPACK_DURATION_TICKS: u32 = 160;
    pub const SHIELD_DURATION_TICKS: u32 = 420;
    /// Vertical velocity after a shield absorbs an enemy
    pub const SHIELD_KNOCKBACK_VELOCITY: f32 = -8.0;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 68.0;
    pub const PLATFORM_HEIGHT: f32 = 16.0;
    pub const SPRING_STRENGTH: f32 = -18.0;
    pub const MOVING_PLATFORM_EDGE: f32 = 10.0;
    pub const BREAK_PROGRESS_START: f32 = 0.01;
    pub const BREAK_PROGRESS_RATE: f32 = 0.08;
    pub const BREAK_PROGRESS_MAX: f32 = 1.5;
    pub const BREAK_SINK_BASE: f32 = 1.5;
    pub const BREAK_SINK_FACTOR: f32 = 2.2;

    /// Enemy defaults
    pub const AERIAL_ENEMY_WIDTH: f32 = 64.0;
    pub const AERIAL_ENEMY_HEIGHT: f32 = 28.0;
    pub const GROUND_ENEMY_WIDTH: f32 = 48.0;
    pub const GROUND_ENEMY_HEIGHT: f32 = 34.0;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_HEIGHT: f32 = 12.0;
    pub const PROJECTILE_VELOCITY: f32 = -8.5;
    pub const PROJECTILE_LIFETIME: u32 = 120;
    /// Projectiles above this y are dropped
    pub const PROJECTILE_CEILING: f32 = -20.0;

    /// Generation window
    pub const SPAWN_CEILING_Y: f32 = -60.0;
    pub const PLATFORM_PRUNE_MARGIN: f32 = 60.0;
    pub const ENEMY_PRUNE_MARGIN: f32 = 80.0;
    /// Player below `WORLD_HEIGHT + FALL_OUT_MARGIN` ends the run
    pub const FALL_OUT_MARGIN: f32 = 60.0;

    /// Scoring
    pub const SCORE_FACTOR: f32 = 3.0;
    pub const PLATFORM_LAND_POINTS: u64 = 25;
    pub const SPRING_LAND_POINTS: u64 = 50;
    pub const MOVING_LAND_POINTS: u64 = 10;
    pub const POWERUP_POINTS: u64 = 50;
    pub const JETPACK_PLATFORM_EQUIV: u64 = 4;
    pub const JETPACK_BONUS_POINTS: u64 = JETPACK_PLATFORM_EQUIV * PLATFORM_LAND_POINTS;
    pub const PLATFORM_PASS_POINTS: u64 = 10;
    pub const ENEMY_DEFEAT_POINTS: u64 = 150;
    pub const POINTS_PER_LEVEL: u64 = 1000;
}

/// Axis-aligned rectangle in world coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Shrink by `dx`/`dy` on each side
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w - 2.0 * dx, self.h - 2.0 * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 5.0, 5.0)));
        // Shared edge is not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_inset() {
        let r = Rect::new(0.0, 0.0, 46.0, 46.0).inset(6.0, 6.0);
        assert_eq!(r, Rect::new(6.0, 6.0, 34.0, 34.0));
    }

    #[test]
    fn test_jetpack_bonus_is_four_landings() {
        assert_eq!(consts::JETPACK_BONUS_POINTS, 100);
    }
}
