//! Fixed-step simulation tick
//!
//! One call to [`tick`] runs the whole pipeline for a frame, in this order:
//!
//! 1. capture: the player's altitude before anything moves
//! 2. integrate: player physics and height score, platform and enemy motion,
//!    projectiles and firing
//! 3. generate: scroll the world, stack new platforms, prune old ones
//! 4. resolve: landings, crossing bonus (against the altitude from 1),
//!    enemy contact, fall-out
//! 5. finalize: clock, total score and level
//! 6. terminal: freeze the final result if 4 reported a fatal outcome
//!
//! Stage 4 reads positions after the scroll in 3; the altitude from 1 is in
//! the unscrolled frame so scrolling does not count as a climb.

use std::cmp::Ordering;

use super::collision;
use super::snapshot::WorldSnapshot;
use super::state::{GameEvent, GamePhase, GameState, PlatformKind};
use super::worldgen;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Steer left (wins over `right` if both are held)
    pub left: bool,
    pub right: bool,
    /// Fire a projectile this tick (on-screen shoot button)
    pub fire: bool,
    /// Demo mode - steering is chosen automatically
    pub idle_mode: bool,
}

impl TickInput {
    pub fn left() -> Self {
        Self {
            left: true,
            ..Default::default()
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Default::default()
        }
    }
}

/// Advance the game by one frame. Returns false if the run is not playing.
///
/// `dt` only feeds the elapsed-time clock; physics moves a fixed amount per
/// frame.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.events.clear();

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    // Capture
    let prev_altitude = state.run.altitude_of(state.player.pos.y);
    let level = state.run.level;

    // Integrate
    state
        .player
        .integrate(&input, level, &state.world, &state.scales);
    collision::track_height(&mut state.run, &state.player);
    for platform in &mut state.platforms {
        platform.update(&state.world, &state.scales);
    }
    for enemy in state
        .aerial_enemies
        .iter_mut()
        .chain(state.ground_enemies.iter_mut())
    {
        enemy.update(&state.world);
    }
    collision::update_projectiles(state);
    collision::auto_fire(state);
    if input.fire {
        collision::fire_projectile(state, false);
    }

    // Generate
    worldgen::scroll_and_generate(state);

    // Resolve
    collision::resolve_landings(state);
    collision::award_crossings(state, prev_altitude);
    let mut fatal = collision::resolve_enemy_contacts(state);
    if collision::fell_out(state) {
        log::debug!("Player fell out at y={:.1}", state.player.pos.y);
        fatal = true;
    }

    // Finalize
    state.run.advance_clock(dt);
    if let Some(level) = state.run.finalize() {
        log::info!("Level {} reached at score {}", level, state.run.score);
        state.events.push(GameEvent::LevelUp { level });
    }

    // Terminal
    if fatal {
        state.finish_run();
    }

    true
}

/// Tick and hand back the render snapshot for the new frame
pub fn step(state: &mut GameState, input: &TickInput, dt: f32) -> WorldSnapshot {
    tick(state, input, dt);
    state.snapshot()
}

/// Demo steering: head for the nearest platform worth landing on.
///
/// While rising it aims at the closest platform above the feet, while
/// falling at the closest one below. Breakables are ignored.
pub fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let player = &state.player;
    let feet = player.pos.y + player.size.y;
    let rising = player.vel.y < 0.0;

    let target = state
        .platforms
        .iter()
        .filter(|p| p.is_landable() && p.kind != PlatformKind::Breakable)
        .filter(|p| if rising { p.pos.y < feet } else { p.pos.y >= feet - 4.0 })
        .min_by(|a, b| {
            (a.pos.y - feet)
                .abs()
                .partial_cmp(&(b.pos.y - feet).abs())
                .unwrap_or(Ordering::Equal)
        });

    let mut steer = TickInput {
        fire: input.fire,
        ..Default::default()
    };
    if let Some(platform) = target {
        let dx = platform.pos.x + platform.size.x / 2.0 - player.center_x();
        if dx < -6.0 {
            steer.left = true;
        } else if dx > 6.0 {
            steer.right = true;
        }
    }
    steer
}
