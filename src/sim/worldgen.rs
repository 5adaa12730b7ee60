//! Procedural world generation
//!
//! The world is an endless column of platforms. When the player climbs past
//! the scroll trigger everything is shifted down, new platforms are stacked
//! above the visible window and whatever fell off the bottom is dropped.

use glam::Vec2;

use super::scale::{chance, rand_f32, rand_i32};
use super::state::{Enemy, EnemyKind, GameState, Platform, PlatformKind, PowerUp};
use crate::consts::*;

/// Fixed weight for bouncy platforms
pub const BOUNCY_WEIGHT: f32 = 0.12;
/// Chance that a bouncy platform carries a power-up
pub const POWERUP_CHANCE: f32 = 0.2;
/// Jetpack share of power-ups spawned during play
pub const JETPACK_SHARE: f32 = 0.55;
/// Jetpack share of power-ups in the starting world
pub const INITIAL_JETPACK_SHARE: f32 = 0.5;
/// Levels at which each enemy type starts appearing
pub const AERIAL_MIN_LEVEL: u32 = 2;
pub const GROUND_MIN_LEVEL: u32 = 3;

/// Weight of moving platforms at `level`
pub fn moving_weight(level: u32) -> f32 {
    (0.1 + level as f32 * 0.02).min(0.3)
}

/// Weight of breakable platforms at `level`
pub fn breakable_weight(level: u32) -> f32 {
    (0.05 + level as f32 * 0.02).min(0.25)
}

/// Pick a platform kind from a uniform roll in `[0, 1)`
pub fn platform_kind_for_roll(roll: f32, level: u32) -> PlatformKind {
    let moving = moving_weight(level);
    let breakable = breakable_weight(level);

    if roll < moving {
        PlatformKind::Moving
    } else if roll < moving + breakable {
        PlatformKind::Breakable
    } else if roll < moving + breakable + BOUNCY_WEIGHT {
        PlatformKind::Bouncy
    } else {
        PlatformKind::Normal
    }
}

/// Chance of an aerial enemy next to a new platform
pub fn aerial_chance(level: u32) -> f32 {
    (0.02 + level as f32 * 0.002).min(0.06)
}

/// Chance of a ground enemy next to a new platform
pub fn ground_chance(level: u32) -> f32 {
    (0.03 + level as f32 * 0.003).min(0.09)
}

fn roll_platform_kind(state: &mut GameState) -> PlatformKind {
    let roll = rand_f32(&mut state.rng, 0.0, 1.0);
    platform_kind_for_roll(roll, state.run.level)
}

fn roll_power_up(state: &mut GameState, jetpack_share: f32) -> PowerUp {
    if chance(&mut state.rng, jetpack_share) {
        PowerUp::Jetpack
    } else {
        PowerUp::Shield
    }
}

fn random_gap(state: &mut GameState) -> f32 {
    rand_i32(&mut state.rng, state.world.gap_min, state.world.gap_max) as f32
}

/// Build the starting platform stack and stand the player on the first one
pub fn seed_initial_world(state: &mut GameState) {
    let width = state.world.width;
    let mut last_y = state.world.height - 20.0;

    for i in 0..state.world.platform_count {
        let kind = if i == 0 {
            PlatformKind::Normal
        } else {
            roll_platform_kind(state)
        };
        let x = rand_i32(&mut state.rng, 20, (width - 88.0) as i32) as f32;
        let id = state.next_entity_id();
        let mut platform = Platform::new(id, Vec2::new(x, last_y), kind, &mut state.rng, &state.scales);

        // The first couple of platforms stay plain
        if i > 1 && chance(&mut state.rng, POWERUP_CHANCE) && kind == PlatformKind::Bouncy {
            platform.power_up = Some(roll_power_up(state, INITIAL_JETPACK_SHARE));
        }
        state.platforms.push(platform);
        last_y -= random_gap(state);
    }

    if let Some(first) = state.platforms.first_mut() {
        first.pos.x = width / 2.0 - first.size.x / 2.0;
        first.pos.y = state.world.height - 50.0;
        state.player.pos.y = first.pos.y - state.player.size.y;
    }
}

/// Shift the world down so the player stays pinned at the scroll trigger.
///
/// Returns the distance scrolled (0 if the player is below the trigger).
/// Projectiles are left where they are.
pub fn scroll(state: &mut GameState) -> f32 {
    let trigger = state.world.scroll_trigger_y;
    if state.player.pos.y >= trigger {
        return 0.0;
    }

    let dy = trigger - state.player.pos.y;
    state.player.pos.y += dy;
    for platform in &mut state.platforms {
        platform.pos.y += dy;
    }
    for enemy in state.aerial_enemies.iter_mut().chain(state.ground_enemies.iter_mut()) {
        enemy.pos.y += dy;
    }
    state.run.scroll_offset += dy;
    dy
}

/// Stack new platforms (and maybe enemies) until the top of the field is
/// above the spawn ceiling
pub fn spawn_if_needed(state: &mut GameState) {
    let width = state.world.width;
    let level = state.run.level;
    let mut highest = state
        .platforms
        .iter()
        .map(|p| p.pos.y)
        .fold(f32::INFINITY, f32::min);
    if !highest.is_finite() {
        highest = state.world.height;
    }

    let mut spawned = 0usize;
    while highest > SPAWN_CEILING_Y {
        highest -= random_gap(state);
        let x = rand_i32(&mut state.rng, 10, (width - 78.0) as i32) as f32;
        let kind = roll_platform_kind(state);
        let id = state.next_entity_id();
        let mut platform = Platform::new(id, Vec2::new(x, highest), kind, &mut state.rng, &state.scales);
        if chance(&mut state.rng, POWERUP_CHANCE) && kind == PlatformKind::Bouncy {
            platform.power_up = Some(roll_power_up(state, JETPACK_SHARE));
        }
        state.platforms.push(platform);
        spawned += 1;

        if chance(&mut state.rng, aerial_chance(level)) && level >= AERIAL_MIN_LEVEL {
            let x = rand_i32(&mut state.rng, 10, (width - 70.0) as i32) as f32;
            let y = highest - rand_i32(&mut state.rng, 60, 180) as f32;
            spawn_enemy(state, EnemyKind::Aerial, Vec2::new(x, y));
        }
        if chance(&mut state.rng, ground_chance(level)) && level >= GROUND_MIN_LEVEL {
            let x = rand_i32(&mut state.rng, 10, (width - 58.0) as i32) as f32;
            let y = highest - rand_i32(&mut state.rng, 40, 140) as f32;
            spawn_enemy(state, EnemyKind::Ground, Vec2::new(x, y));
        }
    }

    if spawned > 0 {
        log::debug!("Generated {} platforms at level {}", spawned, level);
    }
}

fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
    let id = state.next_entity_id();
    let enemy = Enemy::new(id, kind, pos, &mut state.rng, &state.scales);
    log::debug!("Spawned {:?} enemy {} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
    match kind {
        EnemyKind::Aerial => state.aerial_enemies.push(enemy),
        EnemyKind::Ground => state.ground_enemies.push(enemy),
    }
}

/// Drop entities that fell below the visible window
pub fn prune(state: &mut GameState) {
    let platform_floor = state.world.height + PLATFORM_PRUNE_MARGIN;
    let enemy_floor = state.world.height + ENEMY_PRUNE_MARGIN;
    state.platforms.retain(|p| p.pos.y < platform_floor);
    state.aerial_enemies.retain(|e| e.pos.y < enemy_floor);
    state.ground_enemies.retain(|e| e.pos.y < enemy_floor);
}

/// Scroll, extend and prune in one go. Returns the distance scrolled.
pub fn scroll_and_generate(state: &mut GameState) -> f32 {
    let dy = scroll(state);
    if dy > 0.0 {
        spawn_if_needed(state);
        prune(state);
    }
    dy
}
