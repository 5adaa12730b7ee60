//! Collision resolution and scoring
//!
//! All overlap tests are axis-aligned boxes. Each function here is one stage
//! of the step pipeline and only touches the parts of [`GameState`] it names.

use super::state::{
    EnemyKind, GameEvent, GameState, Platform, PlatformKind, Player, PowerUp, Projectile, RunState,
};
use crate::consts::*;

/// Ground enemies must be at least this far above the player to be targeted
pub const AUTO_FIRE_MIN_HEIGHT: f32 = 40.0;
/// Horizontal distance within which a ground enemy is targeted
pub const AUTO_FIRE_RANGE_X: f32 = 60.0;

/// Bonus paid the first time a platform is landed on
pub fn landing_points(platform: &Platform) -> u64 {
    let mut points = PLATFORM_LAND_POINTS;
    if platform.spring_armed() {
        points += SPRING_LAND_POINTS;
    }
    if platform.kind == PlatformKind::Moving {
        points += MOVING_LAND_POINTS;
    }
    points
}

/// Grant a power-up to the player and return the points it is worth
pub fn apply_power_up(player: &mut Player, kind: PowerUp) -> u64 {
    match kind {
        PowerUp::Jetpack => {
            player.jetpack_ticks = JETPACK_DURATION_TICKS;
            POWERUP_POINTS + JETPACK_BONUS_POINTS
        }
        PowerUp::Shield => {
            player.shield_ticks = SHIELD_DURATION_TICKS;
            POWERUP_POINTS
        }
    }
}

/// Land the player on every platform under its feet.
///
/// Only runs while descending. Platforms are processed in collection order,
/// so with several overlaps the last spring or jump applied wins.
pub fn resolve_landings(state: &mut GameState) {
    if state.player.vel.y <= 0.0 {
        return;
    }

    let jump_vel = state.world.jump_vel;
    let spring_scale = state.scales.spring;
    let GameState {
        player,
        platforms,
        run,
        events,
        ..
    } = state;
    let footprint = player.footprint();

    for platform in platforms.iter_mut() {
        if !platform.is_landable() || !footprint.overlaps(&platform.bounds()) {
            continue;
        }

        // Breakables give way: no bounce on the triggering frame
        if platform.kind == PlatformKind::Breakable {
            if platform.mark_broken() {
                events.push(GameEvent::PlatformBroke {
                    platform_id: platform.id,
                });
            }
            continue;
        }

        player.jump(jump_vel);
        if !platform.scored {
            let points = landing_points(platform);
            run.add_bonus(points);
            platform.scored = true;
            events.push(GameEvent::Landed {
                platform_id: platform.id,
                points,
            });
        }

        if let Some(strength) = platform.fire_spring() {
            player.jump(strength * spring_scale);
            events.push(GameEvent::SpringFired {
                platform_id: platform.id,
            });
        }

        if let Some(kind) = platform.power_up.take() {
            let points = apply_power_up(player, kind);
            run.add_bonus(points);
            events.push(GameEvent::PowerUpCollected { kind });
        }
    }
}

/// Points for rows crossed between two altitudes
pub fn crossing_bonus(prev_altitude: f32, altitude: f32, mean_gap: f32) -> u64 {
    if altitude <= prev_altitude || mean_gap <= 0.0 {
        return 0;
    }
    let rows = ((altitude - prev_altitude) / mean_gap).floor() as u64;
    rows * PLATFORM_PASS_POINTS
}

/// Reward net ascent since the start of the step.
///
/// Both altitudes are in the unscrolled frame, so on a scrolling step the
/// distance includes the part taken up by the scroll. Screen-space deltas
/// would drop it; the two only disagree once a single step climbs more than
/// a mean gap, which jump speeds never reach.
pub fn award_crossings(state: &mut GameState, prev_altitude: f32) {
    let altitude = state.run.altitude_of(state.player.pos.y);
    let points = crossing_bonus(prev_altitude, altitude, state.world.mean_gap());
    if points > 0 {
        state.run.add_bonus(points);
    }
}

/// Test the player against every enemy. Returns true on a fatal touch.
///
/// An active shield soaks one contact and knocks the player back.
pub fn resolve_enemy_contacts(state: &mut GameState) -> bool {
    let GameState {
        player,
        aerial_enemies,
        ground_enemies,
        events,
        ..
    } = state;
    let hitbox = player.hitbox();
    let mut fatal = false;

    for enemy in aerial_enemies.iter().chain(ground_enemies.iter()) {
        if !hitbox.overlaps(&enemy.bounds()) {
            continue;
        }
        if player.has_shield() {
            player.shield_ticks = 0;
            player.vel.y = SHIELD_KNOCKBACK_VELOCITY;
            player.vel.x = -player.vel.x;
            events.push(GameEvent::ShieldAbsorbed);
        } else {
            log::debug!("Player hit by {:?} enemy {}", enemy.kind, enemy.id);
            fatal = true;
        }
    }

    fatal
}

/// Move projectiles, resolve hits and clear out defeated enemies.
///
/// A projectile is not stopped by its first hit: it is checked against every
/// enemy in both collections before it is dropped.
pub fn update_projectiles(state: &mut GameState) {
    let GameState {
        projectiles,
        aerial_enemies,
        ground_enemies,
        run,
        events,
        ..
    } = state;

    for projectile in projectiles.iter_mut() {
        projectile.advance();
    }
    projectiles.retain(Projectile::is_live);

    for projectile in projectiles.iter_mut() {
        let bounds = projectile.bounds();
        for enemy in aerial_enemies.iter_mut().chain(ground_enemies.iter_mut()) {
            if bounds.overlaps(&enemy.bounds()) {
                enemy.hits = enemy.hits.saturating_add(1);
                projectile.expire();
            }
        }
    }
    projectiles.retain(|p| p.life > 0);

    let mut defeated = 0u64;
    for enemy in aerial_enemies.iter().chain(ground_enemies.iter()) {
        if enemy.is_defeated() {
            defeated += 1;
            events.push(GameEvent::EnemyDefeated { kind: enemy.kind });
        }
    }
    if defeated > 0 {
        aerial_enemies.retain(|e| !e.is_defeated());
        ground_enemies.retain(|e| !e.is_defeated());
        run.add_bonus(defeated * ENEMY_DEFEAT_POINTS);
    }
}

/// Spawn a projectile from the player's mouth
pub fn fire_projectile(state: &mut GameState, auto: bool) {
    let id = state.next_entity_id();
    state.projectiles.push(Projectile::from_player(id, &state.player));
    state.events.push(GameEvent::ProjectileFired { auto });
}

/// Whether a ground enemy sits in the firing window above the player
pub fn has_ground_target(state: &GameState) -> bool {
    let player = &state.player;
    state.ground_enemies.iter().any(|m| {
        m.kind == EnemyKind::Ground
            && m.pos.y < player.pos.y - AUTO_FIRE_MIN_HEIGHT
            && (m.pos.x - player.pos.x).abs() < AUTO_FIRE_RANGE_X
    })
}

/// Fire once when a target enters range; re-arm once no target remains
pub fn auto_fire(state: &mut GameState) {
    if has_ground_target(state) {
        if !state.engaging {
            state.engaging = true;
            fire_projectile(state, true);
        }
    } else {
        state.engaging = false;
    }
}

/// Player dropped below the visible world
pub fn fell_out(state: &GameState) -> bool {
    state.player.pos.y > state.world.fall_out_y()
}

/// Height score for the player's current position
pub fn track_height(run: &mut RunState, player: &Player) {
    run.record_altitude(run.altitude_of(player.pos.y));
}
