//! End-to-end runs through the public API

use glam::Vec2;
use tommy_jumper::consts::*;
use tommy_jumper::sim::{
    DeviceClass, Enemy, EnemyKind, GameEvent, GamePhase, GameState, Platform, PlatformKind, PowerUp,
    TickInput, step, tick,
};
use tommy_jumper::{HighScores, Settings};

const DT: f32 = 1.0 / 60.0;

/// A playing desktop run with the field cleared and the player parked mid-screen
fn sandbox() -> GameState {
    let mut state = GameState::new(7, DeviceClass::Desktop);
    state.start();
    state.platforms.clear();
    state.aerial_enemies.clear();
    state.ground_enemies.clear();
    state.player.pos = Vec2::new(177.0, 400.0);
    state.player.vel = Vec2::ZERO;
    state
}

fn add_platform(state: &mut GameState, pos: Vec2, kind: PlatformKind) -> u32 {
    let id = state.next_entity_id();
    let platform = Platform::new(id, pos, kind, &mut state.rng, &state.scales);
    state.platforms.push(platform);
    id
}

#[test]
fn jetpack_pickup_lifts_the_player() {
    let mut state = sandbox();
    state.player.vel.y = 2.0;
    let id = add_platform(&mut state, Vec2::new(166.0, 445.0), PlatformKind::Normal);
    state.platforms[0].power_up = Some(PowerUp::Jetpack);

    assert!(tick(&mut state, &TickInput::default(), DT));

    assert!(state.events.contains(&GameEvent::Landed {
        platform_id: id,
        points: PLATFORM_LAND_POINTS,
    }));
    assert!(state.events.contains(&GameEvent::PowerUpCollected {
        kind: PowerUp::Jetpack
    }));
    assert_eq!(state.platforms[0].power_up, None);
    assert_eq!(state.player.jetpack_ticks, JETPACK_DURATION_TICKS);
    assert_eq!(
        state.run.bonus_score,
        PLATFORM_LAND_POINTS + POWERUP_POINTS + JETPACK_BONUS_POINTS
    );
    assert_eq!(state.run.score, state.run.height_score + state.run.bonus_score);

    tick(&mut state, &TickInput::default(), DT);
    let thrust = JETPACK_VELOCITY * state.scales.jump;
    assert!((state.player.vel.y - thrust).abs() < 1e-4);
    assert_eq!(state.player.jetpack_ticks, JETPACK_DURATION_TICKS - 1);
}

#[test]
fn shield_absorbs_one_hit_then_the_next_is_fatal() {
    let mut state = sandbox();
    state.world.gravity = 0.0;
    state.player.shield_ticks = 100;

    let id = state.next_entity_id();
    let mut enemy = Enemy::new(
        id,
        EnemyKind::Ground,
        Vec2::new(180.0, 400.0),
        &mut state.rng,
        &state.scales,
    );
    enemy.vel_x = 0.0;
    state.ground_enemies.push(enemy);

    tick(&mut state, &TickInput::default(), DT);
    assert!(state.events.contains(&GameEvent::ShieldAbsorbed));
    assert!(!state.player.has_shield());
    assert_eq!(state.player.vel.y, SHIELD_KNOCKBACK_VELOCITY);
    assert_eq!(state.phase, GamePhase::Playing);

    tick(&mut state, &TickInput::default(), DT);
    assert!(state.is_over());
    let result = state.final_result.expect("final result frozen");
    assert_eq!(result.score, state.run.score);
    assert!(matches!(state.events.last(), Some(GameEvent::GameOver { .. })));
}

#[test]
fn final_snapshot_is_stable_after_game_over() {
    let mut state = sandbox();
    state.player.pos.y = state.world.fall_out_y() + 1.0;

    let last = step(&mut state, &TickInput::default(), DT);
    assert_eq!(last.phase, GamePhase::GameOver);
    assert!(last.final_result.is_some());

    for _ in 0..10 {
        assert!(!tick(&mut state, &TickInput::right(), 1.0));
    }
    assert_eq!(state.snapshot(), last);
}

#[test]
fn reset_and_start_contract() {
    let mut state = GameState::new(11, DeviceClass::Tablet);
    assert_eq!(state.phase, GamePhase::Ready);
    assert!(!tick(&mut state, &TickInput::default(), DT));
    assert_eq!(state.run.ticks, 0);

    state.start();
    for _ in 0..30 {
        tick(&mut state, &TickInput::left(), DT);
    }
    state.end_run();
    assert!(state.is_over());

    state.reset_with_seed(11);
    let fresh = GameState::new(11, DeviceClass::Tablet);
    assert_eq!(state.phase, GamePhase::Ready);
    assert_eq!(state.device, DeviceClass::Tablet);
    assert_eq!(state.final_result, None);
    assert_eq!(state.run.score, 0);
    assert_eq!(state.snapshot(), fresh.snapshot());

    state.reset();
    assert_eq!(state.phase, GamePhase::Ready);
    assert_eq!(state.platforms.len(), INITIAL_PLATFORM_COUNT);
}

#[test]
fn paused_run_does_not_advance() {
    let mut state = GameState::new(3, DeviceClass::Desktop);
    state.start();
    tick(&mut state, &TickInput::default(), DT);

    state.pause();
    let before = state.snapshot();
    assert_eq!(before.phase, GamePhase::Paused);
    assert!(!tick(&mut state, &TickInput::right(), 5.0));
    assert_eq!(state.snapshot(), before);

    state.resume();
    assert!(tick(&mut state, &TickInput::default(), DT));
    assert_eq!(state.run.ticks, 2);
}

#[test]
fn projectile_flies_until_the_ceiling() {
    let mut state = sandbox();
    state.world.gravity = 0.0;

    let fire = TickInput {
        fire: true,
        ..Default::default()
    };
    tick(&mut state, &fire, DT);
    assert_eq!(state.projectiles.len(), 1);
    assert!(state.events.contains(&GameEvent::ProjectileFired { auto: false }));

    // 403 - 8.5 * 49 is still below the ceiling, one more step is not
    for _ in 0..49 {
        tick(&mut state, &TickInput::default(), DT);
    }
    assert_eq!(state.projectiles.len(), 1);
    tick(&mut state, &TickInput::default(), DT);
    assert!(state.projectiles.is_empty());
}

#[test]
fn climbing_a_row_in_one_step_pays_the_crossing_bonus() {
    let mut state = sandbox();
    state.player.pos.y = 500.0;
    state.player.vel.y = -80.0;

    tick(&mut state, &TickInput::default(), DT);

    // About 79.7 px climbed against a mean gap of 70: one row
    assert_eq!(state.run.scroll_offset, 0.0);
    assert_eq!(state.run.bonus_score, PLATFORM_PASS_POINTS);
    assert_eq!(state.run.score, state.run.height_score + PLATFORM_PASS_POINTS);
}

#[test]
fn crossing_bonus_counts_the_scrolled_part_of_a_climb() {
    let mut state = sandbox();
    state.player.pos.y = 280.0;
    state.player.vel.y = -80.0;

    tick(&mut state, &TickInput::default(), DT);

    // Pinned at the trigger line; most of the climb became scroll
    assert!((state.player.pos.y - state.world.scroll_trigger_y).abs() < 1e-3);
    assert!(state.run.scroll_offset > 59.0);
    assert_eq!(state.run.bonus_score, PLATFORM_PASS_POINTS);
}

#[test]
fn player_wraps_around_the_right_edge() {
    let mut state = sandbox();
    state.world.gravity = 0.0;
    state.player.pos.x = 420.0;
    state.player.vel.x = 4.0;

    tick(&mut state, &TickInput::right(), DT);
    assert_eq!(state.player.pos.x, -state.player.size.x);
    assert_eq!(state.player.facing, 1);
}

#[test]
fn same_seed_same_run() {
    let autopilot = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut a = GameState::new(2024, DeviceClass::Mobile);
    let mut b = GameState::new(2024, DeviceClass::Mobile);
    a.start();
    b.start();

    for _ in 0..600 {
        tick(&mut a, &autopilot, DT);
        tick(&mut b, &autopilot, DT);
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.run.score, a.run.height_score + a.run.bonus_score);
}

#[test]
fn settings_drive_a_run_into_the_score_table() {
    let settings = Settings::from_json(r#"{"seed": 42, "device": "desktop"}"#).unwrap();
    let mut state = settings.new_game();
    state.start();

    // Ending before any score is banked leaves nothing to record
    state.end_run();
    let result = state.final_result.unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.level, 1);

    let mut scores = HighScores::new();
    assert_eq!(scores.add("Tommy", &result), None);
    assert!(scores.is_empty());
}
