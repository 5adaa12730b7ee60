//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]; nothing is shared
//! outside a step except through the read-only snapshots.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::scale::{DeviceClass, DeviceScales, World, rand_f32, random_sign};
use super::tick::TickInput;
use super::worldgen;
use crate::Rect;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World generated, waiting for `start()`
    Ready,
    /// Active gameplay
    Playing,
    /// Stepping suspended, all state preserved
    Paused,
    /// Run ended; the final result is frozen
    GameOver,
}

/// The jumper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// -1 facing left, 1 facing right
    pub facing: i8,
    /// Frames of jetpack left
    pub jetpack_ticks: u32,
    /// Frames of shield left
    pub shield_ticks: u32,
}

impl Player {
    pub fn new(world: &World) -> Self {
        Self {
            pos: Vec2::new(world.width / 2.0 - PLAYER_SIZE / 2.0, world.height - 120.0),
            vel: Vec2::ZERO,
            size: Vec2::splat(PLAYER_SIZE),
            facing: 1,
            jetpack_ticks: 0,
            shield_ticks: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Narrow band at the feet used for landing checks
    pub fn footprint(&self) -> Rect {
        Rect::new(self.pos.x + 8.0, self.pos.y + self.size.y - 6.0, self.size.x - 16.0, 8.0)
    }

    /// Central region used for enemy contact
    pub fn hitbox(&self) -> Rect {
        self.bounds().inset(6.0, 6.0)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn has_jetpack(&self) -> bool {
        self.jetpack_ticks > 0
    }

    pub fn has_shield(&self) -> bool {
        self.shield_ticks > 0
    }

    /// Set vertical velocity directly (negative = upward)
    pub fn jump(&mut self, strength: f32) {
        self.vel.y = strength;
    }

    /// Advance one frame: steering, gravity or jetpack, integration, wrap
    pub fn integrate(&mut self, input: &TickInput, level: u32, world: &World, scales: &DeviceScales) {
        let accel = PLAYER_ACCEL * scales.acc;
        let max_speed = max_speed_for_level(level) * scales.max;

        // Left is checked first, so it wins when both are held
        if input.left {
            self.vel.x -= accel;
            self.facing = -1;
        } else if input.right {
            self.vel.x += accel;
            self.facing = 1;
        } else {
            self.vel.x *= PLAYER_FRICTION;
        }
        self.vel.x = self.vel.x.clamp(-max_speed, max_speed);

        if self.jetpack_ticks > 0 {
            self.vel.y = JETPACK_VELOCITY * scales.jump;
            self.jetpack_ticks -= 1;
        } else {
            self.vel.y += world.gravity * gravity_multiplier(level);
        }

        self.pos += self.vel;
        self.wrap(world);

        if self.shield_ticks > 0 {
            self.shield_ticks -= 1;
        }
    }

    /// Cylindrical world: leaving one side re-enters from the other
    pub fn wrap(&mut self, world: &World) {
        if self.pos.x > world.width + world.wrap_margin {
            self.pos.x = -self.size.x;
        }
        if self.pos.x < -self.size.x - world.wrap_margin {
            self.pos.x = world.width;
        }
    }
}

/// Horizontal speed cap before device scaling
pub fn max_speed_for_level(level: u32) -> f32 {
    PLAYER_BASE_MAX_SPEED + level as f32 * PLAYER_MAX_SPEED_PER_LEVEL
}

/// Gravity grows linearly with level
pub fn gravity_multiplier(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * GRAVITY_PER_LEVEL
}

/// Platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    Moving,
    Breakable,
    Bouncy,
}

/// Power-ups carried by platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    Jetpack,
    Shield,
}

/// One-shot boosted jump on bouncy platforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Jump strength before device scaling
    pub strength: f32,
    pub armed: bool,
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (moving platforms only)
    pub vel_x: f32,
    pub broken: bool,
    /// Break animation progress, 0..=1.5
    pub break_progress: f32,
    /// Landing bonus already paid out
    pub scored: bool,
    pub spring: Option<Spring>,
    pub power_up: Option<PowerUp>,
}

impl Platform {
    pub fn new(id: u32, pos: Vec2, kind: PlatformKind, rng: &mut Pcg32, scales: &DeviceScales) -> Self {
        let vel_x = if kind == PlatformKind::Moving {
            random_sign(rng) * rand_f32(rng, 0.6, 1.2) * scales.movement
        } else {
            0.0
        };
        let spring = (kind == PlatformKind::Bouncy).then_some(Spring {
            strength: SPRING_STRENGTH,
            armed: true,
        });

        Self {
            id,
            kind,
            pos,
            size: Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
            vel_x,
            broken: false,
            break_progress: 0.0,
            scored: false,
            spring,
            power_up: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Broken breakables can never be landed on again
    pub fn is_landable(&self) -> bool {
        !(self.kind == PlatformKind::Breakable && self.broken)
    }

    pub fn spring_armed(&self) -> bool {
        self.spring.is_some_and(|s| s.armed)
    }

    /// Start the break animation. Returns false if already broken.
    pub fn mark_broken(&mut self) -> bool {
        if self.broken {
            return false;
        }
        self.broken = true;
        self.break_progress = BREAK_PROGRESS_START;
        true
    }

    /// Disarm the spring, returning its strength if it was armed
    pub fn fire_spring(&mut self) -> Option<f32> {
        match self.spring.as_mut() {
            Some(spring) if spring.armed => {
                spring.armed = false;
                Some(spring.strength)
            }
            _ => None,
        }
    }

    pub fn update(&mut self, world: &World, scales: &DeviceScales) {
        match self.kind {
            PlatformKind::Moving if !self.broken => {
                self.pos.x += self.vel_x;
                if self.pos.x < MOVING_PLATFORM_EDGE
                    || self.pos.x + self.size.x > world.width - MOVING_PLATFORM_EDGE
                {
                    self.vel_x = -self.vel_x;
                }
            }
            PlatformKind::Breakable if self.broken => {
                self.break_progress =
                    (self.break_progress + BREAK_PROGRESS_RATE * scales.anim).min(BREAK_PROGRESS_MAX);
                self.pos.y += (BREAK_SINK_BASE + self.break_progress * BREAK_SINK_FACTOR) * scales.anim;
            }
            _ => {}
        }
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Flying saucer patrolling across the screen
    Aerial,
    /// Monster pacing between the walls
    Ground,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_x: f32,
    /// One hit is lethal
    pub hits: u8,
    /// Sprite mirrored (ground enemies flip on each wall bounce)
    pub flipped: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, rng: &mut Pcg32, scales: &DeviceScales) -> Self {
        let (size, vel_x) = match kind {
            EnemyKind::Aerial => {
                let speed = rand_f32(rng, 0.8, 1.6);
                (
                    Vec2::new(AERIAL_ENEMY_WIDTH, AERIAL_ENEMY_HEIGHT),
                    speed * random_sign(rng) * scales.movement,
                )
            }
            EnemyKind::Ground => {
                let sign = random_sign(rng);
                (
                    Vec2::new(GROUND_ENEMY_WIDTH, GROUND_ENEMY_HEIGHT),
                    sign * rand_f32(rng, 0.6, 1.2) * scales.movement,
                )
            }
        };

        Self {
            id,
            kind,
            pos,
            size,
            vel_x,
            hits: 0,
            flipped: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_defeated(&self) -> bool {
        self.hits >= 1
    }

    pub fn update(&mut self, world: &World) {
        self.pos.x += self.vel_x;
        match self.kind {
            EnemyKind::Aerial => {
                if self.pos.x < -40.0 || self.pos.x > world.width - 24.0 {
                    self.vel_x = -self.vel_x;
                }
            }
            EnemyKind::Ground => {
                if self.pos.x < 6.0 || self.pos.x + self.size.x > world.width - 6.0 {
                    self.vel_x = -self.vel_x;
                    self.flipped = !self.flipped;
                }
            }
        }
    }
}

/// A projectile fired straight up from the player's mouth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    /// Frames left before the projectile fizzles
    pub life: u32,
}

impl Projectile {
    pub fn from_player(id: u32, player: &Player) -> Self {
        Self {
            id,
            pos: Vec2::new(player.center_x(), player.pos.y + player.size.y / 2.0 - 20.0),
            vel_y: PROJECTILE_VELOCITY,
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            life: PROJECTILE_LIFETIME,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos.y += self.vel_y;
        self.life = self.life.saturating_sub(1);
    }

    pub fn expire(&mut self) {
        self.life = 0;
    }

    pub fn is_live(&self) -> bool {
        self.life > 0 && self.pos.y > PROJECTILE_CEILING
    }
}

/// Frozen result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    pub score: u64,
    pub level: u32,
    pub elapsed_seconds: u32,
}

/// Score, level and clock for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Highest altitude reached (negated world y)
    pub max_height: f32,
    pub height_score: u64,
    pub bonus_score: u64,
    /// Always `height_score + bonus_score` after a step
    pub score: u64,
    /// Always derived from `score` after a step
    pub level: u32,
    /// Total distance the world has been scrolled down
    pub scroll_offset: f32,
    pub ticks: u64,
    /// Seconds spent in the Playing phase
    pub elapsed: f64,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            max_height: 0.0,
            height_score: 0,
            bonus_score: 0,
            score: 0,
            level: 1,
            scroll_offset: 0.0,
            ticks: 0,
            elapsed: 0.0,
        }
    }
}

impl RunState {
    /// Altitude of a screen-space y in the unscrolled world frame
    pub fn altitude_of(&self, y: f32) -> f32 {
        self.scroll_offset - y
    }

    /// Raise the height score if `altitude` is a new maximum
    pub fn record_altitude(&mut self, altitude: f32) {
        if altitude > self.max_height {
            self.max_height = altitude;
            self.height_score = (self.max_height * SCORE_FACTOR).floor() as u64;
        }
    }

    pub fn add_bonus(&mut self, points: u64) {
        self.bonus_score += points;
    }

    /// Recompute total score and level. Returns the new level if it changed.
    pub fn finalize(&mut self) -> Option<u32> {
        self.score = self.height_score + self.bonus_score;
        let level = level_for_score(self.score);
        if level != self.level {
            self.level = level;
            Some(level)
        } else {
            None
        }
    }

    /// Count one played step of `dt` seconds
    pub fn advance_clock(&mut self, dt: f32) {
        self.ticks += 1;
        self.elapsed += f64::from(dt);
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed.floor() as u32
    }

    pub fn final_result(&self) -> FinalResult {
        FinalResult {
            score: self.score,
            level: self.level,
            elapsed_seconds: self.elapsed_seconds(),
        }
    }
}

/// Level is a pure function of total score
pub fn level_for_score(score: u64) -> u32 {
    1 + (score / POINTS_PER_LEVEL) as u32
}

/// Things that happened during the last step, for audio/effects hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Landed { platform_id: u32, points: u64 },
    PlatformBroke { platform_id: u32 },
    SpringFired { platform_id: u32 },
    PowerUpCollected { kind: PowerUp },
    ShieldAbsorbed,
    ProjectileFired { auto: bool },
    EnemyDefeated { kind: EnemyKind },
    LevelUp { level: u32 },
    GameOver { result: FinalResult },
}

/// Complete simulation context for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed this run was generated from
    pub seed: u64,
    pub rng: Pcg32,
    pub device: DeviceClass,
    pub scales: DeviceScales,
    pub world: World,
    pub phase: GamePhase,
    pub player: Player,
    /// Ordered by creation; landing ties resolve in this order
    pub platforms: Vec<Platform>,
    pub aerial_enemies: Vec<Enemy>,
    pub ground_enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub run: RunState,
    /// Auto-fire latch: set while a ground target stays in range
    pub engaging: bool,
    /// Set once, on the step the run ends
    pub final_result: Option<FinalResult>,
    /// Events from the most recent step
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a run with the given seed and generate its starting world
    pub fn new(seed: u64, device: DeviceClass) -> Self {
        let scales = device.scales();
        let world = World::new(&scales);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            device,
            scales,
            world,
            phase: GamePhase::Ready,
            player: Player::new(&world),
            platforms: Vec::new(),
            aerial_enemies: Vec::new(),
            ground_enemies: Vec::new(),
            projectiles: Vec::new(),
            run: RunState::default(),
            engaging: false,
            final_result: None,
            events: Vec::new(),
            next_id: 1,
        };

        worldgen::seed_initial_world(&mut state);
        log::info!(
            "New run: seed={} device={} platforms={}",
            seed,
            device.as_str(),
            state.platforms.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level(&self) -> u32 {
        self.run.level
    }

    /// Start a fresh run from new randomness
    pub fn reset(&mut self) {
        let seed = self.rng.random::<u64>();
        self.reset_with_seed(seed);
    }

    pub fn reset_with_seed(&mut self, seed: u64) {
        *self = Self::new(seed, self.device);
    }

    /// Begin stepping from time zero
    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Playing;
            log::info!("Run started (seed={})", self.seed);
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::info!("Paused at tick {}", self.run.ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::info!("Resumed at tick {}", self.run.ticks);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// End the run on request; same path as a fatal collision
    pub fn end_run(&mut self) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            self.finish_run();
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Freeze the final result and stop the run. Only the first call counts.
    pub(crate) fn finish_run(&mut self) {
        if self.final_result.is_some() {
            return;
        }
        self.run.finalize();
        let result = self.run.final_result();
        self.final_result = Some(result);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { result });
        log::info!(
            "Game over: score={} level={} time={}s",
            result.score,
            result.level,
            result.elapsed_seconds
        );
    }
}
