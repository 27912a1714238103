//! Game state and core simulation types
//!
//! `GameState` is the single owned aggregate: the tick mutates it through
//! `&mut`, the render pass only ever sees `&`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::level::{Level, Platform};
use super::particles::ParticlePool;
use crate::consts::*;

/// Lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Not started, or reset
    Idle,
    /// Ticking every frame
    Running,
    /// Rose delivered; ticks are no-ops until reset
    Won,
}

/// Outbound notifications produced by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u32),
    LivesChanged(u8),
    ProgressChanged(f32),
    /// Fired once per session
    Won { final_score: u32 },
}

/// Which way the player faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The Saint Bernard
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub grounded: bool,
    pub jumping: bool,
    /// Ticks left during which hazards are ignored
    pub invulnerable: u32,
    /// Drives leg and tail animation
    pub anim_phase: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            facing: Facing::Right,
            grounded: false,
            jumping: false,
            invulnerable: 0,
            anim_phase: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Move to `pos` at rest
    pub fn respawn_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }

    /// Keep velocity finite and inside the physical envelope
    pub fn sanitize_velocity(&mut self) {
        if !self.vel.x.is_finite() {
            self.vel.x = 0.0;
        }
        if !self.vel.y.is_finite() {
            self.vel.y = 0.0;
        }
        self.vel.x = self.vel.x.clamp(-KNOCKBACK_X, KNOCKBACK_X);
        self.vel.y = self.vel.y.clamp(JUMP_IMPULSE, TERMINAL_VELOCITY);
    }
}

/// Color of a rising sparkle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SparkleTint {
    White,
    /// HSL hue in degrees and lightness in percent
    Magic { hue: f32, lightness: f32 },
}

/// Decorative sparkle owned by a collectible
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub pos: Vec2,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
    pub tint: SparkleTint,
}

impl Sparkle {
    pub fn opacity(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }
}

/// Decorative warning spark owned by a hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
}

impl Spark {
    pub fn opacity(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }
}

/// Cap on sparkles/sparks a single entity keeps alive
pub const MAX_EFFECTS_PER_ENTITY: usize = 64;

/// The goal item
#[derive(Debug, Clone, PartialEq)]
pub struct Rose {
    pub rect: Rect,
    pub collected: bool,
    pub sparkles: Vec<Sparkle>,
}

impl Rose {
    fn age_sparkles<R: Rng>(&mut self, rng: &mut R) {
        if self.collected {
            return;
        }
        if rng.random_bool(0.4) && self.sparkles.len() < MAX_EFFECTS_PER_ENTITY {
            self.sparkles.push(Sparkle {
                pos: self.rect.pos + Vec2::new(rng.random::<f32>() * 35.0, rng.random::<f32>() * 45.0),
                size: rng.random::<f32>() * 4.0 + 2.0,
                life: 40,
                max_life: 40,
                tint: SparkleTint::Magic {
                    hue: rng.random::<f32>() * 60.0 + 300.0,
                    lightness: rng.random::<f32>() * 30.0 + 70.0,
                },
            });
        }
        self.sparkles.retain_mut(|s| {
            s.life -= 1;
            s.pos.y -= 2.0;
            s.pos.x += (s.life as f32 * 0.1).sin() * 0.5;
            s.life > 0
        });
    }
}

/// A score pickup
#[derive(Debug, Clone, PartialEq)]
pub struct GummyCluster {
    /// Top-left corner
    pub pos: Vec2,
    pub collected: bool,
    pub sparkles: Vec<Sparkle>,
}

impl GummyCluster {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            collected: false,
            sparkles: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::splat(GUMMY_SIZE))
    }

    fn age_sparkles<R: Rng>(&mut self, rng: &mut R) {
        if self.collected {
            return;
        }
        if rng.random_bool(0.3) && self.sparkles.len() < MAX_EFFECTS_PER_ENTITY {
            self.sparkles.push(Sparkle {
                pos: self.pos + Vec2::new(rng.random::<f32>() * 20.0, rng.random::<f32>() * 20.0),
                size: rng.random::<f32>() * 3.0 + 1.0,
                life: 30,
                max_life: 30,
                tint: SparkleTint::White,
            });
        }
        self.sparkles.retain_mut(|s| {
            s.life -= 1;
            s.pos.y -= 1.0;
            s.life > 0
        });
    }
}

/// A hair-gel bottle (hazard)
#[derive(Debug, Clone, PartialEq)]
pub struct HairGelBottle {
    /// Top-left corner
    pub pos: Vec2,
    pub sparks: Vec<Spark>,
}

impl HairGelBottle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            sparks: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::new(BOTTLE_WIDTH, BOTTLE_HEIGHT))
    }

    fn age_sparks<R: Rng>(&mut self, rng: &mut R) {
        if rng.random_bool(0.2) && self.sparks.len() < MAX_EFFECTS_PER_ENTITY {
            self.sparks.push(Spark {
                pos: self.pos
                    + Vec2::new(
                        rng.random::<f32>() * BOTTLE_WIDTH,
                        rng.random::<f32>() * BOTTLE_HEIGHT,
                    ),
                vel: Vec2::new((rng.random::<f32>() - 0.5) * 2.0, rng.random::<f32>() * -2.0),
                life: 20,
                max_life: 20,
            });
        }
        self.sparks.retain_mut(|s| {
            s.pos += s.vel;
            s.life -= 1;
            s.life > 0
        });
    }
}

/// Decorative cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Cloud {
    /// Drift left, re-entering far right once fully off the level start
    pub fn drift(&mut self) {
        self.pos.x -= self.speed;
        if self.pos.x < -self.size {
            self.pos.x = CLOUD_WRAP_X;
        }
    }
}

/// Horizontal scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Ease toward keeping the player left of center
    pub fn follow(&mut self, player_x: f32) {
        let target = player_x - CAMERA_LEAD;
        self.x += (target - self.x) * CAMERA_SMOOTHING;
        self.x = self.x.clamp(0.0, CAMERA_MAX_X);
    }
}

/// Level progress in percent for a player x position
pub fn progress_for(player_x: f32) -> f32 {
    (player_x / LEVEL_LENGTH * 100.0).clamp(0.0, 100.0)
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the decoration/particle RNG
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub lives: u8,
    pub score: u32,
    /// 0-100
    pub progress: f32,
    /// Ticks simulated since the session started
    pub time_ticks: u64,
    pub player: Player,
    pub owner: Rect,
    pub rose: Rose,
    pub gummies: Vec<GummyCluster>,
    pub bottles: Vec<HairGelBottle>,
    pub platforms: Vec<Platform>,
    pub clouds: Vec<Cloud>,
    pub camera: Camera,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticlePool,
    /// Ticks until the delayed full respawn after losing the last life
    pub pending_reset: Option<u32>,
    level: Level,
}

impl GameState {
    /// Fresh session on the rose quest level
    pub fn new(seed: u64) -> Self {
        Self::with_level(Level::rose_quest(), seed)
    }

    pub fn with_level(level: Level, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            lives: STARTING_LIVES,
            score: 0,
            progress: 0.0,
            time_ticks: 0,
            player: Player::new(level.player_start),
            owner: level.owner,
            rose: Rose {
                rect: level.rose,
                collected: false,
                sparkles: Vec::new(),
            },
            gummies: level.gummies.iter().copied().map(GummyCluster::new).collect(),
            bottles: level.bottles.iter().copied().map(HairGelBottle::new).collect(),
            platforms: level.platforms.clone(),
            clouds: level
                .clouds
                .iter()
                .map(|c| Cloud {
                    pos: c.pos,
                    size: c.size,
                    speed: c.speed,
                })
                .collect(),
            camera: Camera::default(),
            particles: ParticlePool::default(),
            pending_reset: None,
            level,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Back to the idle, freshly loaded state (particle capacity is kept)
    pub fn reset(&mut self) {
        let capacity = self.particles.capacity();
        let level = std::mem::take(&mut self.level);
        *self = Self::with_level(level, self.seed);
        self.particles.set_capacity(capacity);
    }

    /// Clear every collectible (gummies and rose) and its sparkles
    pub fn reset_collectibles(&mut self) {
        for gummy in &mut self.gummies {
            gummy.collected = false;
            gummy.sparkles.clear();
        }
        self.rose.collected = false;
        self.rose.sparkles.clear();
    }

    /// Full respawn after the last life was lost to a hazard
    pub fn respawn_from_start(&mut self) {
        self.lives = STARTING_LIVES;
        self.score = 0;
        let start = self.level.player_start;
        self.player.respawn_at(start);
        self.player.invulnerable = 0;
        self.camera = Camera::default();
        self.particles.clear();
        self.reset_collectibles();
        self.pending_reset = None;
    }

    /// The owner disappears once the game is won and the camera has moved on
    pub fn owner_visible(&self) -> bool {
        !(self.phase == GamePhase::Won && self.camera.x > OWNER_HIDE_CAMERA_X)
    }

    /// Drift clouds and age per-entity sparkles and sparks
    pub fn age_decorations(&mut self) {
        for cloud in &mut self.clouds {
            cloud.drift();
        }
        for gummy in &mut self.gummies {
            gummy.age_sparkles(&mut self.rng);
        }
        for bottle in &mut self.bottles {
            bottle.age_sparks(&mut self.rng);
        }
        self.rose.age_sparkles(&mut self.rng);
    }
}
