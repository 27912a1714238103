//! Particle pool for short-lived visual effects
//!
//! Particles never feed back into gameplay. The pool owns a fixed number of
//! slots; expired slots go onto a free list and are reused by later spawns.

use glam::Vec2;
use rand::Rng;

use crate::consts::PARTICLE_GRAVITY;

/// Default pool capacity (overridden by settings)
pub const MAX_PARTICLES: usize = 512;

/// Palette entry for a particle (resolved to RGBA by the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    /// Light green puff kicked up by a jump
    Dust,
    /// Hot pink candy burst
    Candy,
    /// Red damage flash
    Damage,
    /// White rose petals
    Petal,
    /// Victory gold
    Gold,
}

/// A single particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    /// Remaining life in ticks
    pub life: u32,
    /// Life at spawn, for fading
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    /// Fade factor in [0, 1]
    pub fn opacity(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}

/// Fixed-capacity particle storage with slot recycling
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Option<Particle>>,
    free: Vec<usize>,
    capacity: usize,
    live: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_capacity(MAX_PARTICLES)
    }
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity,
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the slot limit. Shrinking drops particles in the cut-off slots.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if self.slots.len() > capacity {
            self.slots.truncate(capacity);
            self.free.retain(|&i| i < capacity);
            self.live = self.slots.iter().filter(|s| s.is_some()).count();
        }
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Add one particle. Returns false when the pool is full or `life` is zero.
    pub fn spawn(&mut self, pos: Vec2, color: ParticleColor, vel: Vec2, life: u32, size: f32) -> bool {
        if life == 0 {
            return false;
        }
        let particle = Particle {
            pos,
            vel,
            color,
            life,
            max_life: life,
            size,
        };

        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(particle);
        } else if self.slots.len() < self.capacity {
            self.slots.push(Some(particle));
        } else {
            return false;
        }
        self.live += 1;
        true
    }

    /// Spawn `def.count` particles around `origin`
    pub fn burst<R: Rng>(&mut self, rng: &mut R, origin: Vec2, def: &BurstDef) {
        for _ in 0..def.count {
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * def.jitter.x,
                (rng.random::<f32>() - 0.5) * def.jitter.y,
            );
            let vel = Vec2::new(
                def.vel_min.x + rng.random::<f32>() * (def.vel_max.x - def.vel_min.x),
                def.vel_min.y + rng.random::<f32>() * (def.vel_max.y - def.vel_min.y),
            );
            let color = def.palette[rng.random_range(0..def.palette.len())];
            let size = rng.random::<f32>() * 4.0 + 2.0;
            if !self.spawn(origin + jitter, color, vel, def.life, size) {
                log::trace!("particle pool full, dropping rest of burst");
                break;
            }
        }
    }

    /// Move, fall and age every particle; expired ones free their slot
    pub fn advance(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let expired = match slot.as_mut() {
                Some(p) => {
                    p.pos += p.vel;
                    p.vel.y += PARTICLE_GRAVITY;
                    p.life -= 1;
                    p.life == 0
                }
                None => false,
            };
            if expired {
                *slot = None;
                self.free.push(idx);
                self.live -= 1;
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Live particles in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().flatten()
    }
}

/// Shape of a one-shot particle burst
#[derive(Debug, Clone)]
pub struct BurstDef {
    pub count: usize,
    /// Colors picked uniformly per particle (must be non-empty)
    pub palette: &'static [ParticleColor],
    /// Full width/height of the spawn area around the origin
    pub jitter: Vec2,
    pub vel_min: Vec2,
    pub vel_max: Vec2,
    pub life: u32,
}

/// Burst presets
impl BurstDef {
    /// Dust at the feet when jumping
    pub fn jump_dust() -> Self {
        Self {
            count: 8,
            palette: &[ParticleColor::Dust],
            jitter: Vec2::new(20.0, 0.0),
            vel_min: Vec2::new(-2.0, -4.0),
            vel_max: Vec2::new(2.0, -1.0),
            life: 30,
        }
    }

    /// Gummy cluster collected
    pub fn candy() -> Self {
        Self {
            count: 15,
            palette: &[ParticleColor::Candy],
            jitter: Vec2::ZERO,
            vel_min: Vec2::splat(-3.0),
            vel_max: Vec2::splat(3.0),
            life: 40,
        }
    }

    /// Hazard hit
    pub fn damage() -> Self {
        Self {
            count: 20,
            palette: &[ParticleColor::Damage],
            jitter: Vec2::ZERO,
            vel_min: Vec2::splat(-4.0),
            vel_max: Vec2::splat(4.0),
            life: 50,
        }
    }

    /// Rose picked up
    pub fn petals() -> Self {
        Self {
            count: 30,
            palette: &[ParticleColor::Petal],
            jitter: Vec2::ZERO,
            vel_min: Vec2::splat(-5.0),
            vel_max: Vec2::splat(5.0),
            life: 80,
        }
    }

    /// Rose delivered
    pub fn celebration() -> Self {
        Self {
            count: 50,
            palette: &[ParticleColor::Gold, ParticleColor::Candy, ParticleColor::Petal],
            jitter: Vec2::ZERO,
            vel_min: Vec2::new(-6.0, -10.0),
            vel_max: Vec2::new(6.0, -2.0),
            life: 100,
        }
    }
}
