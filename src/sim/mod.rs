//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (decorations and particles)
//! - Stable iteration order (level order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::{Rect, landing_platform};
pub use level::{CloudSpawn, Level, Platform, SurfaceKind};
pub use particles::{BurstDef, MAX_PARTICLES, Particle, ParticleColor, ParticlePool};
pub use state::{
    Camera, Cloud, Facing, GameEvent, GamePhase, GameState, GummyCluster, HairGelBottle, Player,
    Rose, Spark, Sparkle, SparkleTint, progress_for,
};
pub use tick::{TickInput, tick};
