//! Rose Quest - a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: Render pass (vertex list) and WebGPU pipeline
//! - `driver`: Frame driver, lifecycle and observer notifications
//! - `settings`: Player preferences and key bindings

pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{Control, FrameDriver, GameObserver};
pub use settings::{KeyBindings, QualityPreset, Settings};

/// Game configuration constants
///
/// All physics values are per tick; a tick is nominally one 60 Hz frame.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest host frame the driver will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical surface dimensions
    pub const SURFACE_WIDTH: f32 = 900.0;
    pub const SURFACE_HEIGHT: f32 = 500.0;

    /// Level extent used for progress
    pub const LEVEL_LENGTH: f32 = 3200.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 70.0;
    pub const PLAYER_HEIGHT: f32 = 55.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Horizontal control
    pub const RUN_ACCEL: f32 = 0.8;
    pub const MAX_RUN_SPEED: f32 = 7.0;
    pub const RUN_DAMPING: f32 = 0.85;

    /// Vertical control
    pub const JUMP_IMPULSE: f32 = -18.0;
    /// Applied each tick jump is released while still rising
    pub const JUMP_CUT: f32 = 0.6;
    pub const GRAVITY: f32 = 0.8;
    pub const TERMINAL_VELOCITY: f32 = 15.0;

    /// Depth below a platform top that still counts as landing on it
    pub const LANDING_TOLERANCE: f32 = 25.0;

    /// Pickups
    pub const GUMMY_SIZE: f32 = 20.0;
    pub const GUMMY_SCORE: u32 = 10;

    /// Hazards
    pub const BOTTLE_WIDTH: f32 = 25.0;
    pub const BOTTLE_HEIGHT: f32 = 35.0;
    pub const HAZARD_INVULNERABILITY: u32 = 120;
    pub const KNOCKBACK_X: f32 = 8.0;
    pub const KNOCKBACK_Y: f32 = -10.0;
    /// Delay before the full respawn after the last life is lost (1 s)
    pub const RESET_DELAY_TICKS: u32 = 60;

    /// Falling out of the level
    pub const PITFALL_Y: f32 = 550.0;
    pub const PITFALL_INVULNERABILITY: u32 = 60;
    pub const RESPAWN_MIN_X: f32 = 100.0;
    pub const RESPAWN_Y: f32 = 200.0;

    /// Goal window around the owner's x position
    pub const WIN_WINDOW_BEHIND: f32 = 50.0;
    pub const WIN_WINDOW_AHEAD: f32 = 100.0;
    /// Owner is no longer drawn after a win once the camera passes this
    pub const OWNER_HIDE_CAMERA_X: f32 = 200.0;

    /// Camera
    pub const CAMERA_LEAD: f32 = 300.0;
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    pub const CAMERA_MAX_X: f32 = 2500.0;

    /// Particles
    pub const PARTICLE_GRAVITY: f32 = 0.1;

    /// Clouds re-enter from here after drifting off the left edge
    pub const CLOUD_WRAP_X: f32 = 3500.0;
}
