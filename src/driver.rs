//! Frame driver: session lifecycle, input and fixed-timestep ticking
//!
//! The host calls `frame(dt)` once per display refresh. The driver runs as
//! many simulation ticks as the elapsed time allows, forwards tick events to
//! the `GameObserver`, then builds and presents one frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{SceneOptions, Surface, Vertex, build_frame_with};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Level, TickInput, tick};

/// Slack so a host running at exactly 60 Hz gets exactly one tick per frame
const ACCUMULATOR_EPSILON: f32 = 1e-4;

/// Logical game controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Jump,
}

/// Receives HUD-relevant changes (score, lives, progress, win)
pub trait GameObserver {
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_lives_changed(&mut self, _lives: u8) {}
    /// Level progress in percent
    fn on_progress(&mut self, _percent: f32) {}
    fn on_win(&mut self, _final_score: u32) {}
}

/// Observer that ignores everything
impl GameObserver for () {}

pub struct FrameDriver<O: GameObserver> {
    state: GameState,
    input: TickInput,
    observer: O,
    settings: Settings,
    scene: SceneOptions,
    surface: Option<Box<dyn Surface>>,
    vertices: Vec<Vertex>,
    accumulator: f32,
}

impl<O: GameObserver> FrameDriver<O> {
    pub fn new(seed: u64, settings: Settings, observer: O) -> Self {
        Self::with_level(Level::rose_quest(), seed, settings, observer)
    }

    pub fn with_level(level: Level, seed: u64, settings: Settings, observer: O) -> Self {
        let mut state = GameState::with_level(level, seed);
        state.particles.set_capacity(settings.max_particles());
        Self {
            state,
            input: TickInput::default(),
            observer,
            scene: settings.scene_options(),
            settings,
            surface: None,
            vertices: Vec::new(),
            accumulator: 0.0,
        }
    }

    pub fn attach_surface(&mut self, surface: Box<dyn Surface>) {
        self.surface = Some(surface);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    /// Begin ticking. Returns false (and does nothing) unless idle.
    pub fn start(&mut self) -> bool {
        if self.state.phase != GamePhase::Idle {
            return false;
        }
        self.state.phase = GamePhase::Running;
        self.accumulator = 0.0;
        log::info!("Game started (seed {})", self.state.seed);
        true
    }

    /// Stop ticking; same as `reset`
    pub fn stop(&mut self) {
        self.reset();
    }

    /// Back to the freshly loaded idle state and tell the observer
    pub fn reset(&mut self) {
        self.state.reset();
        self.input = TickInput::default();
        self.accumulator = 0.0;

        self.observer.on_score_changed(self.state.score);
        self.observer.on_lives_changed(self.state.lives);
        self.observer.on_progress(self.state.progress);
        log::info!("Game reset");
    }

    /// Press the control bound to `key`. Returns whether the key is bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        match self.settings.keys.control_for(key) {
            Some(control) => {
                self.press(control);
                true
            }
            None => false,
        }
    }

    /// Release the control bound to `key`. Returns whether the key is bound.
    pub fn key_up(&mut self, key: &str) -> bool {
        match self.settings.keys.control_for(key) {
            Some(control) => {
                self.release(control);
                true
            }
            None => false,
        }
    }

    pub fn press(&mut self, control: Control) {
        self.set_control(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set_control(control, false);
    }

    fn set_control(&mut self, control: Control, held: bool) {
        match control {
            Control::Left => self.input.left = held,
            Control::Right => self.input.right = held,
            Control::Jump => self.input.jump = held,
        }
    }

    /// Advance by `dt` seconds of host time and present a frame.
    /// Returns the number of ticks run.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let mut ticks = 0;

        if self.is_running() {
            let dt = if dt.is_finite() {
                dt.clamp(0.0, MAX_FRAME_DT)
            } else {
                0.0
            };
            self.accumulator += dt;

            while self.accumulator + ACCUMULATOR_EPSILON >= SIM_DT && ticks < MAX_SUBSTEPS {
                let events = tick(&mut self.state, &self.input);
                self.dispatch(&events);
                self.accumulator -= SIM_DT;
                ticks += 1;

                if !self.is_running() {
                    self.accumulator = 0.0;
                    break;
                }
            }

            // Drop any backlog past the substep cap
            if ticks == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }
            self.accumulator = self.accumulator.max(0.0);
        }

        self.render();
        ticks
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::ScoreChanged(score) => self.observer.on_score_changed(score),
                GameEvent::LivesChanged(lives) => self.observer.on_lives_changed(lives),
                GameEvent::ProgressChanged(percent) => self.observer.on_progress(percent),
                GameEvent::Won { final_score } => self.observer.on_win(final_score),
            }
        }
    }

    fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        build_frame_with(&self.state, &self.scene, &mut self.vertices);

        match surface.present(&self.vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                surface.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Rect;
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Recorder {
        scores: Vec<u32>,
        lives: Vec<u8>,
        progress: Vec<f32>,
        wins: Vec<u32>,
    }

    impl GameObserver for Recorder {
        fn on_score_changed(&mut self, score: u32) {
            self.scores.push(score);
        }
        fn on_lives_changed(&mut self, lives: u8) {
            self.lives.push(lives);
        }
        fn on_progress(&mut self, percent: f32) {
            self.progress.push(percent);
        }
        fn on_win(&mut self, final_score: u32) {
            self.wins.push(final_score);
        }
    }

    #[derive(Default)]
    struct MockSurface {
        frames: Rc<Cell<u32>>,
        reconfigured: Rc<Cell<u32>>,
        fail: Option<wgpu::SurfaceError>,
    }

    impl Surface for MockSurface {
        fn present(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
            assert!(!vertices.is_empty());
            if let Some(err) = self.fail.take() {
                return Err(err);
            }
            self.frames.set(self.frames.get() + 1);
            Ok(())
        }

        fn reconfigure(&mut self) {
            self.reconfigured.set(self.reconfigured.get() + 1);
        }
    }

    fn driver() -> FrameDriver<Recorder> {
        FrameDriver::new(3, Settings::default(), Recorder::default())
    }

    /// Flat floor with the owner right at the start
    fn homecoming_level() -> Level {
        Level {
            player_start: Vec2::new(0.0, 345.0),
            owner: Rect::new(0.0, 290.0, 45.0, 70.0),
            rose: Rect::new(90_000.0, 250.0, 35.0, 45.0),
            platforms: vec![crate::sim::Platform::new(
                -1000.0,
                400.0,
                100_000.0,
                100.0,
                crate::sim::SurfaceKind::Grass,
            )],
            gummies: Vec::new(),
            bottles: Vec::new(),
            clouds: Vec::new(),
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut d = driver();
        assert!(!d.is_running());
        assert!(d.start());
        assert!(!d.start());
        assert!(d.is_running());
    }

    #[test]
    fn test_idle_frames_do_not_tick() {
        let mut d = driver();
        assert_eq!(d.frame(SIM_DT), 0);
        assert_eq!(d.state().time_ticks, 0);
    }

    #[test]
    fn test_one_tick_per_frame_at_60hz() {
        let mut d = driver();
        d.start();
        for _ in 0..600 {
            assert_eq!(d.frame(SIM_DT), 1);
        }
        assert_eq!(d.state().time_ticks, 600);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut d = driver();
        d.start();
        assert_eq!(d.frame(1.0), MAX_SUBSTEPS);
        assert_eq!(d.frame(f32::NAN), 0);
        assert_eq!(d.frame(-1.0), 0);
    }

    #[test]
    fn test_keys_map_through_bindings() {
        let mut d = driver();
        d.start();
        assert!(d.key_down("ArrowRight"));
        assert!(!d.key_down("q"));
        for _ in 0..30 {
            d.frame(SIM_DT);
        }
        assert!(d.state().player.pos.x > 100.0);

        assert!(d.key_up("ArrowRight"));
        for _ in 0..120 {
            d.frame(SIM_DT);
        }
        assert!(d.state().player.vel.x.abs() < 0.01);
    }

    #[test]
    fn test_stop_resets_and_notifies() {
        let mut d = driver();
        d.start();
        d.press(Control::Right);
        for _ in 0..60 {
            d.frame(SIM_DT);
        }
        assert!(!d.observer().progress.is_empty());

        d.stop();
        assert_eq!(d.state().phase, GamePhase::Idle);
        assert_eq!(d.state().player.pos, Vec2::new(100.0, 300.0));
        assert_eq!(d.observer().scores.last(), Some(&0));
        assert_eq!(d.observer().lives.last(), Some(&3));
        assert_eq!(d.observer().progress.last(), Some(&0.0));

        // Held input does not survive a reset
        d.start();
        d.frame(SIM_DT);
        assert!(d.state().player.vel.x.abs() < 1e-6);
    }

    #[test]
    fn test_win_is_reported_once() {
        let mut d = FrameDriver::with_level(homecoming_level(), 1, Settings::default(), Recorder::default());
        d.start();
        d.state.rose.collected = true;
        for _ in 0..10 {
            d.frame(SIM_DT);
        }
        assert_eq!(d.observer().wins, vec![0]);
        assert!(!d.is_running());
        assert!(!d.start());

        d.reset();
        assert!(d.start());
    }

    #[test]
    fn test_frames_present_only_with_surface() {
        let frames = Rc::new(Cell::new(0));
        let mut d = driver();
        d.start();
        d.frame(SIM_DT);

        d.attach_surface(Box::new(MockSurface {
            frames: frames.clone(),
            ..Default::default()
        }));
        d.frame(SIM_DT);
        d.frame(SIM_DT);
        assert_eq!(frames.get(), 2);
    }

    #[test]
    fn test_lost_surface_is_reconfigured() {
        let frames = Rc::new(Cell::new(0));
        let reconfigured = Rc::new(Cell::new(0));
        let mut d = driver();
        d.attach_surface(Box::new(MockSurface {
            frames: frames.clone(),
            reconfigured: reconfigured.clone(),
            fail: Some(wgpu::SurfaceError::Lost),
        }));

        d.frame(SIM_DT);
        assert_eq!(reconfigured.get(), 1);
        assert_eq!(frames.get(), 0);

        d.frame(SIM_DT);
        assert_eq!(frames.get(), 1);
    }

    #[test]
    fn test_settings_cap_particles() {
        let mut settings = Settings::default();
        settings.particles = false;
        let mut d = FrameDriver::new(1, settings, ());
        d.start();
        d.press(Control::Jump);
        for _ in 0..30 {
            d.frame(SIM_DT);
        }
        assert!(d.state().particles.is_empty());    }
}
