//! Render pass: game state to a vertex list
//!
//! Reads `&GameState` only. World shapes are drawn through a `Painter` that
//! applies the camera offset, an optional horizontal mirror and a global
//! alpha, the same way a 2D canvas context would.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes;
use super::vertex::{Vertex, colors, hsl, particle_rgba};
use crate::consts::{SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::sim::{Facing, GameState, Rect, SparkleTint, SurfaceKind};

const CIRCLE_SEGMENTS: u32 = 16;
const SUN_SEGMENTS: u32 = 32;

/// Render toggles taken from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    /// Sparkles, sparks and the rose trail
    pub effects: bool,
    /// Freeze grass sway and sun parallax
    pub reduced_motion: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            effects: true,
            reduced_motion: false,
        }
    }
}

/// Build the full frame with default options
pub fn build_frame(state: &GameState, out: &mut Vec<Vertex>) {
    build_frame_with(state, &SceneOptions::default(), out);
}

/// Build the full frame into `out` (cleared first)
pub fn build_frame_with(state: &GameState, options: &SceneOptions, out: &mut Vec<Vertex>) {
    out.clear();
    let camera_x = state.camera.x;

    draw_sky(out);
    let sun_x = if options.reduced_motion {
        150.0
    } else {
        150.0 - camera_x * 0.1
    };
    shapes::circle(out, Vec2::new(sun_x, 80.0), 40.0, colors::SUN, SUN_SEGMENTS);

    let mut world = Painter::new(out, Vec2::new(-camera_x, 0.0));
    draw_clouds(&mut world, state);
    draw_platforms(&mut world, state, options);
    if state.owner_visible() {
        draw_owner(&mut world, &state.owner);
    }
    draw_player(&mut world, state);
    draw_gummies(&mut world, state, options);
    draw_bottles(&mut world, state, options);
    draw_rose(&mut world, state, options);
    draw_particles(&mut world, state);

    if state.rose.collected && options.effects {
        draw_rose_trail(out, state);
    }
}

/// Canvas-like drawing context over a vertex list
pub struct Painter<'a> {
    out: &'a mut Vec<Vertex>,
    offset: Vec2,
    /// Mirror x coordinates about this vertical line
    mirror_x: Option<f32>,
    alpha: f32,
}

impl<'a> Painter<'a> {
    pub fn new(out: &'a mut Vec<Vertex>, offset: Vec2) -> Self {
        Self {
            out,
            offset,
            mirror_x: None,
            alpha: 1.0,
        }
    }

    pub fn set_mirror(&mut self, axis: Option<f32>) {
        self.mirror_x = axis;
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn point(&self, p: Vec2) -> Vec2 {
        let x = match self.mirror_x {
            Some(axis) => 2.0 * axis - p.x,
            None => p.x,
        };
        Vec2::new(x, p.y) + self.offset
    }

    fn tint(&self, color: [f32; 4]) -> [f32; 4] {
        colors::with_alpha(color, color[3] * self.alpha)
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        let left = match self.mirror_x {
            Some(axis) => 2.0 * axis - (x + w),
            None => x,
        };
        let pos = Vec2::new(left, y) + self.offset;
        let color = self.tint(color);
        shapes::rect(self.out, pos, Vec2::new(w, h), color);
    }

    pub fn ellipse(&mut self, center: Vec2, radii: Vec2, color: [f32; 4]) {
        let center = self.point(center);
        let color = self.tint(color);
        shapes::ellipse(self.out, center, radii, color, CIRCLE_SEGMENTS);
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        let center = self.point(center);
        let color = self.tint(color);
        shapes::circle(self.out, center, radius, color, CIRCLE_SEGMENTS);
    }

    pub fn arc(&mut self, center: Vec2, radius: f32, thickness: f32, start: f32, end: f32, color: [f32; 4]) {
        let (start, end) = match self.mirror_x {
            Some(_) => (PI - end, PI - start),
            None => (start, end),
        };
        let center = self.point(center);
        let color = self.tint(color);
        shapes::arc_stroke(self.out, center, radius, thickness, start, end, color);
    }
}

fn draw_sky(out: &mut Vec<Vertex>) {
    for i in 0..colors::SKY.len() - 1 {
        let y0 = colors::SKY_STOPS[i] * SURFACE_HEIGHT;
        let y1 = colors::SKY_STOPS[i + 1] * SURFACE_HEIGHT;
        shapes::gradient_rect(
            out,
            Vec2::new(0.0, y0),
            Vec2::new(SURFACE_WIDTH, y1 - y0),
            colors::SKY[i],
            colors::SKY[i + 1],
        );
    }
}

fn draw_clouds(p: &mut Painter, state: &GameState) {
    for cloud in &state.clouds {
        let third = cloud.size / 3.0;
        p.circle(cloud.pos, cloud.size / 2.0, colors::CLOUD);
        p.circle(cloud.pos + Vec2::new(third, 0.0), third, colors::CLOUD);
        p.circle(cloud.pos - Vec2::new(third, 0.0), third, colors::CLOUD);
    }
}

/// Horizontally inside the view (with a margin for grass and shadows)
fn on_screen(rect: &Rect, camera_x: f32) -> bool {
    rect.right() >= camera_x - 20.0 && rect.left() <= camera_x + SURFACE_WIDTH + 20.0
}

fn draw_platforms(p: &mut Painter, state: &GameState, options: &SceneOptions) {
    let sway_frame = if options.reduced_motion {
        0.0
    } else {
        state.time_ticks as f32
    };

    for platform in state.platforms.iter().filter(|pl| on_screen(&pl.rect, state.camera.x)) {
        let r = &platform.rect;
        match platform.kind {
            SurfaceKind::Grass => {
                p.rect(r.left(), r.top(), r.size.x, r.size.y, colors::GRASS);
                let mut i = 0.0;
                while i < r.size.x {
                    let height = (i * 0.1 + sway_frame * 0.05).sin() * 3.0 + 5.0;
                    p.rect(r.left() + i, r.top() - height, 2.0, height, colors::GRASS_BLADE);
                    i += 10.0;
                }
            }
            SurfaceKind::Wood => p.rect(r.left(), r.top(), r.size.x, r.size.y, colors::WOOD),
        }
    }
}

fn draw_shadow(p: &mut Painter, body: &Rect) {
    let center = Vec2::new(body.center().x, body.bottom() + 5.0);
    p.ellipse(center, Vec2::new(body.size.x / 2.0, 8.0), colors::SHADOW);
}

fn draw_owner(p: &mut Painter, owner: &Rect) {
    let (x, y) = (owner.left(), owner.top());
    draw_shadow(p, owner);

    p.rect(x + 5.0, y + 35.0, owner.size.x - 10.0, 35.0, colors::OWNER_DRESS);
    p.rect(x + 8.0, y + 5.0, 30.0, 32.0, colors::OWNER_SKIN);
    p.rect(x + 3.0, y, 40.0, 20.0, colors::OWNER_HAIR);
    p.rect(x + 13.0, y + 15.0, 3.0, 3.0, colors::BLACK);
    p.rect(x + 28.0, y + 15.0, 3.0, 3.0, colors::BLACK);
    p.arc(Vec2::new(x + 23.0, y + 22.0), 8.0, 2.0, 0.2, PI - 0.2, colors::BLACK);
}

fn draw_player(p: &mut Painter, state: &GameState) {
    let player = &state.player;
    let body = player.rect();
    let (x, y) = (body.left(), body.top());

    let blink = player.invulnerable > 0 && (state.time_ticks / 5) % 2 == 1;
    p.set_alpha(if blink { 0.5 } else { 1.0 });
    p.set_mirror(match player.facing {
        Facing::Left => Some(body.center().x),
        Facing::Right => None,
    });

    draw_shadow(p, &body);

    // Body and head
    p.rect(x, y + 25.0, body.size.x - 15.0, 25.0, colors::DOG_COAT);
    p.rect(x + 40.0, y, 30.0, 30.0, colors::DOG_HEAD);

    // Markings
    p.rect(x + 43.0, y + 3.0, 24.0, 20.0, colors::WHITE);
    p.rect(x + 5.0, y + 28.0, 25.0, 18.0, colors::WHITE);

    // Nose and eyes
    p.rect(x + 65.0, y + 15.0, 4.0, 3.0, colors::BLACK);
    p.rect(x + 45.0, y + 8.0, 3.0, 3.0, colors::BLACK);
    p.rect(x + 58.0, y + 8.0, 3.0, 3.0, colors::BLACK);

    let leg = (player.anim_phase * 0.3).sin() * 2.0;
    for (dx, sign) in [(8.0, 1.0), (25.0, -1.0), (42.0, 1.0), (55.0, -1.0)] {
        p.rect(x + dx, y + 40.0 + leg * sign, 10.0, 15.0, colors::DOG_COAT);
    }

    let wag = (player.anim_phase * 0.4).sin() * 10.0;
    p.rect(x - 8.0 + wag, y + 20.0, 12.0, 4.0, colors::DOG_HEAD);

    p.set_mirror(None);
    p.set_alpha(1.0);
}

fn sparkle_color(tint: SparkleTint, opacity: f32) -> [f32; 4] {
    match tint {
        SparkleTint::White => colors::with_alpha(colors::WHITE, opacity),
        SparkleTint::Magic { hue, lightness } => hsl(hue, 100.0, lightness, opacity),
    }
}

fn draw_gummies(p: &mut Painter, state: &GameState, options: &SceneOptions) {
    for gummy in state.gummies.iter().filter(|g| !g.collected) {
        if options.effects {
            for s in &gummy.sparkles {
                p.rect(s.pos.x, s.pos.y, s.size, s.size, sparkle_color(s.tint, s.opacity()));
            }
        }
        let (x, y) = (gummy.pos.x, gummy.pos.y);
        p.rect(x, y, 18.0, 18.0, colors::GUMMY_OUTER);
        p.rect(x + 3.0, y + 3.0, 12.0, 12.0, colors::GUMMY_MIDDLE);
        p.rect(x + 6.0, y + 6.0, 6.0, 6.0, colors::GUMMY_INNER);
    }
}

fn draw_bottles(p: &mut Painter, state: &GameState, options: &SceneOptions) {
    for bottle in &state.bottles {
        if options.effects {
            for s in &bottle.sparks {
                p.rect(s.pos.x, s.pos.y, 2.0, 2.0, colors::with_alpha(colors::SPARK, s.opacity()));
            }
        }
        let r = bottle.rect();
        let (x, y) = (r.left(), r.top());
        p.rect(x, y, r.size.x, r.size.y, colors::BOTTLE);
        p.rect(x + 5.0, y - 5.0, 15.0, 8.0, colors::BOTTLE_CAP);
        p.rect(x + 3.0, y + 10.0, 19.0, 15.0, colors::WHITE);
    }
}

fn draw_rose(p: &mut Painter, state: &GameState, options: &SceneOptions) {
    let rose = &state.rose;
    if rose.collected {
        return;
    }
    if options.effects {
        for s in &rose.sparkles {
            p.rect(s.pos.x, s.pos.y, s.size, s.size, sparkle_color(s.tint, s.opacity()));
        }
    }

    let (x, y) = (rose.rect.left(), rose.rect.top());
    p.rect(x + 15.0, y + 20.0, 8.0, 30.0, colors::STEM);

    const PETALS: usize = 12;
    for layer in 0..3 {
        let layer_f = layer as f32;
        let radius = 18.0 - layer_f * 4.0;
        let size = 6.0 - layer_f;
        let color = colors::with_alpha(colors::WHITE, 0.9 - layer_f * 0.2);
        for i in 0..PETALS {
            let angle = i as f32 * 2.0 * PI / PETALS as f32 + layer_f * 0.3;
            let px = x + 18.0 + angle.cos() * radius;
            let py = y + 15.0 + angle.sin() * radius;
            p.rect(px, py, size, size, color);
        }
    }

    p.rect(x + 15.0, y + 12.0, 8.0, 8.0, colors::ROSE_CENTER);
}

fn draw_particles(p: &mut Painter, state: &GameState) {
    for particle in state.particles.iter() {
        let alpha = particle.opacity();
        let color = colors::with_alpha(particle_rgba(particle.color), alpha);
        p.circle(particle.pos, particle.size * alpha, color);
    }
}

/// Dots orbiting the player while carrying the rose (screen space)
fn draw_rose_trail(out: &mut Vec<Vertex>, state: &GameState) {
    let t = state.time_ticks as f32 * 0.1;
    let base = state.player.pos - Vec2::new(state.camera.x, 0.0);
    for i in 0..10 {
        let phase = t + i as f32;
        let center = base + Vec2::new(phase.sin() * 20.0, phase.cos() * 10.0);
        shapes::circle(out, center, 3.0, colors::ROSE_TRAIL, CIRCLE_SEGMENTS);
    }
}
