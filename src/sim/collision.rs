//! Axis-aligned collision tests and platform landing
//!
//! Platforms only ever push the player up: there is no side or ceiling
//! resolution, and a player moving upward passes through them.

use glam::Vec2;

use super::level::Platform;
use crate::consts::LANDING_TOLERANCE;

/// Axis-aligned rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Strict horizontal overlap only
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

/// Find the platform a falling body lands on this tick
///
/// A platform qualifies when the body overlaps it horizontally and its bottom
/// edge sits inside the platform's landing band (below the top, above
/// top + height + tolerance). Among qualifying platforms the highest top wins,
/// so the result does not depend on level order. Bodies that are not moving
/// down never land.
pub fn landing_platform<'a>(body: &Rect, vel_y: f32, platforms: &'a [Platform]) -> Option<&'a Platform> {
    if vel_y <= 0.0 {
        return None;
    }
    let bottom = body.bottom();
    platforms
        .iter()
        .filter(|p| {
            let r = &p.rect;
            body.overlaps_x(r) && bottom > r.top() && bottom < r.bottom() + LANDING_TOLERANCE
        })
        .min_by(|a, b| {
            a.rect
                .top()
                .partial_cmp(&b.rect.top())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
