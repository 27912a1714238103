//! Static level layout
//!
//! The quest has exactly one hand-placed level. Everything here is read-only
//! fixture data; `GameState` copies what it needs to mutate.

use glam::Vec2;

use super::collision::Rect;

/// Platform surface style (rendering only, physics is identical)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Grass,
    Wood,
}

/// A static platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub rect: Rect,
    pub kind: SurfaceKind,
}

impl Platform {
    pub const fn new(x: f32, y: f32, w: f32, h: f32, kind: SurfaceKind) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind,
        }
    }
}

/// Initial placement of a decorative cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudSpawn {
    pub pos: Vec2,
    pub size: f32,
    /// Leftward drift per tick
    pub speed: f32,
}

/// Complete level fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub player_start: Vec2,
    /// Where the rose must be brought
    pub owner: Rect,
    pub rose: Rect,
    pub platforms: Vec<Platform>,
    /// Top-left corners of gummy clusters
    pub gummies: Vec<Vec2>,
    /// Top-left corners of hair-gel bottles
    pub bottles: Vec<Vec2>,
    pub clouds: Vec<CloudSpawn>,
}

impl Default for Level {
    fn default() -> Self {
        Self::rose_quest()
    }
}

const fn ground(x: f32, w: f32) -> Platform {
    Platform::new(x, 400.0, w, 100.0, SurfaceKind::Grass)
}

const fn ledge(x: f32, y: f32, w: f32) -> Platform {
    Platform::new(x, y, w, 25.0, SurfaceKind::Wood)
}

const PLATFORMS: [Platform; 22] = [
    ground(0.0, 250.0),
    ground(300.0, 180.0),
    ground(530.0, 220.0),
    ground(800.0, 180.0),
    ground(1030.0, 200.0),
    ground(1280.0, 180.0),
    ground(1510.0, 220.0),
    ground(1780.0, 180.0),
    ground(2010.0, 200.0),
    ground(2260.0, 180.0),
    ground(2490.0, 220.0),
    ground(2760.0, 500.0),
    ledge(350.0, 320.0, 120.0),
    ledge(600.0, 280.0, 120.0),
    ledge(900.0, 320.0, 100.0),
    ledge(1150.0, 250.0, 120.0),
    ledge(1400.0, 320.0, 100.0),
    ledge(1650.0, 220.0, 130.0),
    ledge(1900.0, 290.0, 100.0),
    ledge(2150.0, 200.0, 120.0),
    ledge(2400.0, 320.0, 100.0),
    ledge(2650.0, 280.0, 120.0),
];

const GUMMIES: [(f32, f32); 12] = [
    (370.0, 290.0),
    (620.0, 250.0),
    (920.0, 290.0),
    (1170.0, 220.0),
    (1420.0, 290.0),
    (1670.0, 190.0),
    (1920.0, 260.0),
    (2170.0, 170.0),
    (2420.0, 290.0),
    (2670.0, 250.0),
    (2900.0, 370.0),
    (3000.0, 370.0),
];

const BOTTLES: [(f32, f32); 6] = [
    (450.0, 370.0),
    (720.0, 370.0),
    (1100.0, 370.0),
    (1580.0, 370.0),
    (2080.0, 370.0),
    (2580.0, 370.0),
];

const CLOUDS: [(f32, f32, f32, f32); 7] = [
    (200.0, 50.0, 80.0, 0.2),
    (500.0, 80.0, 60.0, 0.15),
    (800.0, 40.0, 100.0, 0.25),
    (1200.0, 70.0, 70.0, 0.18),
    (1600.0, 45.0, 90.0, 0.22),
    (2000.0, 85.0, 65.0, 0.16),
    (2400.0, 55.0, 85.0, 0.24),
];

impl Level {
    /// The Saint Bernard's rose quest
    pub fn rose_quest() -> Self {
        Self {
            player_start: Vec2::new(100.0, 300.0),
            owner: Rect::new(50.0, 290.0, 45.0, 70.0),
            rose: Rect::new(3200.0, 250.0, 35.0, 45.0),
            platforms: PLATFORMS.to_vec(),
            gummies: GUMMIES.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            bottles: BOTTLES.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            clouds: CLOUDS
                .iter()
                .map(|&(x, y, size, speed)| CloudSpawn {
                    pos: Vec2::new(x, y),
                    size,
                    speed,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_above_ground() {
        let level = Level::rose_quest();
        let start = level.player_start;
        assert!(
            level
                .platforms
                .iter()
                .any(|p| start.x >= p.rect.left() && start.x < p.rect.right() && start.y < p.rect.top())
        );
    }

    #[test]
    fn test_rose_is_far_from_owner() {
        let level = Level::rose_quest();
        assert!(level.rose.left() - level.owner.left() > 3000.0);
        assert_eq!(level.gummies.len(), 12);
        assert_eq!(level.bottles.len(), 6);
    }

    #[test]
    fn test_reachable_landing_bands_share_a_top() {
        use crate::consts::{LANDING_TOLERANCE, PLAYER_WIDTH};

        // Overlapping bands would make the tie-break observable
        let level = Level::rose_quest();
        for (i, a) in level.platforms.iter().enumerate() {
            for b in level.platforms.iter().skip(i + 1) {
                let reach_x = a.rect.left() < b.rect.right() + PLAYER_WIDTH
                    && b.rect.left() < a.rect.right() + PLAYER_WIDTH;
                let a_band = (a.rect.top(), a.rect.bottom() + LANDING_TOLERANCE);
                let b_band = (b.rect.top(), b.rect.bottom() + LANDING_TOLERANCE);
                let bands_meet = a_band.0 < b_band.1 && b_band.0 < a_band.1;
                if reach_x && bands_meet {
                    assert_eq!(a.rect.top(), b.rect.top(), "{a:?} / {b:?}");
                }
            }
        }
    }
}
