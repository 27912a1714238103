//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::ParticleColor;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// Opaque color from a 0xRRGGBB literal
    pub const fn rgb(hex: u32) -> [f32; 4] {
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const fn with_alpha(c: [f32; 4], a: f32) -> [f32; 4] {
        [c[0], c[1], c[2], a]
    }

    // Sky stops, top to bottom
    pub const SKY: [[f32; 4]; 4] = [rgb(0x87ceeb), rgb(0xffd700), rgb(0xff8c42), rgb(0xff6b35)];
    /// Relative height of each sky stop
    pub const SKY_STOPS: [f32; 4] = [0.0, 0.3, 0.7, 1.0];
    pub const SUN: [f32; 4] = rgb(0xffd700);
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.2];
    pub const BLACK: [f32; 4] = rgb(0x000000);
    pub const WHITE: [f32; 4] = rgb(0xffffff);

    pub const GRASS: [f32; 4] = rgb(0x228b22);
    pub const GRASS_BLADE: [f32; 4] = rgb(0x32cd32);
    pub const WOOD: [f32; 4] = rgb(0xdeb887);

    pub const DOG_COAT: [f32; 4] = rgb(0xdaa520);
    pub const DOG_HEAD: [f32; 4] = rgb(0x8b4513);

    pub const OWNER_DRESS: [f32; 4] = rgb(0xff69b4);
    pub const OWNER_SKIN: [f32; 4] = rgb(0xffdbac);
    pub const OWNER_HAIR: [f32; 4] = rgb(0xff6347);

    pub const GUMMY_OUTER: [f32; 4] = rgb(0xff1493);
    pub const GUMMY_MIDDLE: [f32; 4] = rgb(0xff69b4);
    pub const GUMMY_INNER: [f32; 4] = rgb(0xffb6c1);

    pub const BOTTLE: [f32; 4] = rgb(0x4169e1);
    pub const BOTTLE_CAP: [f32; 4] = rgb(0x000080);
    pub const SPARK: [f32; 4] = rgb(0xff0000);

    pub const STEM: [f32; 4] = rgb(0x228b22);
    pub const ROSE_CENTER: [f32; 4] = rgb(0xfffacd);
    pub const ROSE_TRAIL: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
}

/// Resolve a particle palette entry
pub fn particle_rgba(color: ParticleColor) -> [f32; 4] {
    match color {
        ParticleColor::Dust => colors::rgb(0x90ee90),
        ParticleColor::Candy => colors::rgb(0xff69b4),
        ParticleColor::Damage => colors::rgb(0xff0000),
        ParticleColor::Petal => colors::WHITE,
        ParticleColor::Gold => colors::rgb(0xffd700),
    }
}

/// HSL (degrees, percent, percent) to RGBA
pub fn hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> [f32; 4] {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m, alpha]
}
