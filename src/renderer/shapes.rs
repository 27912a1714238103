//! Shape generation for 2D primitives
//!
//! Every shape is appended to `out` as a triangle list in logical surface
//! coordinates (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    let [a, b, c, d] = corners;
    // a-b on top, d-c on bottom
    out.push(Vertex::new(a.x, a.y, colors[0]));
    out.push(Vertex::new(b.x, b.y, colors[1]));
    out.push(Vertex::new(d.x, d.y, colors[3]));

    out.push(Vertex::new(d.x, d.y, colors[3]));
    out.push(Vertex::new(b.x, b.y, colors[1]));
    out.push(Vertex::new(c.x, c.y, colors[2]));
}

/// Filled axis-aligned rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, color: [f32; 4]) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let corners = [
        pos,
        pos + Vec2::new(size.x, 0.0),
        pos + size,
        pos + Vec2::new(0.0, size.y),
    ];
    push_quad(out, corners, [color; 4]);
}

/// Rectangle blending from `top` to `bottom` color
pub fn gradient_rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let corners = [
        pos,
        pos + Vec2::new(size.x, 0.0),
        pos + size,
        pos + Vec2::new(0.0, size.y),
    ];
    push_quad(out, corners, [top, top, bottom, bottom]);
}

/// Filled ellipse as a triangle fan
pub fn ellipse(out: &mut Vec<Vertex>, center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    if radius <= 0.0 {
        return;
    }
    ellipse(out, center, Vec2::splat(radius), color, segments);
}

/// Stroked circular arc between two angles (radians, y down so positive is clockwise)
pub fn arc_stroke(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    thickness: f32,
    theta_start: f32,
    theta_end: f32,
    color: [f32; 4],
) {
    let span = theta_end - theta_start;
    let num_segments = ((span.abs() * 8.0) as u32).max(4);
    let inner_r = radius - thickness / 2.0;
    let outer_r = radius + thickness / 2.0;

    for i in 0..num_segments {
        let theta1 = theta_start + span * i as f32 / num_segments as f32;
        let theta2 = theta_start + span * (i + 1) as f32 / num_segments as f32;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let corners = [
            center + dir1 * outer_r,
            center + dir2 * outer_r,
            center + dir2 * inner_r,
            center + dir1 * inner_r,
        ];
        push_quad(out, corners, [color; 4]);
    }
}
