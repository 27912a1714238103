//! Rendering module
//!
//! `scene` turns a `&GameState` into a triangle list in logical 900x500
//! coordinates; a `Surface` presents it. The WebGPU surface lives in
//! `pipeline`.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SceneOptions, build_frame, build_frame_with};
pub use vertex::Vertex;

/// Something a finished frame can be presented on
pub trait Surface {
    /// Draw one frame of logical-coordinate vertices
    fn present(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError>;

    /// Recreate the swapchain after it was lost or went stale
    fn reconfigure(&mut self) {}
}
