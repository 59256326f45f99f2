//! Renderer configuration.

use serde::{Deserialize, Serialize};

/// Whether the renderer composes a flat or a perspective scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Orthographic projection centred on the origin, no depth test.
    #[default]
    #[serde(rename = "2d")]
    TwoD,
    /// Perspective projection with hardware depth testing.
    #[serde(rename = "3d")]
    ThreeD,
}

/// Settings the scene renderer is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub mode: RenderMode,
    /// Initial framebuffer size in pixels.
    pub width: u32,
    pub height: u32,
    /// Color the frame is cleared to at the start of [`crate::SceneRenderer::render`].
    pub clear_color: [f32; 4],
    /// Vertical field of view of the 3D projection, in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::TwoD,
            width: 800,
            height: 600,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            fov_degrees: 90.0,
            near: 0.1,
            far: 400.0,
        }
    }
}
