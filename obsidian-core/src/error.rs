//! Error types shared by the renderer and the application shell.

use std::fmt;

use crate::device::ShaderStage;

/// Everything that can go wrong while setting up or drawing a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The window, the graphics context or a GPU object could not be created.
    ResourceInit(String),
    /// A shader stage failed to compile. `log` is the driver's info log.
    ShaderCompile { stage: ShaderStage, log: String },
    /// The program failed to link. Holds the driver's info log.
    ShaderLink(String),
    /// No program is registered under the given name.
    ShaderNotFound(String),
    /// An image could not be read or decoded.
    TextureLoad { path: String, reason: String },
    /// Degenerate input handed to a shape constructor or factory.
    GeometryPrecondition(String),
    /// A shadow operation was requested before shadow resources were created.
    ShadowNotInitialized,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ResourceInit(msg) => write!(f, "Resource initialization failed: {}", msg),
            RenderError::ShaderCompile { stage, log } => {
                write!(f, "{} shader compilation failed: {}", stage, log)
            }
            RenderError::ShaderLink(log) => write!(f, "Shader program link failed: {}", log),
            RenderError::ShaderNotFound(name) => write!(f, "Shader not found: {}", name),
            RenderError::TextureLoad { path, reason } => {
                write!(f, "Failed to load texture {}: {}", path, reason)
            }
            RenderError::GeometryPrecondition(msg) => write!(f, "Invalid geometry: {}", msg),
            RenderError::ShadowNotInitialized => {
                write!(f, "Shadow resources have not been initialized")
            }
        }
    }
}

impl std::error::Error for RenderError {}
