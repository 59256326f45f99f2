//! The core of the Obsidian sandbox renderer.
//!
//! This crate contains everything needed to compose a frame: cameras, drawable shapes, light
//! sources, the shader registry and the [`SceneRenderer`] that merges shapes and lights into a
//! single ordered draw sequence. It never talks to a graphics API directly; all GPU work goes
//! through the [`RenderDevice`] trait, which the client implements on top of OpenGL.

pub mod camera;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod geometry;
pub mod light;
pub mod object;
pub mod scene;
pub mod shader;
pub mod shape;
pub mod texture;
pub mod vertex;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::{Camera, Camera2D, Camera3D};
pub use config::{RenderMode, RendererConfig};
pub use context::RenderContext;
pub use device::{
    DepthTarget, ProgramId, RenderDevice, ShaderStage, TextureFilter, Uniform, UniformValue,
    VertexBufferId,
};
pub use error::RenderError;
pub use light::{LightSource, LightType, SharedLight};
pub use object::ObjectGroup;
pub use scene::{FrameStats, MAX_LIGHTS, RenderItem, RenderItemKind, SceneRenderer, ShaderSource};
pub use shader::ShaderRegistry;
pub use shape::{Shape, SharedShape};
pub use texture::TextureHandle;
pub use vertex::{Topology, Vertex};
