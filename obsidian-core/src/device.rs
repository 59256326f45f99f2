//! The GPU seam.
//!
//! This module defines the [`RenderDevice`] trait through which the core issues every GPU
//! command, the opaque ids of the objects a device hands out, and the [`Uniform`] trait for
//! values that can be written into a shader program.

use std::fmt;
use std::num::NonZero;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::{
    error::RenderError,
    texture::TextureHandle,
    vertex::{Topology, Vertex},
};

/// Identifies a linked shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub NonZero<u32>);

/// Identifies a vertex array together with the buffer backing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexBufferId {
    pub vao: NonZero<u32>,
    pub vbo: NonZero<u32>,
}

/// A framebuffer with a single depth texture attachment, used for shadow maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DepthTarget {
    pub framebuffer: NonZero<u32>,
    pub depth_texture: TextureHandle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "Vertex"),
            ShaderStage::Fragment => write!(f, "Fragment"),
        }
    }
}

/// Sampling filter used when creating a texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// A value that can be written into a uniform slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// Represents a value that can be assigned to a uniform variable in a shader program.
pub trait Uniform {
    fn to_uniform(&self) -> UniformValue;
}

impl Uniform for i32 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Int(*self)
    }
}

impl Uniform for f32 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Float(*self)
    }
}

impl Uniform for Vec2 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Vec2(*self)
    }
}

impl Uniform for Vec3 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Vec3(*self)
    }
}

impl Uniform for Vec4 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Vec4(*self)
    }
}

impl Uniform for Mat4 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Mat4(*self)
    }
}

impl Uniform for UniformValue {
    fn to_uniform(&self) -> UniformValue {
        *self
    }
}

impl<T: Uniform> Uniform for &T {
    fn to_uniform(&self) -> UniformValue {
        (*self).to_uniform()
    }
}

/// Everything the renderer needs from a graphics API.
///
/// All methods take `&self`: a device is used from the single thread that owns the graphics
/// context, and implementations keep any bookkeeping in interior cells. Delete calls are only
/// ever issued once per object by the owning Rust value.
pub trait RenderDevice {
    /// Compiles both stages and links them. Nothing is left allocated on failure.
    fn create_program(&self, vertex_src: &str, fragment_src: &str)
    -> Result<ProgramId, RenderError>;
    fn delete_program(&self, program: ProgramId);
    fn use_program(&self, program: ProgramId);
    /// Writes a uniform of `program`, which must be the bound program.
    ///
    /// Returns `false` without touching the GPU when the program has no active uniform named
    /// `name`.
    fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue) -> bool;

    fn create_vertex_buffer(&self) -> Result<VertexBufferId, RenderError>;
    /// Replaces the whole contents of `buffer` with `vertices`.
    fn upload_vertices(&self, buffer: VertexBufferId, vertices: &[Vertex]);
    fn delete_vertex_buffer(&self, buffer: VertexBufferId);
    fn draw_arrays(&self, buffer: VertexBufferId, topology: Topology, count: usize);

    /// Creates a texture from tightly packed RGBA8 pixels.
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        filter: TextureFilter,
    ) -> Result<TextureHandle, RenderError>;
    fn bind_texture(&self, unit: u32, texture: TextureHandle);
    fn delete_texture(&self, texture: TextureHandle);

    fn create_depth_target(&self, width: u32, height: u32) -> Result<DepthTarget, RenderError>;
    fn delete_depth_target(&self, target: DepthTarget);

    fn clear(&self, color: Vec4, depth: bool);
    fn set_depth_test(&self, enabled: bool);
    fn set_blending(&self, enabled: bool);
    fn set_viewport(&self, width: u32, height: u32);
}
