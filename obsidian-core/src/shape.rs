//! Drawable shapes.
//!
//! A [`Shape`] keeps its vertices on the CPU and mirrors them in a GPU vertex buffer it owns.
//! Every mutation of the vertex array goes through [`Shape::update_buffers`], so the buffer
//! never lags behind the CPU copy by more than the call that changed it.

use std::{cell::RefCell, rc::Rc};

use glam::{Mat4, Vec3};

use crate::{
    context::RenderContext,
    device::VertexBufferId,
    error::RenderError,
    geometry,
    shader::{ShaderRegistry, uniforms},
    texture::TextureHandle,
    vertex::{Topology, Vertex},
};

/// A shape shared between the scene renderer and application code.
pub type SharedShape = Rc<RefCell<Shape>>;

/// A drawable vertex list with its own GPU buffer.
pub struct Shape {
    ctx: Rc<RenderContext>,
    buffer: VertexBufferId,
    vertices: Vec<Vertex>,
    topology: Topology,
    /// Texture sampled by the default shader. Not owned.
    pub texture: TextureHandle,
    /// Uploaded as `uModel`; vertex transforms below do not touch it.
    pub model_matrix: Mat4,
    /// Invisible shapes are left out of the frame.
    pub visible: bool,
    /// Order key. Lower keys are drawn first.
    pub depth: f32,
}

fn check_vertex_count(vertices: &[Vertex], topology: Topology) -> Result<(), RenderError> {
    if vertices.len() < topology.min_vertices() {
        return Err(RenderError::GeometryPrecondition(format!(
            "{:?} needs at least {} vertices, got {}",
            topology,
            topology.min_vertices(),
            vertices.len()
        )));
    }
    Ok(())
}

impl Shape {
    /// Creates a shape and uploads its vertices.
    pub fn new(
        ctx: &Rc<RenderContext>,
        vertices: Vec<Vertex>,
        texture: TextureHandle,
        topology: Topology,
    ) -> Result<Self, RenderError> {
        check_vertex_count(&vertices, topology)?;
        let buffer = ctx.device().create_vertex_buffer()?;

        let shape = Self {
            ctx: Rc::clone(ctx),
            buffer,
            vertices,
            topology,
            texture,
            model_matrix: Mat4::IDENTITY,
            visible: true,
            depth: 0.0,
        };
        shape.update_buffers();
        Ok(shape)
    }

    /// Wraps the shape for registration with a [`crate::SceneRenderer`].
    pub fn into_shared(self) -> SharedShape {
        Rc::new(RefCell::new(self))
    }

    /// Sets the order key, builder style.
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the texture, builder style.
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = texture;
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn buffer(&self) -> VertexBufferId {
        self.buffer
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    pub fn set_texture(&mut self, texture: TextureHandle) {
        self.texture = texture;
    }

    pub fn set_model_matrix(&mut self, model_matrix: Mat4) {
        self.model_matrix = model_matrix;
    }

    /// Replaces the vertex list. Rejected lists leave the shape untouched.
    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) -> Result<(), RenderError> {
        check_vertex_count(&vertices, self.topology)?;
        self.vertices = vertices;
        self.update_buffers();
        Ok(())
    }

    /// Re-uploads the CPU vertex array into the GPU buffer.
    pub fn update_buffers(&self) {
        self.ctx.device().upload_vertices(self.buffer, &self.vertices);
    }

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
        self.update_buffers();
    }

    /// Rotates every vertex about `origin`: yaw around the Y axis, then pitch around the X axis.
    /// Angles are in degrees.
    pub fn rotate(&mut self, origin: Vec3, pitch: f32, yaw: f32) {
        let transform = Mat4::from_translation(origin)
            * Mat4::from_rotation_y(yaw.to_radians())
            * Mat4::from_rotation_x(pitch.to_radians())
            * Mat4::from_translation(-origin);
        self.transform_vertices(transform);
    }

    /// Rotates every vertex in the XY plane about `origin` by `degrees`, counter-clockwise.
    pub fn rotate_2d(&mut self, origin: Vec3, degrees: f32) {
        let transform = Mat4::from_translation(origin)
            * Mat4::from_rotation_z(degrees.to_radians())
            * Mat4::from_translation(-origin);
        self.transform_vertices(transform);
    }

    /// Scales every vertex by `factors` relative to `origin`.
    pub fn scale(&mut self, factors: Vec3, origin: Vec3) {
        for vertex in &mut self.vertices {
            vertex.position = (vertex.position - origin) * factors + origin;
        }
        self.update_buffers();
    }

    fn transform_vertices(&mut self, transform: Mat4) {
        for vertex in &mut self.vertices {
            vertex.position = transform.transform_point3(vertex.position);
        }
        self.update_buffers();
    }

    /// Writes `uModel` and `uMVP` for `shader`, binds the texture (or `fallback` if the shape has
    /// none) and issues the draw call. The shader must already be bound.
    pub fn draw(
        &self,
        shaders: &ShaderRegistry,
        shader: &str,
        view: Mat4,
        projection: Mat4,
        fallback: TextureHandle,
    ) {
        let mvp = projection * view * self.model_matrix;
        shaders.set_uniform(shader, uniforms::MODEL, self.model_matrix);
        shaders.set_uniform(shader, uniforms::MVP, mvp);
        self.ctx.bind_texture(self.texture.or(fallback));
        self.draw_arrays();
    }

    /// Issues the draw call for the whole vertex list without touching any uniforms.
    pub(crate) fn draw_arrays(&self) {
        self.ctx
            .device()
            .draw_arrays(self.buffer, self.topology, self.vertices.len());
    }

    /// A `width` x `height` rectangle centred on the origin, drawn as a triangle fan.
    pub fn rectangle(ctx: &Rc<RenderContext>, width: f32, height: f32) -> Result<Self, RenderError> {
        Self::new(
            ctx,
            geometry::rectangle(width, height)?,
            TextureHandle::INVALID,
            Topology::TriangleFan,
        )
    }

    /// A white triangle from three vertices.
    pub fn triangle(
        ctx: &Rc<RenderContext>,
        v1: Vertex,
        v2: Vertex,
        v3: Vertex,
    ) -> Result<Self, RenderError> {
        Self::new(ctx, vec![v1, v2, v3], TextureHandle::INVALID, Topology::Triangles)
    }

    /// A filled circle made of `segments` fan slices.
    pub fn circle(ctx: &Rc<RenderContext>, radius: f32, segments: u32) -> Result<Self, RenderError> {
        Self::new(
            ctx,
            geometry::circle(radius, segments)?,
            TextureHandle::INVALID,
            Topology::TriangleFan,
        )
    }

    pub fn sphere(
        ctx: &Rc<RenderContext>,
        radius: f32,
        latitude_segments: u32,
        longitude_segments: u32,
    ) -> Result<Self, RenderError> {
        Self::new(
            ctx,
            geometry::sphere(radius, latitude_segments, longitude_segments)?,
            TextureHandle::INVALID,
            Topology::Triangles,
        )
    }

    pub fn cuboid(ctx: &Rc<RenderContext>, size: Vec3) -> Result<Self, RenderError> {
        Self::new(
            ctx,
            geometry::cuboid(size)?,
            TextureHandle::INVALID,
            Topology::Triangles,
        )
    }

    pub fn pyramid(
        ctx: &Rc<RenderContext>,
        base_width: f32,
        base_length: f32,
        height: f32,
    ) -> Result<Self, RenderError> {
        Self::new(
            ctx,
            geometry::pyramid(base_width, base_length, height)?,
            TextureHandle::INVALID,
            Topology::Triangles,
        )
    }
}

impl Drop for Shape {
    fn drop(&mut self) {
        self.ctx.device().delete_vertex_buffer(self.buffer);
    }
}
