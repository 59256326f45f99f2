//! The OpenGL render device.
//!
//! [`GlDevice`] implements the core's [`RenderDevice`] on top of `glow`. Object ids cross the
//! trait boundary as the raw non-zero GL names, so converting back is just wrapping them in the
//! matching `glow::Native*` type.

use std::sync::Arc;

use glam::Vec4;
use glow::HasContext;
use obsidian_core::{
    DepthTarget, ProgramId, RenderDevice, RenderError, ShaderStage, TextureFilter, TextureHandle,
    Topology, UniformValue, Vertex, VertexBufferId,
};

/// Size in bytes of one packed vertex.
const STRIDE: i32 = (Vertex::FLOATS * size_of::<f32>()) as i32;

/// Renders through an OpenGL 3.3 core context.
pub struct GlDevice {
    gl: Arc<glow::Context>,
}

impl GlDevice {
    pub fn new(gl: &Arc<glow::Context>) -> Self {
        Self { gl: Arc::clone(gl) }
    }

    fn compile(&self, stage: ShaderStage, source: &str) -> Result<glow::Shader, RenderError> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };

        unsafe {
            let shader = self
                .gl
                .create_shader(shader_type)
                .map_err(RenderError::ResourceInit)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(RenderError::ShaderCompile { stage, log });
            }

            Ok(shader)
        }
    }
}

fn program(id: ProgramId) -> glow::Program {
    glow::NativeProgram(id.0)
}

fn texture(handle: TextureHandle) -> Option<glow::Texture> {
    handle.id().map(glow::NativeTexture)
}

fn primitive(topology: Topology) -> u32 {
    match topology {
        Topology::Triangles => glow::TRIANGLES,
        Topology::TriangleFan => glow::TRIANGLE_FAN,
        Topology::TriangleStrip => glow::TRIANGLE_STRIP,
        Topology::Lines => glow::LINES,
        Topology::Points => glow::POINTS,
    }
}

impl RenderDevice for GlDevice {
    fn create_program(
        &self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, RenderError> {
        let vert = self.compile(ShaderStage::Vertex, vertex_src)?;
        let frag = match self.compile(ShaderStage::Fragment, fragment_src) {
            Ok(frag) => frag,
            Err(err) => {
                unsafe { self.gl.delete_shader(vert) };
                return Err(err);
            }
        };

        unsafe {
            let program = match self.gl.create_program() {
                Ok(program) => program,
                Err(err) => {
                    self.gl.delete_shader(vert);
                    self.gl.delete_shader(frag);
                    return Err(RenderError::ResourceInit(err));
                }
            };

            self.gl.attach_shader(program, vert);
            self.gl.attach_shader(program, frag);
            self.gl.link_program(program);

            let linked = self.gl.get_program_link_status(program);
            let log = if linked {
                String::new()
            } else {
                self.gl.get_program_info_log(program)
            };

            self.gl.detach_shader(program, vert);
            self.gl.detach_shader(program, frag);
            self.gl.delete_shader(vert);
            self.gl.delete_shader(frag);

            if !linked {
                self.gl.delete_program(program);
                return Err(RenderError::ShaderLink(log));
            }

            Ok(ProgramId(program.0))
        }
    }

    fn delete_program(&self, id: ProgramId) {
        unsafe {
            self.gl.delete_program(program(id));
        }
    }

    fn use_program(&self, id: ProgramId) {
        unsafe {
            self.gl.use_program(Some(program(id)));
        }
    }

    fn set_uniform(&self, id: ProgramId, name: &str, value: UniformValue) -> bool {
        unsafe {
            let Some(loc) = self.gl.get_uniform_location(program(id), name) else {
                return false;
            };
            let loc = Some(&loc);

            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(loc, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(loc, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(loc, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(loc, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => {
                    self.gl
                        .uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array())
                }
            }
        }
        true
    }

    fn create_vertex_buffer(&self) -> Result<VertexBufferId, RenderError> {
        unsafe {
            let vao = self
                .gl
                .create_vertex_array()
                .map_err(RenderError::ResourceInit)?;
            let vbo = match self.gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(err) => {
                    self.gl.delete_vertex_array(vao);
                    return Err(RenderError::ResourceInit(err));
                }
            };

            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));

            // position
            self.gl
                .vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, STRIDE, 0);
            self.gl.enable_vertex_attrib_array(0);
            // color
            self.gl
                .vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, STRIDE, 3 * 4);
            self.gl.enable_vertex_attrib_array(1);
            // uv
            self.gl
                .vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, STRIDE, 7 * 4);
            self.gl.enable_vertex_attrib_array(2);

            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(VertexBufferId {
                vao: vao.0,
                vbo: vbo.0,
            })
        }
    }

    fn upload_vertices(&self, buffer: VertexBufferId, vertices: &[Vertex]) {
        let data = Vertex::pack(vertices);
        unsafe {
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.vbo)));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    data.as_ptr() as *const u8,
                    data.len() * size_of::<f32>(),
                ),
                glow::DYNAMIC_DRAW,
            );
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn delete_vertex_buffer(&self, buffer: VertexBufferId) {
        unsafe {
            self.gl.delete_buffer(glow::NativeBuffer(buffer.vbo));
            self.gl
                .delete_vertex_array(glow::NativeVertexArray(buffer.vao));
        }
    }

    fn draw_arrays(&self, buffer: VertexBufferId, topology: Topology, count: usize) {
        unsafe {
            self.gl
                .bind_vertex_array(Some(glow::NativeVertexArray(buffer.vao)));
            self.gl.draw_arrays(primitive(topology), 0, count as i32);
            self.gl.bind_vertex_array(None);
        }
    }

    fn create_texture(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        filter: TextureFilter,
    ) -> Result<TextureHandle, RenderError> {
        let filter = match filter {
            TextureFilter::Nearest => glow::NEAREST,
            TextureFilter::Linear => glow::LINEAR,
        } as i32;

        unsafe {
            let texture = self
                .gl
                .create_texture()
                .map_err(RenderError::ResourceInit)?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter);
            self.gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(TextureHandle::new(texture.0, width, height))
        }
    }

    fn bind_texture(&self, unit: u32, handle: TextureHandle) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture(handle));
        }
    }

    fn delete_texture(&self, handle: TextureHandle) {
        if let Some(texture) = texture(handle) {
            unsafe {
                self.gl.delete_texture(texture);
            }
        }
    }

    fn create_depth_target(&self, width: u32, height: u32) -> Result<DepthTarget, RenderError> {
        unsafe {
            let fbo = self
                .gl
                .create_framebuffer()
                .map_err(RenderError::ResourceInit)?;
            let depth = match self.gl.create_texture() {
                Ok(depth) => depth,
                Err(err) => {
                    self.gl.delete_framebuffer(fbo);
                    return Err(RenderError::ResourceInit(err));
                }
            };

            self.gl.bind_texture(glow::TEXTURE_2D, Some(depth));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::DEPTH_COMPONENT as i32,
                width as i32,
                height as i32,
                0,
                glow::DEPTH_COMPONENT,
                glow::FLOAT,
                glow::PixelUnpackData::Slice(None),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_BORDER as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_BORDER as i32,
            );
            // Samples outside the map read as fully lit.
            self.gl.tex_parameter_f32_slice(
                glow::TEXTURE_2D,
                glow::TEXTURE_BORDER_COLOR,
                &[1.0, 1.0, 1.0, 1.0],
            );

            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::TEXTURE_2D,
                Some(depth),
                0,
            );
            self.gl.draw_buffer(glow::NONE);
            self.gl.read_buffer(glow::NONE);

            let complete =
                self.gl.check_framebuffer_status(glow::FRAMEBUFFER) == glow::FRAMEBUFFER_COMPLETE;
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            self.gl.bind_texture(glow::TEXTURE_2D, None);

            if !complete {
                self.gl.delete_framebuffer(fbo);
                self.gl.delete_texture(depth);
                return Err(RenderError::ResourceInit(
                    "Shadow framebuffer not complete".to_string(),
                ));
            }

            Ok(DepthTarget {
                framebuffer: fbo.0,
                depth_texture: TextureHandle::new(depth.0, width, height),
            })
        }
    }

    fn delete_depth_target(&self, target: DepthTarget) {
        unsafe {
            self.gl
                .delete_framebuffer(glow::NativeFramebuffer(target.framebuffer));
        }
        self.delete_texture(target.depth_texture);
    }

    fn clear(&self, color: Vec4, depth: bool) {
        let mut mask = glow::COLOR_BUFFER_BIT;
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe {
            self.gl.clear_color(color.x, color.y, color.z, color.w);
            self.gl.clear(mask);
        }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_blending(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::BLEND);
                self.gl
                    .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            } else {
                self.gl.disable(glow::BLEND);
            }
        }
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }
}
