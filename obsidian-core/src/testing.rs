//! A [`RenderDevice`] that records every call instead of talking to a GPU.

use std::{
    cell::{Cell, RefCell},
    num::NonZero,
};

use fxhash::FxHashSet;
use glam::Vec4;

use crate::{
    device::{DepthTarget, ProgramId, RenderDevice, ShaderStage, TextureFilter, UniformValue, VertexBufferId},
    error::RenderError,
    texture::TextureHandle,
    vertex::{Topology, Vertex},
};

/// Sources containing this marker fail to compile.
pub const BROKEN_SOURCE: &str = "#error broken";
/// Fragment sources containing this marker compile but fail to link.
pub const UNLINKABLE_SOURCE: &str = "#error unlinkable";

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(ProgramId),
    SetUniform {
        program: ProgramId,
        name: String,
        value: UniformValue,
    },
    CreateVertexBuffer(VertexBufferId),
    Upload {
        buffer: VertexBufferId,
        vertices: Vec<Vertex>,
    },
    DeleteVertexBuffer(VertexBufferId),
    Draw {
        buffer: VertexBufferId,
        topology: Topology,
        count: usize,
    },
    CreateTexture(TextureHandle),
    BindTexture(TextureHandle),
    DeleteTexture(TextureHandle),
    CreateDepthTarget(DepthTarget),
    DeleteDepthTarget(DepthTarget),
    Clear {
        color: Vec4,
        depth: bool,
    },
    DepthTest(bool),
    Blending(bool),
    Viewport(u32, u32),
}

#[derive(Default)]
pub struct RecordingDevice {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    missing_uniforms: RefCell<FxHashSet<String>>,
    pub fail_depth_targets: Cell<bool>,
}

impl RecordingDevice {
    fn next_id(&self) -> NonZero<u32> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        NonZero::new(id).unwrap()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    /// Makes every program report `name` as an inactive uniform.
    pub fn hide_uniform(&self, name: &str) {
        self.missing_uniforms.borrow_mut().insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Every uniform name written so far, in order.
    pub fn uniform_names(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::SetUniform { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// The last value written to uniform `name`.
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::SetUniform { name: n, value, .. } if n == name => Some(*value),
            _ => None,
        })
    }

    /// All draw calls, in submission order.
    pub fn draws(&self) -> Vec<(VertexBufferId, Topology, usize)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Draw {
                    buffer,
                    topology,
                    count,
                } => Some((*buffer, *topology, *count)),
                _ => None,
            })
            .collect()
    }
}

impl RenderDevice for RecordingDevice {
    fn create_program(
        &self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, RenderError> {
        if vertex_src.contains(BROKEN_SOURCE) {
            return Err(RenderError::ShaderCompile {
                stage: ShaderStage::Vertex,
                log: "0:1: error".to_string(),
            });
        }
        if fragment_src.contains(BROKEN_SOURCE) {
            return Err(RenderError::ShaderCompile {
                stage: ShaderStage::Fragment,
                log: "0:1: error".to_string(),
            });
        }
        if fragment_src.contains(UNLINKABLE_SOURCE) {
            return Err(RenderError::ShaderLink("unresolved varying".to_string()));
        }
        let program = ProgramId(self.next_id());
        self.record(Call::CreateProgram(program));
        Ok(program)
    }

    fn delete_program(&self, program: ProgramId) {
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: ProgramId) {
        self.record(Call::UseProgram(program));
    }

    fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue) -> bool {
        if self.missing_uniforms.borrow().contains(name) {
            return false;
        }
        self.record(Call::SetUniform {
            program,
            name: name.to_string(),
            value,
        });
        true
    }

    fn create_vertex_buffer(&self) -> Result<VertexBufferId, RenderError> {
        let buffer = VertexBufferId {
            vao: self.next_id(),
            vbo: self.next_id(),
        };
        self.record(Call::CreateVertexBuffer(buffer));
        Ok(buffer)
    }

    fn upload_vertices(&self, buffer: VertexBufferId, vertices: &[Vertex]) {
        self.record(Call::Upload {
            buffer,
            vertices: vertices.to_vec(),
        });
    }

    fn delete_vertex_buffer(&self, buffer: VertexBufferId) {
        self.record(Call::DeleteVertexBuffer(buffer));
    }

    fn draw_arrays(&self, buffer: VertexBufferId, topology: Topology, count: usize) {
        self.record(Call::Draw {
            buffer,
            topology,
            count,
        });
    }

    fn create_texture(
        &self,
        width: u32,
        height: u32,
        _pixels: &[u8],
        _filter: TextureFilter,
    ) -> Result<TextureHandle, RenderError> {
        let texture = TextureHandle::new(self.next_id(), width, height);
        self.record(Call::CreateTexture(texture));
        Ok(texture)
    }

    fn bind_texture(&self, _unit: u32, texture: TextureHandle) {
        self.record(Call::BindTexture(texture));
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.record(Call::DeleteTexture(texture));
    }

    fn create_depth_target(&self, width: u32, height: u32) -> Result<DepthTarget, RenderError> {
        if self.fail_depth_targets.get() {
            return Err(RenderError::ResourceInit(
                "Shadow framebuffer not complete".to_string(),
            ));
        }
        let target = DepthTarget {
            framebuffer: self.next_id(),
            depth_texture: TextureHandle::new(self.next_id(), width, height),
        };
        self.record(Call::CreateDepthTarget(target));
        Ok(target)
    }

    fn delete_depth_target(&self, target: DepthTarget) {
        self.record(Call::DeleteDepthTarget(target));
    }

    fn clear(&self, color: Vec4, depth: bool) {
        self.record(Call::Clear { color, depth });
    }

    fn set_depth_test(&self, enabled: bool) {
        self.record(Call::DepthTest(enabled));
    }

    fn set_blending(&self, enabled: bool) {
        self.record(Call::Blending(enabled));
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }
}
