//! The single-threaded render context.
//!
//! [`RenderContext`] wraps a [`RenderDevice`] and makes the global bind state explicit: the
//! currently bound program and texture are fields that callers can inspect. Only
//! [`RenderContext::use_program`] and [`RenderContext::bind_texture`] change them.

use std::{cell::Cell, rc::Rc};

use crate::{
    device::{ProgramId, RenderDevice},
    texture::TextureHandle,
};

/// Owns the device and tracks which program and texture are bound.
pub struct RenderContext {
    device: Rc<dyn RenderDevice>,
    current_program: Cell<Option<ProgramId>>,
    current_texture: Cell<Option<TextureHandle>>,
}

impl RenderContext {
    /// Wraps a device. The context is shared by every object that owns GPU resources.
    pub fn new(device: Rc<dyn RenderDevice>) -> Rc<Self> {
        Rc::new(Self {
            device,
            current_program: Cell::new(None),
            current_texture: Cell::new(None),
        })
    }

    /// Returns the underlying device.
    pub fn device(&self) -> &dyn RenderDevice {
        self.device.as_ref()
    }

    /// Binds `program`. The GPU call is skipped if it is already the current program.
    pub fn use_program(&self, program: ProgramId) {
        if self.current_program.get() != Some(program) {
            self.device.use_program(program);
            self.current_program.set(Some(program));
        }
    }

    /// Returns the program bound by the last [`RenderContext::use_program`].
    pub fn current_program(&self) -> Option<ProgramId> {
        self.current_program.get()
    }

    /// Binds `texture` to unit 0.
    ///
    /// Always issues the GPU call: resource creation binds textures behind the context's back.
    pub fn bind_texture(&self, texture: TextureHandle) {
        self.device.bind_texture(0, texture);
        self.current_texture.set(Some(texture));
    }

    /// Returns the texture bound by the last [`RenderContext::bind_texture`].
    pub fn current_texture(&self) -> Option<TextureHandle> {
        self.current_texture.get()
    }

    /// Deletes `program`, clearing the bind state if it was current.
    pub fn delete_program(&self, program: ProgramId) {
        if self.current_program.get() == Some(program) {
            self.current_program.set(None);
        }
        self.device.delete_program(program);
    }

    /// Deletes `texture`, clearing the bind state if it was current.
    pub fn delete_texture(&self, texture: TextureHandle) {
        if self.current_texture.get() == Some(texture) {
            self.current_texture.set(None);
        }
        self.device.delete_texture(texture);
    }
}
