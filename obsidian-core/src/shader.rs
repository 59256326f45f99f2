//! Shader programs by name.
//!
//! The [`ShaderRegistry`] compiles, caches and binds programs and writes their uniforms.
//! Lookups that fail at draw time are reported once per name through `log` and then stay quiet,
//! so a missing shader does not flood the log every frame.

use std::{cell::RefCell, rc::Rc};

use fxhash::{FxHashMap, FxHashSet};

use crate::{
    context::RenderContext,
    device::{ProgramId, Uniform, UniformValue},
    error::RenderError,
};

/// Name of the lit shape shader.
pub const DEFAULT_SHADER: &str = "default";
/// Name of the light glow shader drawn over a fullscreen quad.
pub const FULLSCREEN_QUAD_SHADER: &str = "fullscreenQuad";

/// Uniform names shared by the built-in shaders.
pub mod uniforms {
    pub const MVP: &str = "uMVP";
    pub const MODEL: &str = "uModel";
    pub const TEXTURE: &str = "uTexture";
    pub const NUM_LIGHTS: &str = "uNumLights";
    pub const LIGHTS: &str = "uLights";
    pub const LIGHT_POS: &str = "uLightPos";
    pub const LIGHT_DIR: &str = "uLightDir";
    pub const CUTOFF: &str = "uCutoff";
    pub const LIGHT_COLOR: &str = "uLightColor";
    pub const INTENSITY: &str = "uIntensity";
    pub const RADIUS: &str = "uRadius";
}

/// Name-indexed cache of linked shader programs.
pub struct ShaderRegistry {
    ctx: Rc<RenderContext>,
    programs: FxHashMap<String, ProgramId>,
    reported: RefCell<FxHashSet<String>>,
}

impl ShaderRegistry {
    pub fn new(ctx: &Rc<RenderContext>) -> Self {
        Self {
            ctx: Rc::clone(ctx),
            programs: FxHashMap::default(),
            reported: RefCell::new(FxHashSet::default()),
        }
    }

    /// Compiles and links a program and registers it under `name`.
    ///
    /// On failure the registry is left unchanged and the driver log is both logged and
    /// returned. Loading over an existing name replaces and deletes the old program.
    pub fn load_shader(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        name: &str,
    ) -> Result<(), RenderError> {
        let program = match self.ctx.device().create_program(vertex_src, fragment_src) {
            Ok(program) => program,
            Err(err) => {
                log::error!("Failed to build shader '{}': {}", name, err);
                return Err(err);
            }
        };

        if let Some(old) = self.programs.insert(name.to_string(), program) {
            self.ctx.delete_program(old);
        }
        let prefix = format!("{}::", name);
        self.reported
            .borrow_mut()
            .retain(|key| key != name && !key.starts_with(&prefix));
        log::debug!("Loaded shader '{}'", name);
        Ok(())
    }

    /// Binds the program registered under `name` and points `uTexture` at unit 0.
    pub fn use_shader(&self, name: &str) -> Result<ProgramId, RenderError> {
        let Some(program) = self.program(name) else {
            self.report_once(name, || format!("Shader '{}' is not loaded", name));
            return Err(RenderError::ShaderNotFound(name.to_string()));
        };

        self.ctx.use_program(program);
        self.ctx
            .device()
            .set_uniform(program, uniforms::TEXTURE, UniformValue::Int(0));
        Ok(program)
    }

    /// Writes `uniform` of shader `shader`, which must be bound.
    ///
    /// Returns `false` if either the shader or the uniform does not exist; both cases are
    /// reported once and otherwise ignored.
    pub fn set_uniform<T: Uniform>(&self, shader: &str, uniform: &str, value: T) -> bool {
        let Some(program) = self.program(shader) else {
            self.report_once(shader, || format!("Shader '{}' is not loaded", shader));
            return false;
        };

        if self
            .ctx
            .device()
            .set_uniform(program, uniform, value.to_uniform())
        {
            return true;
        }

        let key = format!("{}::{}", shader, uniform);
        self.report_once(&key, || {
            format!("Shader '{}' has no active uniform '{}'", shader, uniform)
        });
        false
    }

    /// Returns the program registered under `name`.
    pub fn program(&self, name: &str) -> Option<ProgramId> {
        self.programs.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Names of all registered programs, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }

    fn report_once(&self, key: &str, message: impl FnOnce() -> String) {
        if self.reported.borrow_mut().insert(key.to_string()) {
            log::warn!("{}", message());
        }
    }
}

impl Drop for ShaderRegistry {
    fn drop(&mut self) {
        for (_, program) in self.programs.drain() {
            self.ctx.delete_program(program);
        }
    }
}
