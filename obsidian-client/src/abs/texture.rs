//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which owns a GPU texture decoded from an image
//! file. Shapes only ever see its [`TextureHandle`].

use std::{path::Path, rc::Rc};

use image::{DynamicImage, GenericImageView};
use obsidian_core::{RenderContext, RenderError, TextureFilter, TextureHandle};

/// Represents a texture stored on the GPU side.
pub struct Texture {
    ctx: Rc<RenderContext>,
    handle: TextureHandle,
}

impl Texture {
    /// Loads an image file. Rows are flipped so that uv (0, 0) is the bottom-left corner.
    pub fn load(
        ctx: &Rc<RenderContext>,
        path: impl AsRef<Path>,
        filter: TextureFilter,
    ) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| RenderError::TextureLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let texture = Self::from_image(ctx, &image.flipv(), filter)?;
        log::debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            texture.handle.width(),
            texture.handle.height()
        );
        Ok(texture)
    }

    /// Like [`Texture::load`], but failures are logged and yield a texture holding the invalid
    /// handle, which draws as the renderer's white default.
    pub fn load_or_fallback(
        ctx: &Rc<RenderContext>,
        path: impl AsRef<Path>,
        filter: TextureFilter,
    ) -> Self {
        Self::load(ctx, path, filter).unwrap_or_else(|err| {
            log::warn!("{}", err);
            Self {
                ctx: Rc::clone(ctx),
                handle: TextureHandle::INVALID,
            }
        })
    }

    /// Creates a new texture from the given [`image::DynamicImage`].
    pub fn from_image(
        ctx: &Rc<RenderContext>,
        image: &DynamicImage,
        filter: TextureFilter,
    ) -> Result<Self, RenderError> {
        let (width, height) = image.dimensions();
        let data = image.to_rgba8().into_raw();
        let handle = ctx.device().create_texture(width, height, &data, filter)?;

        Ok(Self {
            ctx: Rc::clone(ctx),
            handle,
        })
    }

    /// Returns a handle to the texture.
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if self.handle.is_valid() {
            self.ctx.delete_texture(self.handle);
        }
    }
}

impl From<&Texture> for TextureHandle {
    fn from(texture: &Texture) -> Self {
        texture.handle()
    }
}
