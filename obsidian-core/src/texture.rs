//! Texture handles.
//!
//! The core never decodes images; it only passes [`TextureHandle`]s around. Creating and
//! destroying the underlying GPU texture is the job of whoever loaded it.

use std::num::NonZero;

/// Represents a lightweight, non-owning handle to a GPU texture.
///
/// A handle with id 0 is invalid. Shapes carrying an invalid handle are drawn with the
/// renderer's white default texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    id: Option<NonZero<u32>>,
    width: u32,
    height: u32,
}

impl TextureHandle {
    /// The invalid handle.
    pub const INVALID: Self = Self {
        id: None,
        width: 0,
        height: 0,
    };

    pub fn new(id: NonZero<u32>, width: u32, height: u32) -> Self {
        Self {
            id: Some(id),
            width,
            height,
        }
    }

    /// Returns the raw id, or `None` for the invalid handle.
    pub fn id(&self) -> Option<NonZero<u32>> {
        self.id
    }

    /// Returns `true` if the handle refers to a texture.
    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    /// Returns `self` if valid, otherwise `fallback`.
    pub fn or(self, fallback: TextureHandle) -> TextureHandle {
        if self.is_valid() { self } else { fallback }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }
}
