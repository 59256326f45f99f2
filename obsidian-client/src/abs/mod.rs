//! This module contains the platform side of the sandbox: the SDL window with its OpenGL
//! context, the `glow` render device and texture loading.

pub mod app;
pub mod device;
pub mod texture;

pub use app::*;
pub use device::*;
pub use texture::*;
