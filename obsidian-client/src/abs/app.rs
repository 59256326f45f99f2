//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2 window and the OpenGL 3.3
//! core context the sandbox draws into.

use std::sync::Arc;

use obsidian_core::RenderError;

use crate::config::WindowConfig;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

fn init_error(what: &str, err: impl ToString) -> RenderError {
    RenderError::ResourceInit(format!("{}: {}", what, err.to_string()))
}

impl App {
    /// Opens a resizable window and makes a fresh OpenGL context current on it.
    pub fn new(config: &WindowConfig) -> Result<Self, RenderError> {
        let sdl = sdl2::init().map_err(|e| init_error("SDL", e))?;
        let video_subsystem = sdl.video().map_err(|e| init_error("video subsystem", e))?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);

        let window = video_subsystem
            .window(&config.title, config.width, config.height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| init_error("window", e))?;
        let gl_context = window
            .gl_create_context()
            .map_err(|e| init_error("OpenGL context", e))?;
        window
            .gl_make_current(&gl_context)
            .map_err(|e| init_error("OpenGL context", e))?;

        let interval = if config.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(err) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("Could not set swap interval: {}", err);
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(|e| init_error("event pump", e))?;

        log::info!(
            "Opened '{}' ({}x{}, vsync {})",
            config.title,
            config.width,
            config.height,
            config.vsync
        );

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }

    /// Size of the drawable area in pixels, which may differ from the window size on HiDPI
    /// displays.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}
