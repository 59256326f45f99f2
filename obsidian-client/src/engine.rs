//! The application shell.
//!
//! [`Obsidian::run`] opens the window, builds the renderer and drives a [`Sandbox`] through its
//! hooks. Each iteration draws, presents, polls input, runs the bindings of held keys with the
//! frame delta and finally does the timing bookkeeping.

use std::rc::Rc;

use fxhash::FxHashSet;
use obsidian_core::{RenderContext, RenderError, RenderMode, RendererConfig, SceneRenderer};
use sdl2::{event::Event, event::WindowEvent, keyboard::Keycode};

use crate::{
    abs::{App, GlDevice},
    config::SandboxConfig,
    render,
    timing::FrameClock,
};

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: FxHashSet<Keycode>,
    pub pressed: FxHashSet<Keycode>,
    pub released: FxHashSet<Keycode>,
}

impl KeyboardState {
    /// Forgets the edge-triggered sets. Called once per frame before polling.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    pub fn key_down(&mut self, key: Keycode) {
        if self.down.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Keycode) {
        if self.down.remove(&key) {
            self.released.insert(key);
        }
    }

    pub fn is_down(&self, key: Keycode) -> bool {
        self.down.contains(&key)
    }
}

type KeyAction<T> = Box<dyn FnMut(&mut T, f32)>;

/// Actions run every frame while their key is held, with the frame delta in seconds.
pub struct KeyBindings<T> {
    bindings: Vec<(Keycode, KeyAction<T>)>,
}

impl<T> Default for KeyBindings<T> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<T> KeyBindings<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `action` to `key`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: Keycode, action: impl FnMut(&mut T, f32) + 'static) {
        self.unbind(key);
        self.bindings.push((key, Box::new(action)));
    }

    /// Removes the binding of `key`. Returns whether there was one.
    pub fn unbind(&mut self, key: Keycode) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|(k, _)| *k != key);
        self.bindings.len() != before
    }

    pub fn is_bound(&self, key: Keycode) -> bool {
        self.bindings.iter().any(|(k, _)| *k == key)
    }

    /// Runs the action of every held key in binding order and returns how many ran.
    pub fn dispatch(&mut self, keyboard: &KeyboardState, target: &mut T, delta: f32) -> usize {
        let mut ran = 0;
        for (key, action) in &mut self.bindings {
            if keyboard.is_down(*key) {
                action(target, delta);
                ran += 1;
            }
        }
        ran
    }
}

/// What key bindings act on: the sandbox together with its renderer.
pub struct Stage<S> {
    pub sandbox: S,
    pub renderer: SceneRenderer,
    /// Cleared to end the main loop after the current frame.
    pub running: bool,
}

/// An application driven by [`Obsidian::run`].
pub trait Sandbox: Sized + 'static {
    /// Called once after the renderer is initialized. Register shapes, lights and key bindings
    /// here.
    fn on_create(
        &mut self,
        ctx: &Rc<RenderContext>,
        renderer: &mut SceneRenderer,
        bindings: &mut KeyBindings<Stage<Self>>,
    ) -> Result<(), RenderError>;

    /// Draws one frame.
    fn on_draw(&mut self, renderer: &mut SceneRenderer) {
        renderer.render();
    }

    /// Called after input handling with the duration of the last frame.
    fn on_frame_drawn(&mut self, _renderer: &mut SceneRenderer, _delta: f32) {}

    /// Called about once per second with the measured frame rate.
    fn on_fps_update(&mut self, _fps: f32) {}

    /// Called after the framebuffer changed size.
    fn on_resize(&mut self, _renderer: &mut SceneRenderer, _width: u32, _height: u32) {}

    /// Called once when the loop ends.
    fn on_destroy(&mut self) {}
}

/// The window, renderer and main loop.
pub struct Obsidian;

impl Obsidian {
    /// Runs `sandbox` until the window is closed or [`Stage::running`] is cleared.
    pub fn run<S: Sandbox>(
        config: &SandboxConfig,
        mode: RenderMode,
        sandbox: S,
    ) -> Result<(), RenderError> {
        let mut app = App::new(&config.window)?;
        let ctx = RenderContext::new(Rc::new(GlDevice::new(&app.gl)));

        let (width, height) = app.drawable_size();
        let renderer_config = RendererConfig {
            mode,
            width,
            height,
            ..config.renderer.clone()
        };
        let mut renderer = SceneRenderer::new(&ctx, renderer_config);
        renderer.initialize(render::default_shader()?, render::fullscreen_quad_shader()?)?;

        let mut stage = Stage {
            sandbox,
            renderer,
            running: true,
        };
        let mut bindings = KeyBindings::new();
        stage
            .sandbox
            .on_create(&ctx, &mut stage.renderer, &mut bindings)?;

        let mut keyboard = KeyboardState::default();
        let mut clock = FrameClock::new();

        'running: while stage.running {
            stage.sandbox.on_draw(&mut stage.renderer);
            app.window.gl_swap_window();

            keyboard.begin_frame();
            for event in app.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => break 'running,
                    Event::Window {
                        win_event: WindowEvent::SizeChanged(..),
                        ..
                    } => {
                        let (width, height) = app.window.drawable_size();
                        match stage.renderer.set_window_size(width, height) {
                            Ok(()) => stage.sandbox.on_resize(&mut stage.renderer, width, height),
                            Err(err) => log::debug!("Ignoring resize: {}", err),
                        }
                    }
                    Event::KeyDown {
                        keycode: Some(keycode),
                        repeat: false,
                        ..
                    } => keyboard.key_down(keycode),
                    Event::KeyUp {
                        keycode: Some(keycode),
                        repeat: false,
                        ..
                    } => keyboard.key_up(keycode),
                    _ => {}
                }
            }

            let frame = clock.tick();
            bindings.dispatch(&keyboard, &mut stage, frame.delta);
            stage.sandbox.on_frame_drawn(&mut stage.renderer, frame.delta);
            if let Some(fps) = frame.fps {
                stage.sandbox.on_fps_update(fps);
            }
        }

        stage.sandbox.on_destroy();
        log::info!("Shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_edges() {
        let mut keyboard = KeyboardState::default();
        keyboard.key_down(Keycode::W);
        keyboard.key_down(Keycode::W);
        assert!(keyboard.is_down(Keycode::W));
        assert!(keyboard.pressed.contains(&Keycode::W));

        keyboard.begin_frame();
        keyboard.key_up(Keycode::W);
        assert!(!keyboard.is_down(Keycode::W));
        assert!(keyboard.pressed.is_empty());
        assert!(keyboard.released.contains(&Keycode::W));
    }

    #[test]
    fn test_dispatch_runs_held_keys_with_delta() {
        let mut bindings = KeyBindings::<Vec<(char, f32)>>::new();
        bindings.bind(Keycode::W, |log, dt| log.push(('w', dt)));
        bindings.bind(Keycode::S, |log, dt| log.push(('s', dt)));

        let mut keyboard = KeyboardState::default();
        keyboard.key_down(Keycode::W);

        let mut log = Vec::new();
        assert_eq!(bindings.dispatch(&keyboard, &mut log, 0.5), 1);
        assert_eq!(log, vec![('w', 0.5)]);
    }

    #[test]
    fn test_rebind_replaces_and_unbind_removes() {
        let mut bindings = KeyBindings::<i32>::new();
        bindings.bind(Keycode::A, |n, _| *n += 1);
        bindings.bind(Keycode::A, |n, _| *n += 10);

        let mut keyboard = KeyboardState::default();
        keyboard.key_down(Keycode::A);
        let mut n = 0;
        bindings.dispatch(&keyboard, &mut n, 0.0);
        assert_eq!(n, 10);

        assert!(bindings.unbind(Keycode::A));
        assert!(!bindings.unbind(Keycode::A));
        assert!(!bindings.is_bound(Keycode::A));
        assert_eq!(bindings.dispatch(&keyboard, &mut n, 0.0), 0);
    }
}
