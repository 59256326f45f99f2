//! Demo scenes.
//!
//! [`LightsDemo`] is a flat scene showing how lights and shapes interleave by order key.
//! [`BlocksDemo`] is a free-flying 3D camera around a textured block and a spinning sphere.

use std::{path::PathBuf, rc::Rc};

use glam::{Vec2, Vec3, Vec4};
use obsidian_core::{
    LightSource, ObjectGroup, RenderContext, RenderError, SceneRenderer, Shape, SharedLight,
    SharedShape, TextureFilter, TextureHandle, Topology, Vertex,
};
use sdl2::keyboard::Keycode;

use crate::{
    abs::Texture,
    config::SandboxConfig,
    engine::{KeyBindings, Sandbox, Stage},
};

const PAN_SPEED: f32 = 300.0;
const LAMP_SPEED: f32 = 250.0;
const ZOOM_SPEED: f32 = 1.5;

pub struct LightsDemo {
    asset_dir: PathBuf,
    shadow_map_size: u32,
    textures: Vec<Texture>,
    spinner: ObjectGroup,
    lamp: Option<SharedLight>,
    beam: Option<SharedLight>,
}

impl LightsDemo {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            asset_dir: config.asset_dir.clone(),
            shadow_map_size: config.shadow_map_size,
            textures: Vec::new(),
            spinner: ObjectGroup::new(),
            lamp: None,
            beam: None,
        }
    }

    fn move_lamp(stage: &mut Stage<Self>, offset: Vec2) {
        if let Some(lamp) = &stage.sandbox.lamp {
            lamp.borrow_mut().position += offset;
        }
    }

    fn pan(stage: &mut Stage<Self>, offset: Vec2) {
        if let Some(camera) = stage.renderer.camera_mut().as_2d_mut() {
            camera.move_by(offset / camera.zoom);
        }
    }

    fn zoom(stage: &mut Stage<Self>, factor: f32) {
        if let Some(camera) = stage.renderer.camera_mut().as_2d_mut() {
            let zoom = (camera.zoom * factor).clamp(0.1, 10.0);
            camera.set_zoom(zoom);
        }
    }

    fn update_beam_shadow(&self, width: u32, height: u32) {
        let Some(beam) = &self.beam else {
            return;
        };
        let mut beam = beam.borrow_mut();
        if !beam.is_shadow_capable() {
            return;
        }
        if let Err(err) = beam.update_light_space_matrix(width as f32, height as f32) {
            log::warn!("Could not update light space matrix: {}", err);
        }
    }
}

impl Sandbox for LightsDemo {
    fn on_create(
        &mut self,
        ctx: &Rc<RenderContext>,
        renderer: &mut SceneRenderer,
        bindings: &mut KeyBindings<Stage<Self>>,
    ) -> Result<(), RenderError> {
        renderer.set_clear_color(Vec4::new(0.04, 0.04, 0.07, 1.0));

        let crate_texture =
            Texture::load_or_fallback(ctx, self.asset_dir.join("crate.png"), TextureFilter::Nearest);

        let mut floor = Shape::rectangle(ctx, 900.0, 500.0)?.with_depth(-10.0);
        floor.translate(Vec3::new(0.0, -50.0, 0.0));
        renderer.add_shape(floor.into_shared());

        let mut boxed = Shape::rectangle(ctx, 140.0, 140.0)?
            .with_texture(crate_texture.handle())
            .with_depth(1.0);
        boxed.translate(Vec3::new(-220.0, 0.0, 0.0));
        renderer.add_shape(boxed.into_shared());

        let mut disc = Shape::circle(ctx, 70.0, 48)?.with_depth(1.0);
        disc.translate(Vec3::new(220.0, 0.0, 0.0));
        renderer.add_shape(disc.into_shared());

        // Drawn after the lamp glow, so it stays unaffected by it.
        let marker = Shape::triangle(
            ctx,
            Vertex::new(Vec3::new(-40.0, 160.0, 0.0), Vec4::new(1.0, 0.2, 0.2, 1.0), Vec2::ZERO),
            Vertex::new(Vec3::new(40.0, 160.0, 0.0), Vec4::new(0.2, 1.0, 0.2, 1.0), Vec2::X),
            Vertex::new(Vec3::new(0.0, 230.0, 0.0), Vec4::new(0.2, 0.2, 1.0, 1.0), Vec2::ONE),
        )?
        .with_depth(10.0);
        renderer.add_shape(marker.into_shared());

        for offset in [-60.0, 60.0] {
            let mut blade = Shape::rectangle(ctx, 100.0, 16.0)?.with_depth(2.0);
            blade.translate(Vec3::new(offset, -120.0, 0.0));
            self.spinner.add_shape(blade.into_shared());
        }
        self.spinner.add_to_scene(renderer);

        renderer.add_light(LightSource::ambient().with_intensity(0.35).into_shared());

        let lamp = LightSource::point(Vec2::new(0.0, 40.0), 320.0)
            .with_color(Vec3::new(1.0, 0.8, 0.5))
            .with_intensity(0.8)
            .with_cutoff_degrees(60.0)
            .with_depth(5.0)
            .into_shared();
        renderer.add_light(lamp.clone());
        self.lamp = Some(lamp);

        let mut beam = LightSource::directional(Vec2::new(-380.0, 260.0), Vec2::new(1.0, -0.6))
            .with_color(Vec3::new(0.4, 0.6, 1.0))
            .with_radius(900.0)
            .with_depth(0.5);
        match beam.init_shadow_resources(ctx, self.shadow_map_size, self.shadow_map_size) {
            Ok(()) => log::debug!("Beam light is shadow capable"),
            Err(err) => log::warn!("Beam light without shadows: {}", err),
        }
        let beam = beam.into_shared();
        renderer.add_light(beam.clone());
        self.beam = Some(beam);
        let (width, height) = renderer.window_size();
        self.update_beam_shadow(width, height);

        self.textures.push(crate_texture);

        bindings.bind(Keycode::Escape, |stage, _| stage.running = false);
        bindings.bind(Keycode::Left, |stage, dt| {
            Self::move_lamp(stage, Vec2::new(-LAMP_SPEED * dt, 0.0))
        });
        bindings.bind(Keycode::Right, |stage, dt| {
            Self::move_lamp(stage, Vec2::new(LAMP_SPEED * dt, 0.0))
        });
        bindings.bind(Keycode::Up, |stage, dt| {
            Self::move_lamp(stage, Vec2::new(0.0, LAMP_SPEED * dt))
        });
        bindings.bind(Keycode::Down, |stage, dt| {
            Self::move_lamp(stage, Vec2::new(0.0, -LAMP_SPEED * dt))
        });
        bindings.bind(Keycode::W, |stage, dt| {
            Self::pan(stage, Vec2::new(0.0, PAN_SPEED * dt))
        });
        bindings.bind(Keycode::S, |stage, dt| {
            Self::pan(stage, Vec2::new(0.0, -PAN_SPEED * dt))
        });
        bindings.bind(Keycode::A, |stage, dt| {
            Self::pan(stage, Vec2::new(-PAN_SPEED * dt, 0.0))
        });
        bindings.bind(Keycode::D, |stage, dt| {
            Self::pan(stage, Vec2::new(PAN_SPEED * dt, 0.0))
        });
        bindings.bind(Keycode::E, |stage, dt| Self::zoom(stage, ZOOM_SPEED.powf(dt)));
        bindings.bind(Keycode::Q, |stage, dt| Self::zoom(stage, ZOOM_SPEED.powf(-dt)));

        Ok(())
    }

    fn on_frame_drawn(&mut self, _renderer: &mut SceneRenderer, delta: f32) {
        self.spinner.rotate_2d(Vec3::new(0.0, -120.0, 0.0), 90.0 * delta);

        if let Some(beam) = &self.beam {
            let mut beam = beam.borrow_mut();
            let direction = Vec2::from_angle(0.5 * delta).rotate(beam.direction());
            beam.set_direction(direction);
        }
    }

    fn on_fps_update(&mut self, fps: f32) {
        log::info!("FPS: {:.1}", fps);
    }

    fn on_resize(&mut self, _renderer: &mut SceneRenderer, width: u32, height: u32) {
        self.update_beam_shadow(width, height);
    }

    fn on_destroy(&mut self) {
        log::debug!("Lights demo closed");
    }
}

const MOVE_SPEED: f32 = 10.0;
const TURN_SPEED: f32 = 100.0;

pub struct BlocksDemo {
    asset_dir: PathBuf,
    textures: Vec<Texture>,
    sphere: Option<SharedShape>,
}

fn face(
    ctx: &Rc<RenderContext>,
    corners: [Vec3; 4],
    texture: TextureHandle,
) -> Result<SharedShape, RenderError> {
    let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
    let vertices = corners
        .iter()
        .zip(uvs)
        .map(|(&position, uv)| Vertex::new(position, Vertex::WHITE, uv))
        .collect();
    Ok(Shape::new(ctx, vertices, texture, Topology::TriangleFan)?.into_shared())
}

impl BlocksDemo {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            asset_dir: config.asset_dir.clone(),
            textures: Vec::new(),
            sphere: None,
        }
    }

    fn texture(&mut self, ctx: &Rc<RenderContext>, file: &str) -> TextureHandle {
        let texture =
            Texture::load_or_fallback(ctx, self.asset_dir.join(file), TextureFilter::Nearest);
        let handle = texture.handle();
        self.textures.push(texture);
        handle
    }

    fn fly(stage: &mut Stage<Self>, offset: Vec3) {
        if let Some(camera) = stage.renderer.camera_mut().as_3d_mut() {
            camera.move_by(offset, true);
        }
    }

    fn turn(stage: &mut Stage<Self>, pitch: f32, yaw: f32) {
        if let Some(camera) = stage.renderer.camera_mut().as_3d_mut() {
            let yaw = (camera.yaw() + yaw).rem_euclid(360.0);
            camera.set_orientation(camera.pitch() + pitch, yaw);
        }
    }
}

impl Sandbox for BlocksDemo {
    fn on_create(
        &mut self,
        ctx: &Rc<RenderContext>,
        renderer: &mut SceneRenderer,
        bindings: &mut KeyBindings<Stage<Self>>,
    ) -> Result<(), RenderError> {
        renderer.set_clear_color(Vec4::new(0.45, 0.65, 0.9, 1.0));
        if let Some(camera) = renderer.camera_mut().as_3d_mut() {
            camera.set_position(Vec3::new(0.0, 0.0, 6.0));
        }

        let top = self.texture(ctx, "top.png");
        let side = self.texture(ctx, "side.png");
        let bottom = self.texture(ctx, "bottom.png");

        let c = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
        let mut block = ObjectGroup::new();
        block.add_shape(face(ctx, [c(-1., -1., -1.), c(1., -1., -1.), c(1., 1., -1.), c(-1., 1., -1.)], side)?);
        block.add_shape(face(ctx, [c(-1., -1., 1.), c(1., -1., 1.), c(1., 1., 1.), c(-1., 1., 1.)], side)?);
        block.add_shape(face(ctx, [c(-1., -1., -1.), c(-1., -1., 1.), c(-1., 1., 1.), c(-1., 1., -1.)], side)?);
        block.add_shape(face(ctx, [c(1., -1., -1.), c(1., -1., 1.), c(1., 1., 1.), c(1., 1., -1.)], side)?);
        block.add_shape(face(ctx, [c(-1., 1., -1.), c(1., 1., -1.), c(1., 1., 1.), c(-1., 1., 1.)], top)?);
        block.add_shape(face(ctx, [c(-1., -1., -1.), c(1., -1., -1.), c(1., -1., 1.), c(-1., -1., 1.)], bottom)?);
        block.add_to_scene(renderer);

        let mut pyramid = Shape::pyramid(ctx, 2.0, 2.0, 3.0)?;
        pyramid.rotate(Vec3::ZERO, -90.0, 0.0);
        pyramid.translate(Vec3::new(-6.0, -1.0, 0.0));
        renderer.add_shape(pyramid.into_shared());

        let mut crate_box = Shape::cuboid(ctx, Vec3::new(1.5, 1.5, 1.5))?.with_texture(side);
        crate_box.translate(Vec3::new(5.0, -0.25, -3.0));
        renderer.add_shape(crate_box.into_shared());

        let mut sphere = Shape::sphere(ctx, 10.0, 24, 32)?;
        sphere.translate(Vec3::new(20.0, 0.0, 0.0));
        let sphere = sphere.into_shared();
        renderer.add_shape(sphere.clone());
        self.sphere = Some(sphere);

        renderer.add_light(LightSource::ambient().into_shared());

        bindings.bind(Keycode::Escape, |stage, _| stage.running = false);
        bindings.bind(Keycode::W, |stage, dt| Self::fly(stage, Vec3::Z * MOVE_SPEED * dt));
        bindings.bind(Keycode::S, |stage, dt| Self::fly(stage, -Vec3::Z * MOVE_SPEED * dt));
        bindings.bind(Keycode::A, |stage, dt| Self::fly(stage, -Vec3::X * MOVE_SPEED * dt));
        bindings.bind(Keycode::D, |stage, dt| Self::fly(stage, Vec3::X * MOVE_SPEED * dt));
        bindings.bind(Keycode::Space, |stage, dt| {
            Self::fly(stage, Vec3::Y * MOVE_SPEED * dt)
        });
        bindings.bind(Keycode::LShift, |stage, dt| {
            Self::fly(stage, -Vec3::Y * MOVE_SPEED * dt)
        });
        bindings.bind(Keycode::Left, |stage, dt| Self::turn(stage, 0.0, -TURN_SPEED * dt));
        bindings.bind(Keycode::Right, |stage, dt| Self::turn(stage, 0.0, TURN_SPEED * dt));
        bindings.bind(Keycode::Up, |stage, dt| Self::turn(stage, TURN_SPEED * dt, 0.0));
        bindings.bind(Keycode::Down, |stage, dt| Self::turn(stage, -TURN_SPEED * dt, 0.0));

        Ok(())
    }

    fn on_frame_drawn(&mut self, _renderer: &mut SceneRenderer, delta: f32) {
        if let Some(sphere) = &self.sphere {
            sphere.borrow_mut().rotate(Vec3::ZERO, 0.0, 10.0 * delta);
        }
    }

    fn on_fps_update(&mut self, fps: f32) {
        log::info!("FPS: {:.1}", fps);
    }
}
