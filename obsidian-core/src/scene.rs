//! The scene renderer.
//!
//! [`SceneRenderer`] owns the camera, the shader registry and the registered shapes and lights.
//! Each frame it merges shapes and lights into one list ordered by their order keys and draws
//! them in that order: lights as additive glow quads, shapes with the default lit shader.

use std::{cmp::Ordering, rc::Rc};

use glam::{Mat4, Vec4};

use crate::{
    camera::{Camera, Camera2D, Camera3D},
    config::{RenderMode, RendererConfig},
    context::RenderContext,
    device::{ProgramId, TextureFilter, Uniform},
    error::RenderError,
    geometry,
    light::{LightSource, SharedLight},
    shader::{DEFAULT_SHADER, FULLSCREEN_QUAD_SHADER, ShaderRegistry, uniforms},
    shape::{Shape, SharedShape},
    texture::TextureHandle,
    vertex::Topology,
};

/// Number of lights the default shader's light array holds.
pub const MAX_LIGHTS: usize = 8;

/// Kind of a merged draw item. Lights sort before shapes when order keys tie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderItemKind {
    Light,
    Shape,
}

/// One entry of the merged per-frame draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    pub kind: RenderItemKind,
    pub order_key: f32,
    /// Index into [`SceneRenderer::lights`] or [`SceneRenderer::shapes`], depending on `kind`.
    pub index: usize,
}

impl RenderItem {
    /// Ascending order key, then lights before shapes.
    pub fn draw_order(&self, other: &Self) -> Ordering {
        self.order_key
            .partial_cmp(&other.order_key)
            .unwrap_or_else(|| self.order_key.total_cmp(&other.order_key))
            .then(self.kind.cmp(&other.kind))
    }
}

/// What a call to [`SceneRenderer::render`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub shapes_drawn: usize,
    pub lights_drawn: usize,
    /// Items that could not be drawn, e.g. because their shader is missing.
    pub skipped: usize,
}

/// Vertex and fragment source of a shader program.
#[derive(Clone, Copy, Debug)]
pub struct ShaderSource<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

pub struct SceneRenderer {
    ctx: Rc<RenderContext>,
    config: RendererConfig,
    camera: Camera,
    projection: Mat4,
    width: u32,
    height: u32,
    clear_color: Vec4,
    shaders: ShaderRegistry,
    shapes: Vec<SharedShape>,
    lights: Vec<SharedLight>,
    white_texture: TextureHandle,
    quad: Option<Shape>,
    light_cap_reported: bool,
}

fn default_projection(config: &RendererConfig, width: u32, height: u32) -> Mat4 {
    let (w, h) = (width as f32, height as f32);
    match config.mode {
        RenderMode::TwoD => {
            Mat4::orthographic_rh_gl(-w * 0.5, w * 0.5, -h * 0.5, h * 0.5, -1.0, 1.0)
        }
        RenderMode::ThreeD => Mat4::perspective_rh_gl(
            config.fov_degrees.to_radians(),
            w / h.max(1.0),
            config.near,
            config.far,
        ),
    }
}

impl SceneRenderer {
    /// Creates a renderer with a camera matching `config.mode`. Nothing touches the GPU until
    /// [`SceneRenderer::initialize`].
    pub fn new(ctx: &Rc<RenderContext>, config: RendererConfig) -> Self {
        let camera = match config.mode {
            RenderMode::TwoD => Camera::TwoD(Camera2D::default()),
            RenderMode::ThreeD => Camera::ThreeD(Camera3D::default()),
        };
        let (width, height) = (config.width.max(1), config.height.max(1));

        Self {
            ctx: Rc::clone(ctx),
            camera,
            projection: default_projection(&config, width, height),
            width,
            height,
            clear_color: Vec4::from_array(config.clear_color),
            shaders: ShaderRegistry::new(ctx),
            shapes: Vec::new(),
            lights: Vec::new(),
            white_texture: TextureHandle::INVALID,
            quad: None,
            light_cap_reported: false,
            config,
        }
    }

    /// Creates the GPU-side resources: the white fallback texture, the `default` and
    /// `fullscreenQuad` programs and the glow quad. Also sets the viewport, blending and
    /// depth testing for the render mode.
    pub fn initialize(
        &mut self,
        default_shader: ShaderSource,
        quad_shader: ShaderSource,
    ) -> Result<(), RenderError> {
        let device = self.ctx.device();
        device.set_viewport(self.width, self.height);
        device.set_blending(true);
        device.set_depth_test(self.config.mode == RenderMode::ThreeD);

        if !self.white_texture.is_valid() {
            self.white_texture =
                device.create_texture(1, 1, &[255, 255, 255, 255], TextureFilter::Nearest)?;
        }

        self.shaders
            .load_shader(default_shader.vertex, default_shader.fragment, DEFAULT_SHADER)?;
        self.shaders
            .load_shader(quad_shader.vertex, quad_shader.fragment, FULLSCREEN_QUAD_SHADER)?;

        self.rebuild_quad()?;
        log::info!(
            "Scene renderer initialized ({:?}, {}x{})",
            self.config.mode,
            self.width,
            self.height
        );
        Ok(())
    }

    fn rebuild_quad(&mut self) -> Result<(), RenderError> {
        let vertices = geometry::fullscreen_quad(self.width as f32, self.height as f32)?;
        self.quad = Some(Shape::new(
            &self.ctx,
            vertices,
            TextureHandle::INVALID,
            Topology::Triangles,
        )?);
        Ok(())
    }

    pub fn mode(&self) -> RenderMode {
        self.config.mode
    }

    /// Registers a shape. The same shape may be added more than once and is then drawn once
    /// per registration.
    pub fn add_shape(&mut self, shape: SharedShape) {
        self.shapes.push(shape);
    }

    /// Registers a light unless this exact light is already registered.
    pub fn add_light(&mut self, light: SharedLight) -> bool {
        if self.lights.iter().any(|l| Rc::ptr_eq(l, &light)) {
            return false;
        }
        self.lights.push(light);
        true
    }

    pub fn shapes(&self) -> &[SharedShape] {
        &self.shapes
    }

    pub fn lights(&self) -> &[SharedLight] {
        &self.lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Replaces the projection until the next [`SceneRenderer::set_window_size`].
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Adapts to a new framebuffer size: projection, viewport and glow quad.
    ///
    /// Zero sizes (a minimised window) are rejected and leave everything as it was.
    pub fn set_window_size(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::GeometryPrecondition(format!(
                "window size must be non-zero, got {}x{}",
                width, height
            )));
        }

        self.width = width;
        self.height = height;
        self.projection = default_projection(&self.config, width, height);
        self.ctx.device().set_viewport(width, height);
        if self.quad.is_some() {
            self.rebuild_quad()?;
        }
        Ok(())
    }

    /// Clears the frame to the given color right away.
    pub fn clear(&self, r: f32, g: f32, b: f32, a: f32) {
        self.ctx.device().clear(
            Vec4::new(r, g, b, a),
            self.config.mode == RenderMode::ThreeD,
        );
    }

    /// Sets the color [`SceneRenderer::render`] clears to.
    pub fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    pub fn shaders(&self) -> &ShaderRegistry {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderRegistry {
        &mut self.shaders
    }

    pub fn load_shader(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        name: &str,
    ) -> Result<(), RenderError> {
        self.shaders.load_shader(vertex_src, fragment_src, name)
    }

    pub fn use_shader(&self, name: &str) -> Result<ProgramId, RenderError> {
        self.shaders.use_shader(name)
    }

    pub fn set_uniform<T: Uniform>(&self, shader: &str, uniform: &str, value: T) -> bool {
        self.shaders.set_uniform(shader, uniform, value)
    }

    /// Binds `texture` to unit 0, or the white default if it is invalid.
    pub fn bind_texture(&self, texture: TextureHandle) {
        self.ctx.bind_texture(texture.or(self.white_texture));
    }

    /// The 1x1 white texture used for untextured shapes. Invalid before initialization.
    pub fn default_texture(&self) -> TextureHandle {
        self.white_texture
    }

    /// The merged draw list of the next frame: every light and every visible shape, sorted by
    /// [`RenderItem::draw_order`]. The sort is stable.
    pub fn draw_order(&self) -> Vec<RenderItem> {
        let lights = self.lights.iter().enumerate().filter_map(|(index, light)| {
            let light = light.try_borrow().ok()?;
            Some(RenderItem {
                kind: RenderItemKind::Light,
                order_key: light.depth,
                index,
            })
        });
        let shapes = self.shapes.iter().enumerate().filter_map(|(index, shape)| {
            let shape = shape.try_borrow().ok()?;
            shape.visible.then_some(RenderItem {
                kind: RenderItemKind::Shape,
                order_key: shape.depth,
                index,
            })
        });

        let mut items: Vec<RenderItem> = lights.chain(shapes).collect();
        items.sort_by(RenderItem::draw_order);
        items
    }

    /// Draws one frame.
    ///
    /// Missing shaders and shapes or lights that are mutably borrowed elsewhere are skipped; the
    /// rest of the frame is still drawn.
    pub fn render(&mut self) -> FrameStats {
        let view = self.camera.view_matrix();
        let projection = self.projection;
        self.ctx
            .device()
            .clear(self.clear_color, self.config.mode == RenderMode::ThreeD);

        let items = self.draw_order();
        self.upload_lights();

        let mut stats = FrameStats::default();
        for item in items {
            let drawn = match item.kind {
                RenderItemKind::Light => {
                    let Ok(light) = self.lights[item.index].try_borrow() else {
                        stats.skipped += 1;
                        continue;
                    };
                    if !light.light_type.draws_glow() {
                        continue;
                    }
                    let drawn = self.draw_light(&light, view, projection);
                    stats.lights_drawn += drawn as usize;
                    drawn
                }
                RenderItemKind::Shape => {
                    let Ok(shape) = self.shapes[item.index].try_borrow() else {
                        stats.skipped += 1;
                        continue;
                    };
                    let drawn = self.shaders.use_shader(DEFAULT_SHADER).is_ok();
                    if drawn {
                        shape.draw(
                            &self.shaders,
                            DEFAULT_SHADER,
                            view,
                            projection,
                            self.white_texture,
                        );
                        stats.shapes_drawn += 1;
                    }
                    drawn
                }
            };
            if !drawn {
                stats.skipped += 1;
            }
        }

        log::trace!("Frame drawn: {:?}", stats);
        stats
    }

    /// Writes `uNumLights` and the `uLights` array of the default shader.
    fn upload_lights(&mut self) {
        if self.lights.len() > MAX_LIGHTS && !self.light_cap_reported {
            log::warn!(
                "{} lights registered, only the first {} reach the shader",
                self.lights.len(),
                MAX_LIGHTS
            );
            self.light_cap_reported = true;
        }

        if self.shaders.use_shader(DEFAULT_SHADER).is_err() {
            return;
        }

        // Lights borrowed elsewhere are left out and the rest move up, so the slots below
        // `uNumLights` are always written this frame.
        let lights = self
            .lights
            .iter()
            .filter_map(|light| light.try_borrow().ok())
            .take(MAX_LIGHTS);
        let mut count = 0;
        for (i, light) in lights.enumerate() {
            count += 1;
            let field = |name: &str| format!("{}[{}].{}", uniforms::LIGHTS, i, name);
            let shaders = &self.shaders;

            shaders.set_uniform(DEFAULT_SHADER, &field("type"), light.light_type.shader_index());
            shaders.set_uniform(DEFAULT_SHADER, &field("position"), light.position.extend(0.0));
            shaders.set_uniform(
                DEFAULT_SHADER,
                &field("direction"),
                light.direction().extend(0.0),
            );
            shaders.set_uniform(DEFAULT_SHADER, &field("color"), light.color);
            shaders.set_uniform(DEFAULT_SHADER, &field("intensity"), light.intensity);
            shaders.set_uniform(DEFAULT_SHADER, &field("cutoff"), light.cutoff);
        }
        self.shaders
            .set_uniform(DEFAULT_SHADER, uniforms::NUM_LIGHTS, count as i32);
    }

    /// Draws the glow quad of a directional or point light.
    fn draw_light(&self, light: &LightSource, view: Mat4, projection: Mat4) -> bool {
        let Some(quad) = &self.quad else {
            return false;
        };
        if self.shaders.use_shader(FULLSCREEN_QUAD_SHADER).is_err() {
            return false;
        }

        let model = Mat4::IDENTITY;
        let shader = FULLSCREEN_QUAD_SHADER;
        self.shaders.set_uniform(shader, uniforms::MODEL, model);
        self.shaders
            .set_uniform(shader, uniforms::MVP, projection * view * model);
        self.shaders
            .set_uniform(shader, uniforms::LIGHT_POS, light.position);
        self.shaders
            .set_uniform(shader, uniforms::LIGHT_DIR, light.direction());
        self.shaders.set_uniform(shader, uniforms::CUTOFF, light.cutoff);
        self.shaders
            .set_uniform(shader, uniforms::LIGHT_COLOR, light.color);
        self.shaders
            .set_uniform(shader, uniforms::INTENSITY, light.intensity);
        self.shaders.set_uniform(shader, uniforms::RADIUS, light.radius);

        quad.draw_arrays();
        true
    }
}

impl Drop for SceneRenderer {
    fn drop(&mut self) {
        if self.white_texture.is_valid() {
            self.ctx.delete_texture(self.white_texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::{
        device::UniformValue,
        testing::{BROKEN_SOURCE, Call, RecordingDevice},
    };

    const SOURCE: ShaderSource = ShaderSource {
        vertex: "void main() { gl_Position = vec4(0.0); }",
        fragment: "void main() {}",
    };

    fn setup(mode: RenderMode) -> (Rc<RecordingDevice>, Rc<RenderContext>, SceneRenderer) {
        let device = Rc::new(RecordingDevice::default());
        let ctx = RenderContext::new(device.clone());
        let config = RendererConfig {
            mode,
            ..RendererConfig::default()
        };
        let mut scene = SceneRenderer::new(&ctx, config);
        scene.initialize(SOURCE, SOURCE).unwrap();
        device.clear_calls();
        (device, ctx, scene)
    }

    fn rect(ctx: &Rc<RenderContext>, depth: f32) -> SharedShape {
        Shape::rectangle(ctx, 10.0, 10.0)
            .unwrap()
            .with_depth(depth)
            .into_shared()
    }

    #[test]
    fn test_light_sorts_before_shape_on_tie() {
        let (device, ctx, mut scene) = setup(RenderMode::TwoD);
        let shape = rect(&ctx, 1.0);
        scene.add_shape(shape.clone());
        scene.add_light(LightSource::point(Vec2::ZERO, 50.0).with_depth(1.0).into_shared());

        let kinds: Vec<_> = scene.draw_order().iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![RenderItemKind::Light, RenderItemKind::Shape]);

        let stats = scene.render();
        assert_eq!(stats.lights_drawn, 1);
        assert_eq!(stats.shapes_drawn, 1);

        let draws = device.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].2, 6);
        assert_eq!(draws[1], (shape.borrow().buffer(), Topology::TriangleFan, 4));
    }

    #[test]
    fn test_order_is_ascending_and_stable() {
        let (_device, ctx, mut scene) = setup(RenderMode::TwoD);
        for depth in [3.0, 1.0, 2.0, 1.0] {
            scene.add_shape(rect(&ctx, depth));
        }
        scene.add_light(LightSource::ambient().with_depth(2.5).into_shared());

        let order: Vec<_> = scene
            .draw_order()
            .iter()
            .map(|i| (i.kind, i.index))
            .collect();
        assert_eq!(
            order,
            vec![
                (RenderItemKind::Shape, 1),
                (RenderItemKind::Shape, 3),
                (RenderItemKind::Shape, 2),
                (RenderItemKind::Light, 0),
                (RenderItemKind::Shape, 0),
            ]
        );
    }

    #[test]
    fn test_nan_keys_do_not_break_sorting() {
        let (_device, ctx, mut scene) = setup(RenderMode::TwoD);
        scene.add_shape(rect(&ctx, f32::NAN));
        scene.add_shape(rect(&ctx, 0.0));

        let order: Vec<_> = scene.draw_order().iter().map(|i| i.index).collect();
        assert_eq!(order, vec![1, 0]);
        assert_eq!(scene.render().shapes_drawn, 2);
    }

    #[test]
    fn test_invisible_shapes_are_not_drawn() {
        let (device, ctx, mut scene) = setup(RenderMode::TwoD);
        let hidden = rect(&ctx, 0.0);
        hidden.borrow_mut().set_visible(false);
        scene.add_shape(hidden);
        scene.add_shape(rect(&ctx, 0.0));

        assert_eq!(scene.render().shapes_drawn, 1);
        assert_eq!(device.draws().len(), 1);
    }

    #[test]
    fn test_duplicate_shape_draws_twice() {
        let (device, ctx, mut scene) = setup(RenderMode::TwoD);
        let shape = rect(&ctx, 0.0);
        scene.add_shape(shape.clone());
        scene.add_shape(shape);

        scene.render();
        assert_eq!(device.draws().len(), 2);
    }

    #[test]
    fn test_add_light_deduplicates_by_identity() {
        let (_device, _ctx, mut scene) = setup(RenderMode::TwoD);
        let light = LightSource::ambient().into_shared();

        assert!(scene.add_light(light.clone()));
        assert!(!scene.add_light(light));
        assert!(scene.add_light(LightSource::ambient().into_shared()));
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn test_light_array_is_capped() {
        let (device, _ctx, mut scene) = setup(RenderMode::TwoD);
        for i in 0..10 {
            scene.add_light(LightSource::point(Vec2::splat(i as f32), 10.0).into_shared());
        }

        let stats = scene.render();
        assert_eq!(stats.lights_drawn, 10);
        assert_eq!(
            device.last_uniform(uniforms::NUM_LIGHTS),
            Some(UniformValue::Int(MAX_LIGHTS as i32))
        );

        let names = device.uniform_names();
        assert!(names.contains(&"uLights[7].cutoff".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("uLights[8]")));
    }

    #[test]
    fn test_light_uniforms() {
        let (device, _ctx, mut scene) = setup(RenderMode::TwoD);
        scene.add_light(
            LightSource::directional(Vec2::new(5.0, 6.0), Vec2::X)
                .with_color(Vec3::new(1.0, 0.5, 0.0))
                .into_shared(),
        );
        scene.render();

        assert_eq!(
            device.last_uniform("uLights[0].type"),
            Some(UniformValue::Int(1))
        );
        assert_eq!(
            device.last_uniform("uLights[0].position"),
            Some(UniformValue::Vec3(Vec3::new(5.0, 6.0, 0.0)))
        );
        assert_eq!(
            device.last_uniform(uniforms::LIGHT_POS),
            Some(UniformValue::Vec2(Vec2::new(5.0, 6.0)))
        );
        assert_eq!(
            device.last_uniform(uniforms::RADIUS),
            Some(UniformValue::Float(100.0))
        );
    }

    #[test]
    fn test_borrowed_light_leaves_no_gap() {
        let (device, _ctx, mut scene) = setup(RenderMode::TwoD);
        let busy = LightSource::ambient().into_shared();
        scene.add_light(busy.clone());
        scene.add_light(
            LightSource::directional(Vec2::new(5.0, 6.0), Vec2::X).into_shared(),
        );

        let _guard = busy.borrow_mut();
        scene.render();

        assert_eq!(
            device.last_uniform(uniforms::NUM_LIGHTS),
            Some(UniformValue::Int(1))
        );
        assert_eq!(
            device.last_uniform("uLights[0].type"),
            Some(UniformValue::Int(1))
        );
        assert!(
            !device
                .uniform_names()
                .iter()
                .any(|n| n.starts_with("uLights[1]"))
        );
    }

    #[test]
    fn test_ambient_lights_draw_no_glow() {
        let (device, _ctx, mut scene) = setup(RenderMode::TwoD);
        scene.add_light(LightSource::ambient().into_shared());

        let stats = scene.render();
        assert_eq!(stats, FrameStats::default());
        assert!(device.draws().is_empty());
        assert_eq!(
            device.last_uniform(uniforms::NUM_LIGHTS),
            Some(UniformValue::Int(1))
        );
    }

    #[test]
    fn test_missing_shader_skips_draws() {
        let device = Rc::new(RecordingDevice::default());
        let ctx = RenderContext::new(device.clone());
        let mut scene = SceneRenderer::new(&ctx, RendererConfig::default());
        scene.add_shape(rect(&ctx, 0.0));
        scene.add_light(LightSource::point(Vec2::ZERO, 10.0).into_shared());

        let stats = scene.render();
        assert_eq!(stats.skipped, 2);
        assert!(device.draws().is_empty());
        assert_eq!(scene.render().skipped, 2);
    }

    #[test]
    fn test_initialize_reports_shader_errors() {
        let device = Rc::new(RecordingDevice::default());
        let ctx = RenderContext::new(device);
        let mut scene = SceneRenderer::new(&ctx, RendererConfig::default());

        let broken = ShaderSource {
            vertex: BROKEN_SOURCE,
            fragment: SOURCE.fragment,
        };
        assert!(matches!(
            scene.initialize(broken, SOURCE),
            Err(RenderError::ShaderCompile { .. })
        ));
        assert!(!scene.shaders().contains(DEFAULT_SHADER));
    }

    #[test]
    fn test_shape_uniforms_and_fallback_texture() {
        let (device, ctx, mut scene) = setup(RenderMode::TwoD);
        let shape = rect(&ctx, 0.0);
        let model = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        shape.borrow_mut().set_model_matrix(model);
        scene.add_shape(shape);
        scene.camera_mut().as_2d_mut().unwrap().set_position(Vec2::new(1.0, 2.0));

        scene.render();

        let view = scene.camera().view_matrix();
        assert_eq!(
            device.last_uniform(uniforms::MODEL),
            Some(UniformValue::Mat4(model))
        );
        assert_eq!(
            device.last_uniform(uniforms::MVP),
            Some(UniformValue::Mat4(scene.projection() * view * model))
        );
        assert!(
            device
                .calls()
                .contains(&Call::BindTexture(scene.default_texture()))
        );
    }

    #[test]
    fn test_clear_and_depth_follow_mode() {
        let (device, _ctx, mut scene) = setup(RenderMode::TwoD);
        scene.render();
        assert!(device.calls().contains(&Call::Clear {
            color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            depth: false,
        }));

        let (device, _ctx, mut scene) = setup(RenderMode::ThreeD);
        scene.set_clear_color(Vec4::new(0.1, 0.2, 0.3, 1.0));
        scene.render();
        assert!(device.calls().contains(&Call::Clear {
            color: Vec4::new(0.1, 0.2, 0.3, 1.0),
            depth: true,
        }));
    }

    #[test]
    fn test_clear_right_away() {
        let (device, _ctx, scene) = setup(RenderMode::TwoD);
        scene.clear(0.5, 0.25, 0.0, 1.0);
        assert_eq!(
            device.calls(),
            vec![Call::Clear {
                color: Vec4::new(0.5, 0.25, 0.0, 1.0),
                depth: false,
            }]
        );

        let (device, _ctx, scene) = setup(RenderMode::ThreeD);
        scene.clear(0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            device.calls(),
            vec![Call::Clear {
                color: Vec4::ZERO,
                depth: true,
            }]
        );
    }

    #[test]
    fn test_initialize_without_depth_test_in_2d() {
        let device = Rc::new(RecordingDevice::default());
        let ctx = RenderContext::new(device.clone());
        let mut scene = SceneRenderer::new(&ctx, RendererConfig::default());
        scene.initialize(SOURCE, SOURCE).unwrap();

        let calls = device.calls();
        assert!(calls.contains(&Call::DepthTest(false)));
        assert!(!calls.contains(&Call::DepthTest(true)));
        assert!(calls.contains(&Call::Blending(true)));
        assert!(matches!(scene.camera(), Camera::TwoD(_)));
    }

    #[test]
    fn test_initialize_sets_pipeline_state() {
        let device = Rc::new(RecordingDevice::default());
        let ctx = RenderContext::new(device.clone());
        let config = RendererConfig {
            mode: RenderMode::ThreeD,
            ..RendererConfig::default()
        };
        let mut scene = SceneRenderer::new(&ctx, config);
        scene.initialize(SOURCE, SOURCE).unwrap();

        let calls = device.calls();
        assert!(calls.contains(&Call::DepthTest(true)));
        assert!(calls.contains(&Call::Blending(true)));
        assert!(calls.contains(&Call::Viewport(800, 600)));
        assert!(scene.default_texture().is_valid());
        assert!(matches!(scene.camera(), Camera::ThreeD(_)));
    }

    #[test]
    fn test_window_resize() {
        let (device, _ctx, mut scene) = setup(RenderMode::TwoD);
        scene.set_projection(Mat4::IDENTITY);

        scene.set_window_size(1024, 768).unwrap();
        assert_eq!(
            scene.projection(),
            Mat4::orthographic_rh_gl(-512.0, 512.0, -384.0, 384.0, -1.0, 1.0)
        );
        assert!(device.calls().contains(&Call::Viewport(1024, 768)));
        assert_eq!(device.count(|c| matches!(c, Call::DeleteVertexBuffer(_))), 1);

        assert!(scene.set_window_size(0, 768).is_err());
        assert_eq!(scene.window_size(), (1024, 768));
    }

    #[test]
    fn test_borrowed_shape_is_skipped() {
        let (_device, ctx, mut scene) = setup(RenderMode::TwoD);
        let shape = rect(&ctx, 0.0);
        scene.add_shape(shape.clone());
        scene.add_shape(rect(&ctx, 1.0));

        let _guard = shape.borrow_mut();
        assert_eq!(scene.render().shapes_drawn, 1);
    }

    #[test]
    fn test_drop_releases_default_texture() {
        let (device, _ctx, scene) = setup(RenderMode::TwoD);
        let texture = scene.default_texture();
        drop(scene);
        assert_eq!(device.count(|c| *c == Call::DeleteTexture(texture)), 1);
    }
}
