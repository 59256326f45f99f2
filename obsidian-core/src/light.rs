//! Light sources.

use std::{cell::RefCell, rc::Rc};

use glam::{Mat4, Vec2, Vec3};

use crate::{context::RenderContext, device::DepthTarget, error::RenderError, texture::TextureHandle};

/// A light shared between the scene renderer and application code.
pub type SharedLight = Rc<RefCell<LightSource>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightType {
    /// Uniform light everywhere. Contributes to shading but draws no glow.
    Ambient,
    /// A cone pointing along the light's direction.
    Directional,
    /// Radial falloff around the light's position.
    Point,
}

impl LightType {
    /// The value written to `uLights[i].type`.
    pub fn shader_index(self) -> i32 {
        match self {
            LightType::Ambient => 0,
            LightType::Directional => 1,
            LightType::Point => 2,
        }
    }

    /// Whether lights of this type get a fullscreen glow pass.
    pub fn draws_glow(self) -> bool {
        !matches!(self, LightType::Ambient)
    }
}

/// GPU resources of a shadow-capable light. Released when dropped.
struct ShadowResources {
    ctx: Rc<RenderContext>,
    target: DepthTarget,
    light_space: Mat4,
}

impl Drop for ShadowResources {
    fn drop(&mut self) {
        log::debug!("Releasing shadow map {:?}", self.target.depth_texture.id());
        self.ctx.device().delete_depth_target(self.target);
    }
}

pub struct LightSource {
    pub light_type: LightType,
    pub position: Vec2,
    direction: Vec2,
    pub color: Vec3,
    pub intensity: f32,
    /// Cosine of the cone half-angle for directional lights.
    pub cutoff: f32,
    pub radius: f32,
    /// Order key. Lower keys are drawn first.
    pub depth: f32,
    shadow: Option<ShadowResources>,
}

impl LightSource {
    /// Pointing straight down the screen.
    pub const DEFAULT_DIRECTION: Vec2 = Vec2::new(0.0, -1.0);

    /// Creates a light. A zero `direction` falls back to [`LightSource::DEFAULT_DIRECTION`].
    pub fn new(light_type: LightType, position: Vec2, direction: Vec2) -> Self {
        Self {
            light_type,
            position,
            direction: direction.try_normalize().unwrap_or(Self::DEFAULT_DIRECTION),
            color: Vec3::ONE,
            intensity: 1.0,
            cutoff: 12.5f32.to_radians().cos(),
            radius: 100.0,
            depth: 0.0,
            shadow: None,
        }
    }

    pub fn ambient() -> Self {
        Self::new(LightType::Ambient, Vec2::ZERO, Self::DEFAULT_DIRECTION)
    }

    pub fn directional(position: Vec2, direction: Vec2) -> Self {
        Self::new(LightType::Directional, position, direction)
    }

    pub fn point(position: Vec2, radius: f32) -> Self {
        Self::new(LightType::Point, position, Self::DEFAULT_DIRECTION).with_radius(radius)
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the cone half-angle in degrees.
    pub fn with_cutoff_degrees(mut self, degrees: f32) -> Self {
        self.cutoff = degrees.to_radians().cos();
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn into_shared(self) -> SharedLight {
        Rc::new(RefCell::new(self))
    }

    /// Unit vector the light points along.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Points the light along `direction`, normalised. Zero vectors are ignored and `false`
    /// is returned.
    pub fn set_direction(&mut self, direction: Vec2) -> bool {
        match direction.try_normalize() {
            Some(direction) => {
                self.direction = direction;
                true
            }
            None => {
                log::warn!("Ignoring zero light direction");
                false
            }
        }
    }

    /// Allocates a `width` x `height` depth target for shadow mapping.
    ///
    /// Existing resources are released once the new target exists. If the target cannot be
    /// created the light keeps whatever it had before.
    pub fn init_shadow_resources(
        &mut self,
        ctx: &Rc<RenderContext>,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let target = ctx.device().create_depth_target(width, height)?;
        self.shadow = Some(ShadowResources {
            ctx: Rc::clone(ctx),
            target,
            light_space: Mat4::IDENTITY,
        });
        Ok(())
    }

    /// Recomputes the light-space matrix for a `scene_width` x `scene_height` scene.
    pub fn update_light_space_matrix(
        &mut self,
        scene_width: f32,
        scene_height: f32,
    ) -> Result<Mat4, RenderError> {
        let (position, direction) = (self.position, self.direction);
        let shadow = self
            .shadow
            .as_mut()
            .ok_or(RenderError::ShadowNotInitialized)?;

        let projection = Mat4::orthographic_rh_gl(0.0, scene_width, 0.0, scene_height, -1.0, 1.0);
        let eye = position.extend(1.0);
        let forward = direction.extend(0.0);
        // Straight up or down the screen is parallel to +Y.
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(eye, eye + forward, up);

        shadow.light_space = projection * view;
        Ok(shadow.light_space)
    }

    /// Releases the shadow resources, if any. Safe to call repeatedly.
    pub fn destroy_shadow_resources(&mut self) {
        self.shadow = None;
    }

    pub fn is_shadow_capable(&self) -> bool {
        self.shadow.is_some()
    }

    pub fn light_space_matrix(&self) -> Option<Mat4> {
        self.shadow.as_ref().map(|s| s.light_space)
    }

    /// The depth texture of the shadow map, or the invalid handle.
    pub fn shadow_map(&self) -> TextureHandle {
        self.shadow
            .as_ref()
            .map(|s| s.target.depth_texture)
            .unwrap_or(TextureHandle::INVALID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingDevice};

    fn context() -> (Rc<RecordingDevice>, Rc<RenderContext>) {
        let device = Rc::new(RecordingDevice::default());
        let ctx = RenderContext::new(device.clone());
        (device, ctx)
    }

    #[test]
    fn test_defaults() {
        let light = LightSource::point(Vec2::new(3.0, 4.0), 50.0);
        assert_eq!(light.color, Vec3::ONE);
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.radius, 50.0);
        assert!((light.cutoff - 0.976_296).abs() < 1e-5);
        assert_eq!(light.direction(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_direction_stays_unit_length() {
        let mut light = LightSource::directional(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((light.direction() - Vec2::new(0.6, 0.8)).length() < 1e-6);

        assert!(!light.set_direction(Vec2::ZERO));
        assert!((light.direction().length() - 1.0).abs() < 1e-6);

        assert!(light.set_direction(Vec2::new(-10.0, 0.0)));
        assert_eq!(light.direction(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_light_space_requires_init() {
        let mut light = LightSource::directional(Vec2::ZERO, Vec2::X);
        assert_eq!(
            light.update_light_space_matrix(800.0, 600.0),
            Err(RenderError::ShadowNotInitialized)
        );
        assert_eq!(light.light_space_matrix(), None);
        assert!(!light.shadow_map().is_valid());
    }

    #[test]
    fn test_light_space_matrix_is_finite() {
        let (_device, ctx) = context();
        for direction in [Vec2::X, Vec2::new(0.0, -1.0), Vec2::new(1.0, 1.0)] {
            let mut light = LightSource::directional(Vec2::new(100.0, 50.0), direction);
            light.init_shadow_resources(&ctx, 256, 256).unwrap();

            let matrix = light.update_light_space_matrix(800.0, 600.0).unwrap();
            assert!(matrix.is_finite());
            assert_eq!(light.light_space_matrix(), Some(matrix));
        }
    }

    #[test]
    fn test_destroy_twice_releases_once() {
        let (device, ctx) = context();
        let mut light = LightSource::directional(Vec2::ZERO, Vec2::X);
        light.init_shadow_resources(&ctx, 512, 512).unwrap();
        assert!(light.is_shadow_capable());
        assert_eq!(light.shadow_map().width(), 512);

        light.destroy_shadow_resources();
        light.destroy_shadow_resources();
        drop(light);

        assert_eq!(device.count(|c| matches!(c, Call::DeleteDepthTarget(_))), 1);
    }

    #[test]
    fn test_reinit_releases_previous_target() {
        let (device, ctx) = context();
        let mut light = LightSource::point(Vec2::ZERO, 10.0);
        light.init_shadow_resources(&ctx, 64, 64).unwrap();
        light.init_shadow_resources(&ctx, 128, 128).unwrap();
        drop(light);

        assert_eq!(device.count(|c| matches!(c, Call::CreateDepthTarget(_))), 2);
        assert_eq!(device.count(|c| matches!(c, Call::DeleteDepthTarget(_))), 2);
    }

    #[test]
    fn test_incomplete_framebuffer_leaves_light_unchanged() {
        let (device, ctx) = context();
        device.fail_depth_targets.set(true);

        let mut light = LightSource::point(Vec2::ZERO, 10.0);
        assert!(matches!(
            light.init_shadow_resources(&ctx, 64, 64),
            Err(RenderError::ResourceInit(_))
        ));
        assert!(!light.is_shadow_capable());
    }

    #[test]
    fn test_ambient_draws_no_glow() {
        assert!(!LightType::Ambient.draws_glow());
        assert!(LightType::Directional.draws_glow());
        assert_eq!(LightType::Point.shader_index(), 2);
    }
}
