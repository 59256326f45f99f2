//! Cameras.
//!
//! The view matrix is a pure function of the camera's current fields, so there is no cached
//! matrix to invalidate after a mutation.

use glam::{Mat4, Vec2, Vec3};

/// Maximum pitch in degrees, keeps the view from flipping over the poles.
const PITCH_LIMIT: f32 = 89.0;

/// A 2D camera: a position on the plane and a zoom factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

impl Camera2D {
    pub fn new(position: Vec2, zoom: f32) -> Self {
        Self { position, zoom }
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    /// `scale(zoom) * translate(-position)`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation((-self.position).extend(0.0))
    }
}

/// A free-flying 3D camera with pitch and yaw in degrees.
///
/// With yaw = 0 the camera looks along +X; the default yaw of -90 looks down -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pitch: f32,
    yaw: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0, -90.0)
    }
}

impl Camera3D {
    pub fn new(position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            yaw,
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Sets the orientation. Pitch is clamped to ±89 degrees.
    pub fn set_orientation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = yaw;
    }

    /// Unit vector the camera looks along.
    pub fn front(&self) -> Vec3 {
        let (pitch, yaw) = (self.pitch.to_radians(), self.yaw.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Unit vector pointing to the camera's right, parallel to the ground.
    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    /// Moves the camera.
    ///
    /// In world mode `offset` is added as is. In relative mode `offset.x` moves along
    /// [`Camera3D::right`], `offset.y` along world up and `offset.z` forward along the ground.
    pub fn move_by(&mut self, offset: Vec3, relative: bool) {
        if !relative {
            self.position += offset;
            return;
        }

        let forward = self.front().with_y(0.0).normalize_or_zero();
        self.position += self.right() * offset.x + Vec3::Y * offset.y + forward * offset.z;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }
}

/// The camera owned by a scene renderer, matching its render mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Camera {
    TwoD(Camera2D),
    ThreeD(Camera3D),
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        match self {
            Camera::TwoD(camera) => camera.view_matrix(),
            Camera::ThreeD(camera) => camera.view_matrix(),
        }
    }

    pub fn as_2d_mut(&mut self) -> Option<&mut Camera2D> {
        match self {
            Camera::TwoD(camera) => Some(camera),
            Camera::ThreeD(_) => None,
        }
    }

    pub fn as_3d_mut(&mut self) -> Option<&mut Camera3D> {
        match self {
            Camera::ThreeD(camera) => Some(camera),
            Camera::TwoD(_) => None,
        }
    }
}
