use glam::Vec3;

use crate::{scene::SceneRenderer, shape::SharedShape};

/// A bundle of shapes moved as one unit.
///
/// The group only holds shared references; the shapes stay usable on their own and are
/// registered with a renderer through [`ObjectGroup::add_to_scene`].
#[derive(Default)]
pub struct ObjectGroup {
    shapes: Vec<SharedShape>,
}

impl ObjectGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(&mut self, shape: SharedShape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[SharedShape] {
        &self.shapes
    }

    pub fn translate(&self, offset: Vec3) {
        for shape in &self.shapes {
            shape.borrow_mut().translate(offset);
        }
    }

    pub fn rotate(&self, origin: Vec3, pitch: f32, yaw: f32) {
        for shape in &self.shapes {
            shape.borrow_mut().rotate(origin, pitch, yaw);
        }
    }

    pub fn rotate_2d(&self, origin: Vec3, degrees: f32) {
        for shape in &self.shapes {
            shape.borrow_mut().rotate_2d(origin, degrees);
        }
    }

    pub fn scale(&self, factors: Vec3, origin: Vec3) {
        for shape in &self.shapes {
            shape.borrow_mut().scale(factors, origin);
        }
    }

    /// Registers every shape of the group with `scene`.
    pub fn add_to_scene(&self, scene: &mut SceneRenderer) {
        for shape in &self.shapes {
            scene.add_shape(shape.clone());
        }
    }
}
