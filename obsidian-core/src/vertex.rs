//! Vertex data and primitive topologies.

use glam::{Vec2, Vec3, Vec4};

/// A single vertex as stored on the CPU side.
///
/// 2D geometry keeps `position.z` at zero. The GPU layout is position at location 0, color at
/// location 1 and uv at location 2, see [`Vertex::FLOATS`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Vec4,
    pub uv: Vec2,
}

impl Vertex {
    /// Number of floats a vertex occupies once packed for upload.
    pub const FLOATS: usize = 9;

    pub const WHITE: Vec4 = Vec4::ONE;

    pub fn new(position: Vec3, color: Vec4, uv: Vec2) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }

    /// A white vertex in the z = 0 plane.
    pub fn flat(position: Vec2, uv: Vec2) -> Self {
        Self::new(position.extend(0.0), Self::WHITE, uv)
    }

    /// Appends the packed `[x, y, z, r, g, b, a, u, v]` representation to `out`.
    pub fn pack_into(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.position.to_array());
        out.extend_from_slice(&self.color.to_array());
        out.extend_from_slice(&self.uv.to_array());
    }

    /// Packs a slice of vertices into a tightly packed float buffer.
    pub fn pack(vertices: &[Vertex]) -> Vec<f32> {
        let mut out = Vec::with_capacity(vertices.len() * Self::FLOATS);
        for vertex in vertices {
            vertex.pack_into(&mut out);
        }
        out
    }
}

/// How a vertex sequence is assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    TriangleFan,
    TriangleStrip,
    Lines,
    Points,
}

impl Topology {
    /// Smallest vertex count that produces at least one primitive.
    pub fn min_vertices(self) -> usize {
        match self {
            Topology::Triangles | Topology::TriangleFan | Topology::TriangleStrip => 3,
            Topology::Lines => 2,
            Topology::Points => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let v = Vertex::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec4::new(0.1, 0.2, 0.3, 0.4),
            Vec2::new(0.5, 0.6),
        );
        assert_eq!(
            Vertex::pack(&[v]),
            vec![1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6]
        );
    }

    #[test]
    fn test_min_vertices() {
        assert_eq!(Topology::TriangleFan.min_vertices(), 3);
        assert_eq!(Topology::Lines.min_vertices(), 2);
        assert_eq!(Topology::Points.min_vertices(), 1);
    }
}
