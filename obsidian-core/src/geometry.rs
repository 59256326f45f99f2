//! Canonical geometry.
//!
//! Pure functions producing the vertex lists behind the [`crate::Shape`] factories. Sizes must be
//! finite and positive and segment counts non-zero; anything else is rejected with
//! [`RenderError::GeometryPrecondition`].

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::{error::RenderError, vertex::Vertex};

fn require_positive(what: &str, value: f32) -> Result<(), RenderError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RenderError::GeometryPrecondition(format!(
            "{} must be a positive finite number, got {}",
            what, value
        )))
    }
}

fn require_segments(what: &str, segments: u32) -> Result<(), RenderError> {
    if segments == 0 {
        return Err(RenderError::GeometryPrecondition(format!(
            "{} must be at least 1",
            what
        )));
    }
    Ok(())
}

fn white(position: Vec3, uv: Vec2) -> Vertex {
    Vertex::new(position, Vertex::WHITE, uv)
}

/// A `width` x `height` rectangle centred on the origin, wound counter-clockwise for a triangle
/// fan starting at the bottom-left corner.
pub fn rectangle(width: f32, height: f32) -> Result<Vec<Vertex>, RenderError> {
    require_positive("rectangle width", width)?;
    require_positive("rectangle height", height)?;

    let (hw, hh) = (width * 0.5, height * 0.5);
    Ok(vec![
        Vertex::flat(Vec2::new(-hw, -hh), Vec2::new(0.0, 0.0)),
        Vertex::flat(Vec2::new(hw, -hh), Vec2::new(1.0, 0.0)),
        Vertex::flat(Vec2::new(hw, hh), Vec2::new(1.0, 1.0)),
        Vertex::flat(Vec2::new(-hw, hh), Vec2::new(0.0, 1.0)),
    ])
}

/// A triangle fan: the centre followed by `segments + 1` rim points. The last rim point sits at
/// angle 2π and closes the fan.
pub fn circle(radius: f32, segments: u32) -> Result<Vec<Vertex>, RenderError> {
    require_positive("circle radius", radius)?;
    require_segments("circle segments", segments)?;

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(Vertex::flat(Vec2::ZERO, Vec2::splat(0.5)));

    for i in 0..=segments {
        let angle = TAU * i as f32 / segments as f32;
        let (sin, cos) = angle.sin_cos();
        vertices.push(Vertex::flat(
            Vec2::new(radius * cos, radius * sin),
            Vec2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin),
        ));
    }

    Ok(vertices)
}

/// A UV sphere as a triangle list, two triangles per latitude/longitude cell.
pub fn sphere(
    radius: f32,
    latitude_segments: u32,
    longitude_segments: u32,
) -> Result<Vec<Vertex>, RenderError> {
    require_positive("sphere radius", radius)?;
    require_segments("sphere latitude segments", latitude_segments)?;
    require_segments("sphere longitude segments", longitude_segments)?;

    let (lat_n, lon_n) = (latitude_segments as usize, longitude_segments as usize);

    let mut grid = Vec::with_capacity((lat_n + 1) * (lon_n + 1));
    for lat in 0..=lat_n {
        let theta = lat as f32 * PI / lat_n as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=lon_n {
            let phi = lon as f32 * TAU / lon_n as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let position = Vec3::new(
                radius * sin_theta * cos_phi,
                radius * cos_theta,
                radius * sin_theta * sin_phi,
            );
            let uv = Vec2::new(
                1.0 - lon as f32 / lon_n as f32,
                1.0 - lat as f32 / lat_n as f32,
            );
            grid.push(white(position, uv));
        }
    }

    let mut vertices = Vec::with_capacity(lat_n * lon_n * 6);
    for lat in 0..lat_n {
        for lon in 0..lon_n {
            let first = lat * (lon_n + 1) + lon;
            let second = first + lon_n + 1;

            vertices.extend_from_slice(&[grid[first], grid[second], grid[first + 1]]);
            vertices.extend_from_slice(&[grid[second], grid[second + 1], grid[first + 1]]);
        }
    }

    Ok(vertices)
}

/// An axis-aligned box centred on the origin as a triangle list (6 faces, 36 vertices).
pub fn cuboid(size: Vec3) -> Result<Vec<Vertex>, RenderError> {
    require_positive("cuboid width", size.x)?;
    require_positive("cuboid height", size.y)?;
    require_positive("cuboid depth", size.z)?;

    let h = size * 0.5;
    // Each face lists its corners counter-clockwise as seen from outside.
    let faces: [[Vec3; 4]; 6] = [
        // front
        [
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ],
        // back
        [
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
        ],
        // left
        [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, -h.z),
        ],
        // right
        [
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(h.x, h.y, h.z),
        ],
        // top
        [
            Vec3::new(-h.x, h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
        ],
        // bottom
        [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(-h.x, -h.y, h.z),
        ],
    ];
    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut vertices = Vec::with_capacity(36);
    for corners in &faces {
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(white(corners[i], uvs[i]));
        }
    }

    Ok(vertices)
}

/// A pyramid standing on the z = 0 plane with its apex at `(0, 0, height)`. The base is two
/// triangles, each side one triangle (18 vertices).
pub fn pyramid(base_width: f32, base_length: f32, height: f32) -> Result<Vec<Vertex>, RenderError> {
    require_positive("pyramid base width", base_width)?;
    require_positive("pyramid base length", base_length)?;
    require_positive("pyramid height", height)?;

    let (hw, hl) = (base_width * 0.5, base_length * 0.5);
    let apex = Vec3::new(0.0, 0.0, height);
    let corners = [
        Vec3::new(-hw, -hl, 0.0),
        Vec3::new(hw, -hl, 0.0),
        Vec3::new(hw, hl, 0.0),
        Vec3::new(-hw, hl, 0.0),
    ];

    let mut vertices = vec![
        white(corners[0], Vec2::new(0.0, 0.0)),
        white(corners[1], Vec2::new(1.0, 0.0)),
        white(corners[2], Vec2::new(1.0, 1.0)),
        white(corners[0], Vec2::new(0.0, 0.0)),
        white(corners[2], Vec2::new(1.0, 1.0)),
        white(corners[3], Vec2::new(0.0, 1.0)),
    ];
    for i in 0..4 {
        vertices.push(white(corners[i], Vec2::new(0.0, 0.0)));
        vertices.push(white(corners[(i + 1) % 4], Vec2::new(1.0, 0.0)));
        vertices.push(white(apex, Vec2::new(0.5, 1.0)));
    }

    Ok(vertices)
}

/// Two triangles covering a `width` x `height` area centred on the origin, used for light glow
/// passes.
pub fn fullscreen_quad(width: f32, height: f32) -> Result<Vec<Vertex>, RenderError> {
    require_positive("quad width", width)?;
    require_positive("quad height", height)?;

    let (hw, hh) = (width * 0.5, height * 0.5);
    let bl = Vertex::flat(Vec2::new(-hw, -hh), Vec2::new(0.0, 0.0));
    let br = Vertex::flat(Vec2::new(hw, -hh), Vec2::new(1.0, 0.0));
    let tr = Vertex::flat(Vec2::new(hw, hh), Vec2::new(1.0, 1.0));
    let tl = Vertex::flat(Vec2::new(-hw, hh), Vec2::new(0.0, 1.0));

    Ok(vec![bl, br, tr, bl, tr, tl])
}
