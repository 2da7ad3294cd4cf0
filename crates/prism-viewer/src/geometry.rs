//! Procedural meshes for the reference scene.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use prism_engine::shader::Vertex;

fn vertex(position: Vec3, normal: Vec3, uv: Vec2) -> Vertex {
    Vertex::new(position.to_array(), normal.to_array(), uv.to_array())
}

/// Unit cube centered on the origin; 6 faces, 36 vertices, flat normals.
pub fn box_vertices() -> Vec<Vertex> {
    // (normal, u, v) with u × v = normal, so the winding is CCW from outside.
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::NEG_Y, Vec3::Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

    let mut out = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        for (s, t) in corners {
            let position = 0.5 * normal + (s - 0.5) * u + (t - 0.5) * v;
            out.push(vertex(position, normal, Vec2::new(s, t)));
        }
    }
    out
}

/// Cone with its base (radius 0.5) at z = -0.5 and apex at z = +0.5.
///
/// `segments` side triangles plus as many base triangles.
pub fn cone_vertices(segments: u32) -> Vec<Vertex> {
    const RADIUS: f32 = 0.5;
    const HEIGHT: f32 = 1.0;

    let segments = segments.max(3);
    let apex = Vec3::new(0.0, 0.0, HEIGHT / 2.0);
    let center = Vec3::new(0.0, 0.0, -HEIGHT / 2.0);

    let rim = |i: u32| {
        let angle = TAU * i as f32 / segments as f32;
        let (sin, cos) = angle.sin_cos();
        (angle, Vec3::new(RADIUS * cos, RADIUS * sin, center.z))
    };
    // Slanted surface normal at azimuth `angle`.
    let side_normal = |angle: f32| Vec3::new(angle.cos() * HEIGHT, angle.sin() * HEIGHT, RADIUS).normalize();
    let base_uv = |p: Vec3| Vec2::new(0.5 + p.x, 0.5 + p.y);

    let mut out = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let (a0, p0) = rim(i);
        let (a1, p1) = rim(i + 1);
        let (u0, u1) = (i as f32 / segments as f32, (i + 1) as f32 / segments as f32);

        out.push(vertex(p0, side_normal(a0), Vec2::new(u0, 0.0)));
        out.push(vertex(p1, side_normal(a1), Vec2::new(u1, 0.0)));
        out.push(vertex(apex, side_normal(0.5 * (a0 + a1)), Vec2::new(0.5 * (u0 + u1), 1.0)));

        out.push(vertex(center, Vec3::NEG_Z, Vec2::splat(0.5)));
        out.push(vertex(p1, Vec3::NEG_Z, base_uv(p1)));
        out.push(vertex(p0, Vec3::NEG_Z, base_uv(p0)));
    }
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn position(v: &Vertex) -> Vec3 {
        Vec3::from_array(v.position)
    }

    fn normal(v: &Vertex) -> Vec3 {
        Vec3::from_array(v.normal)
    }

    /// Every triangle winds counter-clockwise seen from the side its
    /// normals point to.
    fn assert_outward_winding(vertices: &[Vertex]) {
        assert_eq!(vertices.len() % 3, 0);
        for tri in vertices.chunks_exact(3) {
            let (a, b, c) = (position(&tri[0]), position(&tri[1]), position(&tri[2]));
            let face = (b - a).cross(c - a);
            for v in tri {
                assert!(face.dot(normal(v)) > 0.0, "triangle {a} {b} {c} winds inward");
            }
        }
    }

    #[test]
    fn box_has_six_flat_faces() {
        let vertices = box_vertices();
        assert_eq!(vertices.len(), 36);
        assert_outward_winding(&vertices);

        for v in &vertices {
            assert!(position(v).abs().max_element() <= 0.5 + 1e-6);
            assert_abs_diff_eq!(normal(v).length(), 1.0, epsilon = 1e-6);
            // Flat shading: every vertex sits on the face plane its normal names.
            assert_abs_diff_eq!(position(v).dot(normal(v)), 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn cone_sides_and_base() {
        let vertices = cone_vertices(32);
        assert_eq!(vertices.len(), 32 * 6);
        assert_outward_winding(&vertices);

        let apexes = vertices.iter().filter(|v| position(v).z > 0.49).count();
        assert_eq!(apexes, 32);
        for v in &vertices {
            assert_abs_diff_eq!(normal(v).length(), 1.0, epsilon = 1e-5);
            assert!(position(v).truncate().length() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn cone_has_at_least_three_segments() {
        assert_eq!(cone_vertices(0).len(), 3 * 6);
    }
}
