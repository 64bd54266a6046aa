//! Analytic occluder shapes and their triangle meshes.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning `-half..half`.
    #[must_use]
    pub fn centered(half: Vec3) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    /// Whether `p` lies inside or on the box, with tolerance `eps`.
    #[must_use]
    pub fn contains(&self, p: Vec3, eps: f32) -> bool {
        p.cmpge(self.min - eps).all() && p.cmple(self.max + eps).all()
    }
}

/// Interleaved mesh vertex, matching the solid shader's vertex input.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit object-space normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeMesh {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl ShapeMesh {
    fn base(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Indices of a `rows × cols` quad grid whose vertices start at `base`
    /// and are laid out row-major with `cols + 1` per row.
    fn push_grid(&mut self, base: u32, rows: u32, cols: u32) {
        let stride = cols + 1;
        for i in 0..rows {
            for j in 0..cols {
                let a = base + i * stride + j;
                let b = a + stride;
                self.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
    }

    /// Triangle fan around a center vertex at `center`, rim vertices
    /// following it.
    fn push_fan(&mut self, center: u32, rim: u32) {
        for j in 0..rim {
            self.indices.extend_from_slice(&[
                center,
                center + 1 + j,
                center + 1 + (j + 1) % rim,
            ]);
        }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// An occluder primitive, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Sphere of the given radius.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Box with the given half extents.
    Cuboid {
        /// Half size per axis.
        half_extents: Vec3,
    },
    /// Capped cylinder along Y.
    Cylinder {
        /// Radius.
        radius: f32,
        /// Half of the height.
        half_height: f32,
    },
    /// Torus in the XZ plane.
    Torus {
        /// Distance from the center to the tube center.
        major_radius: f32,
        /// Tube radius.
        minor_radius: f32,
    },
}

impl Shape {
    /// Object-space bounds.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        match *self {
            Self::Sphere { radius } => Aabb::centered(Vec3::splat(radius)),
            Self::Cuboid { half_extents } => Aabb::centered(half_extents),
            Self::Cylinder {
                radius,
                half_height,
            } => Aabb::centered(Vec3::new(radius, half_height, radius)),
            Self::Torus {
                major_radius,
                minor_radius,
            } => {
                let outer = major_radius + minor_radius;
                Aabb::centered(Vec3::new(outer, minor_radius, outer))
            }
        }
    }

    /// Signed distance from `p` to the surface, negative inside.
    #[must_use]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        match *self {
            Self::Sphere { radius } => p.length() - radius,
            Self::Cuboid { half_extents } => {
                let q = p.abs() - half_extents;
                q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
            }
            Self::Cylinder {
                radius,
                half_height,
            } => {
                let d = Vec2::new(
                    Vec2::new(p.x, p.z).length() - radius,
                    p.y.abs() - half_height,
                );
                d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
            }
            Self::Torus {
                major_radius,
                minor_radius,
            } => {
                let q =
                    Vec2::new(Vec2::new(p.x, p.z).length() - major_radius, p.y);
                q.length() - minor_radius
            }
        }
    }

    /// Triangle mesh with `segments` subdivisions around each curved axis
    /// (clamped to at least 3).
    #[must_use]
    pub fn mesh(&self, segments: u32) -> ShapeMesh {
        let segments = segments.max(3);
        let mut mesh = ShapeMesh::default();
        match *self {
            Self::Sphere { radius } => sphere(&mut mesh, radius, segments),
            Self::Cuboid { half_extents } => cuboid(&mut mesh, half_extents),
            Self::Cylinder {
                radius,
                half_height,
            } => cylinder(&mut mesh, radius, half_height, segments),
            Self::Torus {
                major_radius,
                minor_radius,
            } => torus(&mut mesh, major_radius, minor_radius, segments),
        }
        mesh
    }
}

fn sphere(mesh: &mut ShapeMesh, radius: f32, segments: u32) {
    let rings = (segments / 2).max(2);
    let base = mesh.base();
    for i in 0..=rings {
        let theta = PI * i as f32 / rings as f32;
        for j in 0..=segments {
            let phi = TAU * j as f32 / segments as f32;
            let n = Vec3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            );
            mesh.vertices.push(MeshVertex::new(n * radius, n));
        }
    }
    mesh.push_grid(base, rings, segments);
}

fn cuboid(mesh: &mut ShapeMesh, half: Vec3) {
    // (normal, u, v) per face
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (n, u, v) in FACES {
        let base = mesh.base();
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            mesh.vertices
                .push(MeshVertex::new((n + u * su + v * sv) * half, n));
        }
        mesh.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base + 2,
            base + 1,
            base + 3,
        ]);
    }
}

fn cylinder(
    mesh: &mut ShapeMesh,
    radius: f32,
    half_height: f32,
    segments: u32,
) {
    let base = mesh.base();
    for y in [half_height, -half_height] {
        for j in 0..=segments {
            let phi = TAU * j as f32 / segments as f32;
            let n = Vec3::new(phi.cos(), 0.0, phi.sin());
            mesh.vertices
                .push(MeshVertex::new(n * radius + Vec3::Y * y, n));
        }
    }
    mesh.push_grid(base, 1, segments);

    for (y, n) in [(half_height, Vec3::Y), (-half_height, Vec3::NEG_Y)] {
        let center = mesh.base();
        mesh.vertices.push(MeshVertex::new(Vec3::Y * y, n));
        for j in 0..segments {
            let phi = TAU * j as f32 / segments as f32;
            let rim = Vec3::new(phi.cos() * radius, y, phi.sin() * radius);
            mesh.vertices.push(MeshVertex::new(rim, n));
        }
        mesh.push_fan(center, segments);
    }
}

fn torus(mesh: &mut ShapeMesh, major: f32, minor: f32, segments: u32) {
    let tube_segments = (segments / 2).max(3);
    let base = mesh.base();
    for i in 0..=segments {
        let u = TAU * i as f32 / segments as f32;
        let center = Vec3::new(u.cos(), 0.0, u.sin()) * major;
        for j in 0..=tube_segments {
            let v = TAU * j as f32 / tube_segments as f32;
            let n = Vec3::new(v.cos() * u.cos(), v.sin(), v.cos() * u.sin());
            mesh.vertices.push(MeshVertex::new(center + n * minor, n));
        }
    }
    mesh.push_grid(base, segments, tube_segments);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes() -> [Shape; 4] {
        [
            Shape::Sphere { radius: 2.0 },
            Shape::Cuboid {
                half_extents: Vec3::new(1.0, 2.0, 3.0),
            },
            Shape::Cylinder {
                radius: 1.5,
                half_height: 4.0,
            },
            Shape::Torus {
                major_radius: 5.0,
                minor_radius: 1.0,
            },
        ]
    }

    #[test]
    fn mesh_vertices_lie_on_surface() {
        for shape in shapes() {
            let mesh = shape.mesh(16);
            for v in &mesh.vertices {
                let p = Vec3::from_array(v.position);
                let d = shape.signed_distance(p);
                assert!(d.abs() < 1e-4, "{shape:?} vertex {p} at {d}");
            }
        }
    }

    #[test]
    fn mesh_normals_are_unit_length() {
        for shape in shapes() {
            for v in &shape.mesh(12).vertices {
                let len = Vec3::from_array(v.normal).length();
                assert!((len - 1.0).abs() < 1e-5, "{shape:?}");
            }
        }
    }

    #[test]
    fn mesh_indices_form_valid_triangles() {
        for shape in shapes() {
            let mesh = shape.mesh(8);
            assert!(!mesh.indices.is_empty());
            assert_eq!(mesh.indices.len() % 3, 0);
            let n = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n), "{shape:?}");
        }
    }

    #[test]
    fn aabb_bounds_every_vertex() {
        for shape in shapes() {
            let aabb = shape.aabb();
            for v in &shape.mesh(10).vertices {
                assert!(aabb.contains(Vec3::from_array(v.position), 1e-4));
            }
        }
    }

    #[test]
    fn signed_distance_is_negative_inside() {
        for shape in shapes() {
            let inside = match shape {
                Shape::Torus { major_radius, .. } => Vec3::X * major_radius,
                _ => Vec3::ZERO,
            };
            assert!(shape.signed_distance(inside) < 0.0, "{shape:?}");
            assert!(shape.signed_distance(Vec3::splat(100.0)) > 0.0);
        }
    }

    #[test]
    fn torus_hole_is_outside() {
        let torus = Shape::Torus {
            major_radius: 5.0,
            minor_radius: 1.0,
        };
        assert!((torus.signed_distance(Vec3::ZERO) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn cuboid_distance_matches_face_offset() {
        let cuboid = Shape::Cuboid {
            half_extents: Vec3::ONE,
        };
        let outside = cuboid.signed_distance(Vec3::new(3.0, 0.0, 0.0));
        let inside = cuboid.signed_distance(Vec3::new(0.5, 0.0, 0.0));
        assert!((outside - 2.0).abs() < 1e-6);
        assert!((inside + 0.5).abs() < 1e-6);
    }

    #[test]
    fn segments_are_clamped() {
        let sphere = Shape::Sphere { radius: 1.0 };
        assert_eq!(sphere.mesh(0), sphere.mesh(3));
        assert_eq!(
            Shape::Cuboid {
                half_extents: Vec3::ONE
            }
            .mesh(3)
            .triangle_count(),
            12
        );
    }
}
