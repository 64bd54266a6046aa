//! Demo scene: static occluders and one orbiting sphere between the
//! camera and the light.

pub mod shape;

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Quat, Vec3};
use shape::Shape;

use crate::options::SceneOptions;

/// Pillars in the ring.
const PILLAR_COUNT: u32 = 8;

/// One drawable object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Object-space geometry.
    pub shape: Shape,
    /// Object to world.
    pub transform: Mat4,
    /// Whether [`Scene::update`] moves this node along the orbit.
    pub animated: bool,
}

impl SceneNode {
    fn fixed(shape: Shape, transform: Mat4) -> Self {
        Self {
            shape,
            transform,
            animated: false,
        }
    }
}

/// Circular path of the animated nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Path radius.
    pub radius: f32,
    /// Angular speed in radians per second.
    pub speed: f32,
    /// Z of the path center; the center sits on the Y = 0 plane at x = 0.
    pub center_z: f32,
    /// Uniform scale of the orbiting node.
    pub scale: f32,
}

impl Orbit {
    /// Position at time `t` seconds: `x = r·cos(t·speed)`,
    /// `z = r·sin(t·speed) + center_z`.
    #[must_use]
    pub fn position(&self, t: f32) -> Vec3 {
        let angle = t * self.speed;
        Vec3::new(
            self.radius * angle.cos(),
            0.0,
            self.radius * angle.sin() + self.center_z,
        )
    }

    fn transform(&self, t: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::IDENTITY,
            self.position(t),
        )
    }
}

/// The nodes to draw and the light they occlude.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Every drawable node.
    pub nodes: Vec<SceneNode>,
    /// World-space light position.
    pub sun_position: Vec3,
    /// Path of the animated nodes.
    pub orbit: Orbit,
    time: f32,
}

impl Scene {
    /// The default layout: a ring of pillars, a torus framing the light,
    /// and a unit sphere scaled onto the orbit.
    #[must_use]
    pub fn from_options(options: &SceneOptions) -> Self {
        let orbit = Orbit {
            radius: options.orbit_radius,
            speed: options.orbit_speed,
            center_z: options.orbit_center_z,
            scale: options.orbiter_scale,
        };

        let pillar = Shape::Cylinder {
            radius: 8.0,
            half_height: 80.0,
        };
        let mut nodes: Vec<SceneNode> = (0..PILLAR_COUNT)
            .map(|k| {
                let angle = TAU * k as f32 / PILLAR_COUNT as f32;
                let at = Vec3::new(
                    150.0 * angle.cos(),
                    -20.0,
                    150.0 * angle.sin() + options.orbit_center_z,
                );
                SceneNode::fixed(pillar, Mat4::from_translation(at))
            })
            .collect();

        nodes.push(SceneNode::fixed(
            Shape::Torus {
                major_radius: 60.0,
                minor_radius: 10.0,
            },
            Mat4::from_rotation_translation(
                Quat::from_rotation_x(FRAC_PI_2),
                Vec3::new(0.0, 90.0, options.orbit_center_z - 150.0),
            ),
        ));
        nodes.push(SceneNode::fixed(
            Shape::Cuboid {
                half_extents: Vec3::new(30.0, 30.0, 30.0),
            },
            Mat4::from_rotation_translation(
                Quat::from_rotation_y(0.6) * Quat::from_rotation_x(0.4),
                Vec3::new(-90.0, 60.0, options.orbit_center_z - 60.0),
            ),
        ));
        nodes.push(SceneNode {
            shape: Shape::Sphere { radius: 1.0 },
            transform: orbit.transform(0.0),
            animated: true,
        });

        Self {
            nodes,
            sun_position: Vec3::from_array(options.sun_position),
            orbit,
            time: 0.0,
        }
    }

    /// Advance the animation clock by `dt` seconds and move the animated
    /// nodes.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        let transform = self.orbit.transform(self.time);
        for node in self.nodes.iter_mut().filter(|n| n.animated) {
            node.transform = transform;
        }
    }

    /// Seconds of animation so far.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_starts_on_positive_x() {
        let scene = Scene::from_options(&SceneOptions::default());
        let p = scene.orbit.position(0.0);
        assert!((p - Vec3::new(200.0, 0.0, -100.0)).length() < 1e-4);
    }

    #[test]
    fn orbit_keeps_constant_radius_around_center() {
        let orbit = Scene::from_options(&SceneOptions::default()).orbit;
        let center = Vec3::new(0.0, 0.0, orbit.center_z);
        for i in 0..20 {
            let p = orbit.position(i as f32 * 0.7);
            assert!(((p - center).length() - orbit.radius).abs() < 1e-3);
        }
    }

    #[test]
    fn update_moves_only_animated_nodes() {
        let mut scene = Scene::from_options(&SceneOptions::default());
        let before = scene.clone();
        scene.update(1.5);
        assert_eq!(scene.time(), 1.5);
        for (a, b) in before.nodes.iter().zip(&scene.nodes) {
            if a.animated {
                assert_ne!(a.transform, b.transform);
            } else {
                assert_eq!(a.transform, b.transform);
            }
        }
        let orbiter = scene.nodes.iter().find(|n| n.animated).unwrap();
        let at = orbiter.transform.transform_point3(Vec3::ZERO);
        assert!((at - scene.orbit.position(1.5)).length() < 1e-3);
    }

    #[test]
    fn default_scene_has_each_shape_kind() {
        let scene = Scene::from_options(&SceneOptions::default());
        let has =
            |f: fn(&Shape) -> bool| scene.nodes.iter().any(|n| f(&n.shape));
        assert!(has(|s| matches!(s, Shape::Sphere { .. })));
        assert!(has(|s| matches!(s, Shape::Cuboid { .. })));
        assert!(has(|s| matches!(s, Shape::Cylinder { .. })));
        assert!(has(|s| matches!(s, Shape::Torus { .. })));
        assert_eq!(scene.nodes.iter().filter(|n| n.animated).count(), 1);
        assert_eq!(scene.sun_position, Vec3::new(0.0, 1000.0, -1000.0));
    }
}
