//! Projection of the light's world position into texture space.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Where texture-space `(0, 0)` sits on screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum ScreenOrigin {
    /// wgpu / D3D / Metal texture convention: v grows downward.
    #[default]
    TopLeft,
    /// OpenGL texture convention: v grows upward.
    BottomLeft,
}

/// The light's position in normalized texture space, recomputed each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightScreenPosition {
    /// Texture-space coordinates. Inside `[0, 1]²` when the light is on
    /// screen; may fall outside when it is not.
    pub uv: Vec2,
    /// `false` when the light is behind the camera. The projection is
    /// still computed but mirrors through the eye.
    pub in_front: bool,
}

impl Default for LightScreenPosition {
    fn default() -> Self {
        Self {
            uv: Vec2::splat(0.5),
            in_front: true,
        }
    }
}

impl LightScreenPosition {
    /// Project `world` through `view_proj`, divide by w, and remap clip
    /// space `[-1, 1]` to texture space `[0, 1]`.
    #[must_use]
    pub fn project(view_proj: Mat4, world: Vec3, origin: ScreenOrigin) -> Self {
        let clip = view_proj * world.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let mut uv = (ndc.truncate() + Vec2::ONE) * 0.5;
        if origin == ScreenOrigin::TopLeft {
            uv.y = 1.0 - uv.y;
        }
        Self {
            uv,
            in_front: clip.w > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_proj() -> Mat4 {
        let proj =
            Mat4::perspective_rh(70f32.to_radians(), 1.0, 1.0, 3000.0);
        let eye = Vec3::new(0.0, 0.0, 200.0);
        proj * Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
    }

    fn project(world: Vec3) -> LightScreenPosition {
        LightScreenPosition::project(view_proj(), world, ScreenOrigin::TopLeft)
    }

    #[test]
    fn light_on_view_axis_projects_to_center() {
        let light = project(Vec3::new(0.0, 0.0, -500.0));
        assert!((light.uv - Vec2::splat(0.5)).length() < 1e-5);
        assert!(light.in_front);
    }

    #[test]
    fn light_above_axis_is_near_top_edge_with_top_left_origin() {
        let world = Vec3::new(0.0, 100.0, -100.0);
        let top_left = project(world);
        let bottom_left = LightScreenPosition::project(
            view_proj(),
            world,
            ScreenOrigin::BottomLeft,
        );
        assert!(top_left.uv.y < 0.5);
        assert!(bottom_left.uv.y > 0.5);
        assert!((top_left.uv.y + bottom_left.uv.y - 1.0).abs() < 1e-5);
        assert_eq!(top_left.uv.x, bottom_left.uv.x);
    }

    #[test]
    fn light_behind_camera_is_flagged() {
        let light = project(Vec3::new(0.0, 0.0, 500.0));
        assert!(!light.in_front);
    }

    #[test]
    fn light_to_the_right_has_larger_u() {
        let light = project(Vec3::new(50.0, 0.0, 0.0));
        assert!(light.uv.x > 0.5);
        assert!((light.uv.y - 0.5).abs() < 1e-5);
    }
}
