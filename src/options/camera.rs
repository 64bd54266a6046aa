//! Camera options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Camera projection and mouse-follow parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(
        title = "Field of View",
        range(min = 20.0, max = 120.0),
        extend("step" = 1.0)
    )]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Distance of the eye from the origin along +Z.
    #[schemars(
        title = "Eye Distance",
        range(min = 50.0, max = 1000.0),
        extend("step" = 10.0)
    )]
    pub eye_distance: f32,
    /// Fraction of the remaining mouse offset the eye covers per frame.
    #[schemars(
        title = "Follow Rate",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.002)
    )]
    pub follow_rate: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 70.0,
            znear: 1.0,
            zfar: 3000.0,
            eye_distance: 200.0,
            follow_rate: 0.036,
        }
    }
}
