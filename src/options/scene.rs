//! Demo scene options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Demo scene layout and animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
pub struct SceneOptions {
    /// World-space position of the light.
    #[schemars(skip)]
    pub sun_position: [f32; 3],
    /// Radius of the orbiting sphere's path.
    #[schemars(
        title = "Orbit Radius",
        range(min = 0.0, max = 600.0),
        extend("step" = 10.0)
    )]
    pub orbit_radius: f32,
    /// Angular speed of the orbiting sphere, radians per second.
    #[schemars(
        title = "Orbit Speed",
        range(min = 0.0, max = 5.0),
        extend("step" = 0.1)
    )]
    pub orbit_speed: f32,
    /// Z coordinate of the orbit center.
    #[schemars(skip)]
    pub orbit_center_z: f32,
    /// Radius of the orbiting sphere.
    #[schemars(
        title = "Orbiter Size",
        range(min = 1.0, max = 100.0),
        extend("step" = 1.0)
    )]
    pub orbiter_scale: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            sun_position: [0.0, 1000.0, -1000.0],
            orbit_radius: 200.0,
            orbit_speed: 0.5,
            orbit_center_z: -100.0,
            orbiter_scale: 20.0,
        }
    }
}
