//! Light shaft options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::effect::params::rgb_hex;

/// Light shaft parameters. Colors are sRGB-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "God Rays", inline)]
#[serde(default)]
pub struct GodraysOptions {
    /// Whether the shafts are drawn.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Whether the fake sun glow is painted behind the scene.
    #[schemars(title = "Show Fake Sun")]
    pub show_fake_sun: bool,
    /// Additive blend factor of the shafts.
    #[schemars(
        title = "Intensity",
        range(min = 0.0, max = 2.0),
        extend("step" = 0.01)
    )]
    pub intensity: f32,
    /// Background color behind the fake sun.
    #[schemars(skip)]
    pub background_color: [f32; 3],
    /// Color of the fake sun.
    #[schemars(skip)]
    pub sun_color: [f32; 3],
    /// Maximum ray length in texture space.
    #[schemars(
        title = "Filter Length",
        range(min = 0.05, max = 2.0),
        extend("step" = 0.05)
    )]
    pub filter_length: f32,
    /// Base of the blur step-size sequence.
    #[schemars(
        title = "Taps",
        range(min = 2.0, max = 12.0),
        extend("step" = 0.5)
    )]
    pub taps: f32,
}

impl Default for GodraysOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            show_fake_sun: true,
            intensity: 0.75,
            background_color: rgb_hex(0x00_05_11),
            sun_color: rgb_hex(0xff_ee_00),
            filter_length: 1.0,
            taps: 6.0,
        }
    }
}
