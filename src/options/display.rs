//! Presentation options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Presentation settings.
pub struct DisplayOptions {
    /// Wait for vertical blank when presenting.
    #[schemars(title = "VSync")]
    pub vsync: bool,
    /// Supersampling factor of the internal render size (1 = native).
    #[schemars(title = "Render Scale", range(min = 1, max = 4))]
    pub render_scale: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            vsync: true,
            render_scale: 1,
        }
    }
}
