//! Scene color and depth buffers shared by the geometry pass and the
//! effect.

use crate::effect::EffectInputs;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{RenderTarget, DEPTH_FORMAT, SCENE_COLOR_FORMAT};

/// HDR color and depth at the context's internal render size.
pub(crate) struct SceneTargets {
    pub color: RenderTarget,
    pub depth: RenderTarget,
}

impl SceneTargets {
    pub fn new(context: &RenderContext) -> Self {
        let size = (context.render_width(), context.render_height());
        Self {
            color: RenderTarget::new(
                &context.device,
                "Scene Color",
                size,
                SCENE_COLOR_FORMAT,
            ),
            depth: RenderTarget::new(
                &context.device,
                "Scene Depth",
                size,
                DEPTH_FORMAT,
            ),
        }
    }

    pub fn effect_inputs(&self) -> EffectInputs<'_> {
        EffectInputs {
            depth: &self.depth.view,
            scene_color: &self.color.view,
        }
    }
}
