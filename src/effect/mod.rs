//! The god-ray effect: a fixed sequence of fullscreen passes.
//!
//! Per frame, after the caller has drawn the scene into its color and
//! depth buffers:
//!
//! 1. **Depth mask**: scene depth → full-resolution occlusion mask.
//! 2. **Radial blur ×3**: occlusion → Pong → Ping → Pong at quarter
//!    resolution, each pass smearing toward the light with a smaller step.
//! 3. **Combine**: scene color + `intensity · (1 - mask)` → output.
//!
//! The fake-sun pass runs earlier, in place of the scene color clear, via
//! [`GodraysEffect::render_background`].

pub mod buffers;
pub mod combine;
pub mod depth_mask;
pub mod fake_sun;
pub mod kernels;
pub mod light;
pub mod params;
pub mod radial_blur;
pub mod reference;
pub mod schedule;
pub mod screen_pass;

use buffers::MaskBuffers;
use combine::CombinePass;
use depth_mask::DepthMaskPass;
use fake_sun::FakeSunPass;
use light::LightScreenPosition;
use params::GodraysParams;
use radial_blur::RadialBlurPass;
use schedule::{frame_graph, BlurSchedule, MaskSlot, PassNode};
use screen_pass::ScreenPass;

use crate::error::GodraysError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;

/// Scene buffers the effect reads. Owned by the caller, who must call
/// [`GodraysEffect::resize`] whenever they are recreated.
#[derive(Clone, Copy)]
pub struct EffectInputs<'a> {
    /// Scene depth, [`crate::gpu::texture::DEPTH_FORMAT`].
    pub depth: &'a wgpu::TextureView,
    /// Scene color, [`crate::gpu::texture::SCENE_COLOR_FORMAT`].
    pub scene_color: &'a wgpu::TextureView,
}

/// Per-frame camera and light state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GodraysFrame {
    /// Light position in texture space.
    pub light: LightScreenPosition,
    /// Camera near plane.
    pub near: f32,
    /// Camera far plane.
    pub far: f32,
    /// Render target width over height.
    pub aspect: f32,
}

/// Intensity the combine pass blends with.
#[must_use]
pub fn combine_intensity(enabled: bool, intensity: f32) -> f32 {
    if enabled {
        intensity
    } else {
        0.0
    }
}

/// Latch that reports a light behind the camera once per stretch of such
/// frames.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BehindCameraLatch {
    tripped: bool,
}

impl BehindCameraLatch {
    /// Record one frame. Returns `true` on the first frame with the light
    /// behind the camera; a frame in front re-arms the latch.
    pub fn observe(&mut self, in_front: bool) -> bool {
        if in_front {
            self.tripped = false;
            false
        } else {
            !std::mem::replace(&mut self.tripped, true)
        }
    }
}

/// Owns the mask buffers and every pass of the god-ray sequence.
pub struct GodraysEffect {
    params: GodraysParams,
    schedule: BlurSchedule,
    buffers: MaskBuffers,
    fake_sun: FakeSunPass,
    depth_mask: DepthMaskPass,
    radial_blur: RadialBlurPass,
    combine: CombinePass,
    enabled: bool,
    show_fake_sun: bool,
    behind_latch: BehindCameraLatch,
}

impl GodraysEffect {
    /// Build the effect for the context's current render size.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if any pass shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        inputs: EffectInputs<'_>,
        params: GodraysParams,
    ) -> Result<Self, GodraysError> {
        let schedule = BlurSchedule::new(&params);
        let buffers = MaskBuffers::new(
            &context.device,
            (context.render_width(), context.render_height()),
        );

        let fake_sun = FakeSunPass::new(context, &params, shader_composer)?;
        let depth_mask =
            DepthMaskPass::new(context, inputs.depth, shader_composer)?;
        let radial_blur =
            RadialBlurPass::new(context, &schedule, &buffers, shader_composer)?;
        let combine = CombinePass::new(
            context,
            inputs.scene_color,
            buffers.view(schedule.combine_source()),
            params.intensity,
            shader_composer,
        )?;

        log::debug!(
            "godrays effect ready, step sizes {:?}",
            params.step_sizes()
        );

        Ok(Self {
            params,
            schedule,
            buffers,
            fake_sun,
            depth_mask,
            radial_blur,
            combine,
            enabled: true,
            show_fake_sun: true,
            behind_latch: BehindCameraLatch::default(),
        })
    }

    /// Replace the effect parameters. Takes effect from the next frame.
    pub fn set_params(&mut self, queue: &wgpu::Queue, params: GodraysParams) {
        if params == self.params {
            return;
        }
        self.params = params;
        self.schedule = BlurSchedule::new(&params);
        self.radial_blur.set_schedule(&self.schedule);
        self.combine.set_intensity(queue, self.effective_intensity());
    }

    /// Turn the shafts on or off. A disabled effect still runs the combine
    /// pass, at zero intensity, so the output view always receives the
    /// scene.
    pub fn set_enabled(&mut self, queue: &wgpu::Queue, enabled: bool) {
        self.enabled = enabled;
        self.combine.set_intensity(queue, self.effective_intensity());
    }

    /// Choose between the fake-sun glow and a flat background clear.
    pub fn set_show_fake_sun(&mut self, show: bool) {
        self.show_fake_sun = show;
    }

    fn effective_intensity(&self) -> f32 {
        combine_intensity(self.enabled, self.params.intensity)
    }

    /// Upload the frame's light position, camera planes and aspect.
    ///
    /// Must be called before encoding the frame. A light behind the camera
    /// is still used as projected; the first occurrence is logged.
    pub fn prepare(&mut self, queue: &wgpu::Queue, frame: &GodraysFrame) {
        if self.behind_latch.observe(frame.light.in_front) {
            log::warn!(
                "light is behind the camera, projected to {:?}",
                frame.light.uv
            );
        }

        let sun = frame.light.uv.to_array();
        self.fake_sun.update(queue, &self.params, sun, frame.aspect);
        self.depth_mask.set_planes(queue, frame.near, frame.far);
        self.radial_blur.set_light(queue, frame.light.uv);
    }

    /// Paint the scene color background: the fake sun, or a flat clear.
    /// Encode before the scene geometry, which must load rather than clear.
    pub fn render_background(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene_color: &wgpu::TextureView,
    ) {
        if self.show_fake_sun {
            self.fake_sun.render(encoder, scene_color);
        } else {
            self.fake_sun.clear(encoder, scene_color);
        }
    }

    /// Encode depth mask, radial blur and combine, writing into `output`.
    ///
    /// `output` must have the context's surface format.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
    ) {
        if self.enabled {
            self.depth_mask
                .render(encoder, self.buffers.view(MaskSlot::Occlusion));
            self.radial_blur.render(encoder, &self.buffers);
        }
        self.combine.render(encoder, output);
    }

    /// Reallocate the mask buffers for the context's current render size
    /// and rebind every pass to the recreated scene buffers.
    pub fn resize(
        &mut self,
        context: &RenderContext,
        inputs: EffectInputs<'_>,
    ) {
        self.buffers = MaskBuffers::new(
            &context.device,
            (context.render_width(), context.render_height()),
        );
        self.depth_mask.rebind(context, inputs.depth);
        self.radial_blur.rebind(context, &self.buffers);
        self.combine.rebind(
            context,
            inputs.scene_color,
            self.buffers.view(self.schedule.combine_source()),
        );
    }

    /// Current parameters.
    pub fn params(&self) -> &GodraysParams {
        &self.params
    }

    /// Current blur schedule.
    pub fn schedule(&self) -> &BlurSchedule {
        &self.schedule
    }

    /// The mask buffers, for inspection or debug display.
    pub fn buffers(&self) -> &MaskBuffers {
        &self.buffers
    }

    /// Whether the shafts are currently drawn.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The pass sequence [`Self::render`] encodes.
    pub fn frame_graph(&self) -> Vec<PassNode> {
        frame_graph(&self.schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_effect_combines_at_zero_intensity() {
        assert_eq!(combine_intensity(true, 0.75), 0.75);
        assert_eq!(combine_intensity(false, 0.75), 0.0);
    }

    #[test]
    fn behind_camera_reported_once_until_light_returns() {
        let mut latch = BehindCameraLatch::default();
        assert!(!latch.observe(true));
        assert!(latch.observe(false));
        assert!(!latch.observe(false));
        assert!(!latch.observe(false));
        assert!(!latch.observe(true));
        assert!(latch.observe(false));
    }
}
