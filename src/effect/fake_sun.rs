//! Fake-sun pass: a soft glow at the light position over the background
//! color, drawn in place of a clear before scene geometry.

use super::params::GodraysParams;
use super::screen_pass::ScreenPass;
use crate::error::GodraysError;
use crate::gpu::pipeline_helpers::{
    begin_screen_pass, create_screen_space_pipeline, create_uniform,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::SCENE_COLOR_FORMAT;

/// Colors, light position and aspect. Must match the WGSL struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct SunParams {
    background: [f32; 4],
    sun_color: [f32; 4],
    sun: [f32; 2],
    aspect: f32,
    _pad: f32,
}

impl SunParams {
    fn new(params: &GodraysParams, sun: [f32; 2], aspect: f32) -> Self {
        let [br, bg, bb] = params.background_color;
        let [sr, sg, sb] = params.sun_color;
        Self {
            background: [br, bg, bb, 1.0],
            sun_color: [sr, sg, sb, 1.0],
            sun,
            aspect,
            _pad: 0.0,
        }
    }
}

/// Paints the fake-sun background into the scene color buffer.
pub struct FakeSunPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    params: SunParams,
    params_buffer: wgpu::Buffer,
    background: wgpu::Color,
}

impl FakeSunPass {
    /// Create the pass.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        params: &GodraysParams,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GodraysError> {
        let sun_params = SunParams::new(params, [0.5, 0.5], context.aspect());
        let params_buffer = create_uniform(
            &context.device,
            "Godrays Sun Params",
            &sun_params,
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Godrays Sun Bind Group Layout"),
                entries: &[uniform_buffer(0)],
            },
        );
        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Godrays Sun Bind Group"),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params_buffer.as_entire_binding(),
                    }],
                });

        let shader = shader_composer.compose(
            &context.device,
            "Godrays Sun Shader",
            "screen/godrays_fake_sun.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Godrays Sun",
            &shader,
            SCENE_COLOR_FORMAT,
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group,
            params: sun_params,
            params_buffer,
            background: background_clear(params),
        })
    }

    /// Upload colors, light position and aspect if any changed.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        params: &GodraysParams,
        sun: [f32; 2],
        aspect: f32,
    ) {
        let next = SunParams::new(params, sun, aspect);
        self.background = background_clear(params);
        if next != self.params {
            self.params = next;
            queue.write_buffer(
                &self.params_buffer,
                0,
                bytemuck::bytes_of(&self.params),
            );
        }
    }

    /// Plain background clear for frames that skip the glow.
    pub fn clear(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        drop(begin_screen_pass(
            encoder,
            "Background Clear",
            target,
            Some(self.background),
        ));
    }
}

fn background_clear(params: &GodraysParams) -> wgpu::Color {
    let [r, g, b] = params.background_color;
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}

impl ScreenPass for FakeSunPass {
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let mut pass = begin_screen_pass(
            encoder,
            "Godrays Fake Sun",
            target,
            Some(self.background),
        );
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
