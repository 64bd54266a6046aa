//! Combine pass: scene color plus the inverted, blurred mask.

use super::screen_pass::ScreenPass;
use crate::error::GodraysError;
use crate::gpu::pipeline_helpers::{
    begin_screen_pass, create_screen_space_pipeline, create_uniform,
    filtering_sampler, linear_sampler, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;

/// Blend strength. Must match the WGSL struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct CombineParams {
    intensity: f32,
    _pad: [f32; 3],
}

struct CombineViews<'a> {
    color: &'a wgpu::TextureView,
    mask: &'a wgpu::TextureView,
    sampler: &'a wgpu::Sampler,
    params_buffer: &'a wgpu::Buffer,
}

/// Adds `intensity · (1 - mask)` onto the scene color and writes the
/// result, alpha 1, into the output view.
pub struct CombinePass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    params: CombineParams,
    params_buffer: wgpu::Buffer,
}

impl CombinePass {
    /// Create the pass reading `color_view` and `mask_view`, writing
    /// targets of the context's output format.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        color_view: &wgpu::TextureView,
        mask_view: &wgpu::TextureView,
        intensity: f32,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GodraysError> {
        let sampler =
            linear_sampler(&context.device, "Godrays Combine Sampler");
        let params = CombineParams {
            intensity,
            _pad: [0.0; 3],
        };
        let params_buffer = create_uniform(
            &context.device,
            "Godrays Combine Params",
            &params,
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Godrays Combine Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    texture_2d(1),
                    filtering_sampler(2),
                    uniform_buffer(3),
                ],
            },
        );
        let bind_group = Self::create_bind_group(
            context,
            &bind_group_layout,
            &CombineViews {
                color: color_view,
                mask: mask_view,
                sampler: &sampler,
                params_buffer: &params_buffer,
            },
        );

        let shader = shader_composer.compose(
            &context.device,
            "Godrays Combine Shader",
            "screen/godrays_combine.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Godrays Combine",
            &shader,
            context.format(),
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            params,
            params_buffer,
        })
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        views: &CombineViews,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Godrays Combine Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            views.color,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            views.mask,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(views.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: views.params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    /// Point the pass at recreated color and mask buffers.
    pub fn rebind(
        &mut self,
        context: &RenderContext,
        color_view: &wgpu::TextureView,
        mask_view: &wgpu::TextureView,
    ) {
        self.bind_group = Self::create_bind_group(
            context,
            &self.bind_group_layout,
            &CombineViews {
                color: color_view,
                mask: mask_view,
                sampler: &self.sampler,
                params_buffer: &self.params_buffer,
            },
        );
    }

    /// Upload a new intensity if it changed.
    pub fn set_intensity(&mut self, queue: &wgpu::Queue, intensity: f32) {
        if intensity != self.params.intensity {
            self.params.intensity = intensity;
            queue.write_buffer(
                &self.params_buffer,
                0,
                bytemuck::bytes_of(&self.params),
            );
        }
    }
}

impl ScreenPass for CombinePass {
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let mut pass = begin_screen_pass(
            encoder,
            "Godrays Combine",
            target,
            Some(wgpu::Color::BLACK),
        );
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
