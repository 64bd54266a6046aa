//! Radial blur ("godray generation") passes over the ping-pong buffers.

use glam::Vec2;

use super::buffers::MaskBuffers;
use super::schedule::{BlurSchedule, BlurStep, BLUR_LABELS};
use crate::error::GodraysError;
use crate::gpu::pipeline_helpers::{
    begin_screen_pass, create_screen_space_pipeline, create_uniform,
    filtering_sampler, linear_sampler, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::MASK_FORMAT;

/// Light position and tap spacing. Must match the WGSL struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurParams {
    sun: [f32; 2],
    step_size: f32,
    _pad: f32,
}

/// Per-pass uniform buffer and bind group. Each pass owns its buffer so the
/// three step sizes survive a single queue submission.
struct BlurStepBinding {
    step: BlurStep,
    params: BlurParams,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Three radial blur passes sharing one pipeline.
pub struct RadialBlurPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    steps: Vec<BlurStepBinding>,
}

impl RadialBlurPass {
    /// Create the passes of `schedule`, reading and writing `buffers`.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        schedule: &BlurSchedule,
        buffers: &MaskBuffers,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GodraysError> {
        let sampler = linear_sampler(&context.device, "Godrays Blur Sampler");

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Godrays Blur Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    filtering_sampler(1),
                    uniform_buffer(2),
                ],
            },
        );

        let steps = schedule
            .steps()
            .iter()
            .map(|step| {
                let params = BlurParams {
                    sun: [0.5, 0.5],
                    step_size: step.step_size,
                    _pad: 0.0,
                };
                let buffer = create_uniform(
                    &context.device,
                    &format!("Godrays Blur Params {}", step.pass_index),
                    &params,
                );
                let bind_group = Self::create_bind_group(
                    context,
                    &bind_group_layout,
                    buffers.view(step.source),
                    &sampler,
                    &buffer,
                );
                BlurStepBinding {
                    step: *step,
                    params,
                    buffer,
                    bind_group,
                }
            })
            .collect();

        let shader = shader_composer.compose(
            &context.device,
            "Godrays Blur Shader",
            "screen/godrays_generate.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Godrays Blur",
            &shader,
            MASK_FORMAT,
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            sampler,
            steps,
        })
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        source: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Godrays Blur Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    /// Recreate the source bindings after the mask buffers were
    /// reallocated.
    pub fn rebind(&mut self, context: &RenderContext, buffers: &MaskBuffers) {
        for binding in &mut self.steps {
            binding.bind_group = Self::create_bind_group(
                context,
                &self.bind_group_layout,
                buffers.view(binding.step.source),
                &self.sampler,
                &binding.buffer,
            );
        }
    }

    /// Adopt new step sizes. The buffer roles of a schedule never change,
    /// only the spacing does.
    pub fn set_schedule(&mut self, schedule: &BlurSchedule) {
        for (binding, step) in self.steps.iter_mut().zip(schedule.steps()) {
            binding.step = *step;
            binding.params.step_size = step.step_size;
        }
    }

    /// Set the light position and upload every pass's parameters.
    pub fn set_light(&mut self, queue: &wgpu::Queue, light: Vec2) {
        for binding in &mut self.steps {
            binding.params.sun = light.to_array();
            queue.write_buffer(
                &binding.buffer,
                0,
                bytemuck::bytes_of(&binding.params),
            );
        }
    }

    /// Encode all blur passes in schedule order.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        buffers: &MaskBuffers,
    ) {
        for binding in &self.steps {
            let label = BLUR_LABELS[binding.step.pass_index as usize - 1];
            let mut pass = begin_screen_pass(
                encoder,
                label,
                buffers.view(binding.step.target),
                Some(wgpu::Color::BLACK),
            );
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &binding.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }
}
