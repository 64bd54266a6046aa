//! Depth-mask pass: hardware depth → occlusion mask at full resolution.

use super::screen_pass::ScreenPass;
use crate::error::GodraysError;
use crate::gpu::pipeline_helpers::{
    begin_screen_pass, create_screen_space_pipeline, create_uniform,
    depth_texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::MASK_FORMAT;

/// Camera planes for depth linearization. Must match the WGSL struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct MaskParams {
    near: f32,
    far: f32,
    _pad: [f32; 2],
}

/// Converts the scene depth buffer into the occlusion mask.
pub struct DepthMaskPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    params: MaskParams,
    params_buffer: wgpu::Buffer,
}

impl DepthMaskPass {
    /// Create the pass reading `depth_view`.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        depth_view: &wgpu::TextureView,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GodraysError> {
        let params = MaskParams {
            near: 1.0,
            far: 3000.0,
            _pad: [0.0; 2],
        };
        let params_buffer = create_uniform(
            &context.device,
            "Godrays Mask Params",
            &params,
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Godrays Mask Bind Group Layout"),
                entries: &[depth_texture_2d(0), uniform_buffer(1)],
            },
        );
        let bind_group = Self::create_bind_group(
            context,
            &bind_group_layout,
            depth_view,
            &params_buffer,
        );

        let shader = shader_composer.compose(
            &context.device,
            "Godrays Mask Shader",
            "screen/godrays_depth_mask.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Godrays Mask",
            &shader,
            MASK_FORMAT,
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            params,
            params_buffer,
        })
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        depth_view: &wgpu::TextureView,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Godrays Mask Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            depth_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    /// Point the pass at a recreated depth buffer.
    pub fn rebind(
        &mut self,
        context: &RenderContext,
        depth_view: &wgpu::TextureView,
    ) {
        self.bind_group = Self::create_bind_group(
            context,
            &self.bind_group_layout,
            depth_view,
            &self.params_buffer,
        );
    }

    /// Upload the camera planes if they changed.
    pub fn set_planes(&mut self, queue: &wgpu::Queue, near: f32, far: f32) {
        let params = MaskParams {
            near,
            far,
            _pad: [0.0; 2],
        };
        if params != self.params {
            self.params = params;
            queue.write_buffer(
                &self.params_buffer,
                0,
                bytemuck::bytes_of(&self.params),
            );
        }
    }
}

impl ScreenPass for DepthMaskPass {
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let mut pass = begin_screen_pass(
            encoder,
            "Godrays Depth Mask",
            target,
            Some(wgpu::Color::BLACK),
        );
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
