//! Flat-colored occluder meshes with depth test and write.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::GodraysError;
use crate::gpu::pipeline_helpers::uniform_buffer_visible;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::renderer::pipeline_util;
use crate::scene::shape::{MeshVertex, Shape};
use crate::scene::Scene;

/// Subdivisions of curved shapes.
const MESH_SEGMENTS: u32 = 32;

/// Occluders are drawn black so only the sky contributes light.
const OCCLUDER_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Per-node transform and color. Must match the WGSL struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    transform: [[f32; 4]; 4],
    color: [f32; 4],
}

impl ModelUniform {
    fn new(transform: Mat4) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color: OCCLUDER_COLOR,
        }
    }
}

struct NodeMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    model: ModelUniform,
    model_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws every scene node into the scene color and depth buffers.
pub struct SolidRenderer {
    pipeline: wgpu::RenderPipeline,
    model_layout: wgpu::BindGroupLayout,
    meshes: Vec<NodeMesh>,
}

impl SolidRenderer {
    /// Build meshes for every node of `scene`.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if the shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GodraysError> {
        let model_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Solid Model Bind Group Layout"),
                entries: &[uniform_buffer_visible(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                )],
            },
        );

        let shader = shader_composer.compose(
            &context.device,
            "Solid Shader",
            "raster/solid.wgsl",
        )?;
        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Solid Pipeline Layout"),
                bind_group_layouts: &[camera_layout, &model_layout],
                push_constant_ranges: &[],
            },
        );
        let pipeline = context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Solid Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: size_of::<MeshVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3
                        ],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &pipeline_util::scene_color_targets(),
                    compilation_options: Default::default(),
                }),
                // Winding differs between shapes; occluders are closed
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        );

        let mut renderer = Self {
            pipeline,
            model_layout,
            meshes: Vec::new(),
        };
        renderer.rebuild(context, scene);
        Ok(renderer)
    }

    fn create_node_mesh(
        &self,
        context: &RenderContext,
        shape: &Shape,
        transform: Mat4,
    ) -> NodeMesh {
        let mesh = shape.mesh(MESH_SEGMENTS);
        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Solid Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Solid Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
        let model = ModelUniform::new(transform);
        let model_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Solid Model Buffer"),
                contents: bytemuck::bytes_of(&model),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Solid Model Bind Group"),
                    layout: &self.model_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: model_buffer.as_entire_binding(),
                    }],
                });
        NodeMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            model,
            model_buffer,
            bind_group,
        }
    }

    /// Recreate every mesh from `scene`, for a changed layout.
    pub fn rebuild(&mut self, context: &RenderContext, scene: &Scene) {
        self.meshes = scene
            .nodes
            .iter()
            .map(|node| {
                self.create_node_mesh(context, &node.shape, node.transform)
            })
            .collect();
        log::debug!("built {} solid meshes", self.meshes.len());
    }

    /// Upload node transforms that changed since the last sync.
    pub fn sync_transforms(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        for (mesh, node) in self.meshes.iter_mut().zip(&scene.nodes) {
            let model = ModelUniform::new(node.transform);
            if model != mesh.model {
                mesh.model = model;
                queue.write_buffer(
                    &mesh.model_buffer,
                    0,
                    bytemuck::bytes_of(&mesh.model),
                );
            }
        }
    }

    /// Draw all meshes, loading the existing color and clearing depth.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Solid Geometry"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        for mesh in &self.meshes {
            pass.set_bind_group(1, &mesh.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(
                mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    /// Number of meshes drawn per frame.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}
