//! Mouse-follow camera and its GPU uniform.

use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;
use crate::options::CameraOptions;

/// Camera that drifts toward the mouse and always looks at the origin.
///
/// The eye sits at `eye_distance` on +Z. Each frame it covers
/// `follow_rate` of the remaining distance to the mouse offset from the
/// window center, with screen-down mapped to world-down.
pub struct CameraController {
    /// Current camera.
    pub camera: Camera,
    /// CPU copy of the GPU uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Layout of [`Self::bind_group`].
    pub layout: wgpu::BindGroupLayout,
    /// Bind group exposing the uniform at binding 0.
    pub bind_group: wgpu::BindGroup,

    mouse: Vec2,
    follow_rate: f32,
}

impl CameraController {
    /// Create the controller and its GPU uniform.
    pub fn new(context: &RenderContext, options: &CameraOptions) -> Self {
        let camera = camera_from_options(options, context.aspect());

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            camera,
            uniform,
            buffer,
            layout,
            bind_group,
            mouse: Vec2::ZERO,
            follow_rate: options.follow_rate,
        }
    }

    /// Record the cursor position in physical pixels.
    pub fn set_mouse(&mut self, position: Vec2, window_size: (u32, u32)) {
        self.mouse = mouse_offset(position, window_size);
    }

    /// Apply new camera options, keeping the current eye x/y.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.follow_rate = options.follow_rate;
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.camera.eye.z = options.eye_distance;
    }

    /// Advance the eye one easing step toward the mouse.
    pub fn update(&mut self) {
        self.camera.eye =
            follow_step(self.camera.eye, self.mouse, self.follow_rate);
        self.camera.target = Vec3::ZERO;
    }

    /// Upload the view-projection matrix.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }

    /// Track a new viewport aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = width as f32 / height.max(1) as f32;
    }
}

fn camera_from_options(options: &CameraOptions, aspect: f32) -> Camera {
    Camera {
        eye: Vec3::new(0.0, 0.0, options.eye_distance),
        target: Vec3::ZERO,
        up: Vec3::Y,
        aspect,
        fovy: options.fovy,
        znear: options.znear,
        zfar: options.zfar,
    }
}

/// Cursor offset from the window center, in pixels.
fn mouse_offset(position: Vec2, (width, height): (u32, u32)) -> Vec2 {
    position - Vec2::new(width as f32, height as f32) * 0.5
}

/// One easing step: `eye.x += (mx - eye.x) · rate`,
/// `eye.y += (-my - eye.y) · rate`. `eye.z` is unchanged.
fn follow_step(eye: Vec3, mouse: Vec2, rate: f32) -> Vec3 {
    Vec3::new(
        eye.x + (mouse.x - eye.x) * rate,
        eye.y + (-mouse.y - eye.y) * rate,
        eye.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_offset_is_relative_to_center() {
        let offset = mouse_offset(Vec2::new(900.0, 100.0), (800, 600));
        assert_eq!(offset, Vec2::new(500.0, -200.0));
    }

    #[test]
    fn follow_step_eases_toward_mouse() {
        let eye = Vec3::new(0.0, 0.0, 200.0);
        let next = follow_step(eye, Vec2::new(100.0, 50.0), 0.036);
        assert!((next.x - 3.6).abs() < 1e-5);
        assert!((next.y + 1.8).abs() < 1e-5);
        assert_eq!(next.z, 200.0);
    }

    #[test]
    fn follow_converges_to_mouse() {
        let mut eye = Vec3::new(0.0, 0.0, 200.0);
        let mouse = Vec2::new(-120.0, 80.0);
        for _ in 0..2000 {
            eye = follow_step(eye, mouse, 0.036);
        }
        assert!((eye.x + 120.0).abs() < 1e-3);
        assert!((eye.y + 80.0).abs() < 1e-3);
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = camera_from_options(&CameraOptions::default(), 1.5);
        assert_eq!(camera.eye, Vec3::new(0.0, 0.0, 200.0));
        let forward = (camera.target - camera.eye).normalize();
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(camera.znear, 1.0);
        assert_eq!(camera.zfar, 3000.0);
    }
}
