//! Demo engine: scene, camera, occluders and the god-ray effect.

mod options;
mod targets;

use glam::Vec2;

use self::targets::SceneTargets;
use crate::camera::controller::CameraController;
use crate::effect::light::{LightScreenPosition, ScreenOrigin};
use crate::effect::params::GodraysParams;
use crate::effect::{GodraysEffect, GodraysFrame};
use crate::error::GodraysError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::Options;
use crate::renderer::solid::SolidRenderer;
use crate::scene::Scene;

/// Demo renderer: black occluders in front of a fake sun, with god rays.
///
/// # Frame loop
///
/// Call [`update`](Self::update) with the elapsed time, then
/// [`render`](Self::render) to draw and present. Call
/// [`resize`](Self::resize) when the window size changes and forward the
/// cursor through [`handle_mouse_position`](Self::handle_mouse_position).
///
/// # Headless use
///
/// Build a surface-less [`RenderContext`] with
/// [`RenderContext::from_device`], pass it to
/// [`new_from_context`](Self::new_from_context) and draw with
/// [`render_to_texture`](Self::render_to_texture).
pub struct GodraysEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    _shader_composer: ShaderComposer,

    /// Mouse-follow camera.
    pub camera_controller: CameraController,
    scene: Scene,
    solid: SolidRenderer,
    targets: SceneTargets,
    /// The god-ray pass sequence.
    pub effect: GodraysEffect,
    options: Options,
}

impl GodraysEngine {
    /// Engine rendering into a window surface.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError`] if GPU initialization or shader
    /// composition fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, GodraysError> {
        let context =
            RenderContext::new(window, size, options.display.vsync).await?;
        Self::new_from_context(context, options)
    }

    /// Engine from a pre-built [`RenderContext`] (for embedding or
    /// headless rendering).
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::ShaderCompose`] if a shader fails to
    /// compose.
    pub fn new_from_context(
        mut context: RenderContext,
        options: Options,
    ) -> Result<Self, GodraysError> {
        context.render_scale = options.display.render_scale.max(1);
        let mut shader_composer = ShaderComposer::new()?;
        let camera_controller =
            CameraController::new(&context, &options.camera);
        let scene = Scene::from_options(&options.scene);
        let solid = SolidRenderer::new(
            &context,
            &camera_controller.layout,
            &scene,
            &mut shader_composer,
        )?;
        let targets = SceneTargets::new(&context);
        let effect = GodraysEffect::new(
            &context,
            &mut shader_composer,
            targets.effect_inputs(),
            GodraysParams::from_options(&options.godrays),
        )?;

        log::info!(
            "engine ready at {}x{} (render scale {})",
            context.config.width,
            context.config.height,
            context.render_scale
        );

        let mut engine = Self {
            context,
            _shader_composer: shader_composer,
            camera_controller,
            scene,
            solid,
            targets,
            effect,
            options,
        };
        engine.apply_godrays();
        Ok(engine)
    }

    /// Advance the scene animation by `dt` seconds and ease the camera one
    /// step toward the mouse.
    pub fn update(&mut self, dt: f32) {
        self.scene.update(dt);
        self.camera_controller.update();
    }

    /// Forward a cursor position in physical pixels.
    pub fn handle_mouse_position(&mut self, x: f32, y: f32) {
        let size = (self.context.config.width, self.context.config.height);
        self.camera_controller.set_mouse(Vec2::new(x, y), size);
    }

    /// The light's current position in texture space.
    pub fn light_position(&self) -> LightScreenPosition {
        LightScreenPosition::project(
            self.camera_controller.camera.build_matrix(),
            self.scene.sun_position,
            ScreenOrigin::TopLeft,
        )
    }

    /// The animated scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Upload per-frame uniforms.
    fn pre_render(&mut self) {
        let queue = &self.context.queue;
        self.camera_controller.update_gpu(queue);
        self.solid.sync_transforms(queue, &self.scene);

        let camera = &self.camera_controller.camera;
        let frame = GodraysFrame {
            light: self.light_position(),
            near: camera.znear,
            far: camera.zfar,
            aspect: camera.aspect,
        };
        self.effect.prepare(&self.context.queue, &frame);
    }

    /// Encode background, geometry and the god-ray passes into `view`.
    fn render_to_view(&self, view: &wgpu::TextureView) -> wgpu::CommandEncoder {
        let mut encoder = self.context.create_encoder();
        self.effect
            .render_background(&mut encoder, &self.targets.color.view);
        self.solid.render(
            &mut encoder,
            &self.targets.color.view,
            &self.targets.depth.view,
            &self.camera_controller.bind_group,
        );
        self.effect.render(&mut encoder, view);
        encoder
    }

    /// Draw one frame and present it.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.pre_render();
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.render_to_view(&view);
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }

    /// Draw one frame into `view`, which must have the context's format.
    /// The caller owns the texture; nothing is presented.
    pub fn render_to_texture(&mut self, view: &wgpu::TextureView) {
        self.pre_render();
        let encoder = self.render_to_view(view);
        self.context.submit(encoder);
    }

    /// Resize the surface, camera projection and every frame buffer.
    /// Zero-sized dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.camera_controller.resize(width, height);
            self.recreate_targets();
        }
    }

    fn recreate_targets(&mut self) {
        self.targets = SceneTargets::new(&self.context);
        self.effect
            .resize(&self.context, self.targets.effect_inputs());
        log::debug!(
            "frame buffers resized to {}x{}",
            self.context.render_width(),
            self.context.render_height()
        );
    }
}
