//! Device, queue and optional presentation surface.

use std::fmt;

/// Failures while bringing up the GPU.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window handle could not back a wgpu surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused the requested limits or features.
    Device(wgpu::RequestDeviceError),
    /// The adapter offers no configuration for the surface.
    SurfaceConfig,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot create surface: {e}"),
            Self::Adapter(e) => write!(f, "no usable GPU adapter: {e}"),
            Self::Device(e) => write!(f, "cannot open GPU device: {e}"),
            Self::SurfaceConfig => {
                write!(f, "adapter has no configuration for this surface")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::SurfaceConfig => None,
        }
    }
}

/// `Fifo` with vsync, otherwise the fastest mode the surface allows.
#[must_use]
pub fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Configuration for a context without a surface. Only format and size are
/// read; zero extents are clamped to one.
#[must_use]
pub fn headless_config(
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: present_mode(true),
        desired_maximum_frame_latency: 2,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: Vec::new(),
    }
}

/// GPU handles plus the output size the frame buffers follow.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Command queue.
    pub queue: wgpu::Queue,
    /// Presentation surface, `None` when rendering into caller textures.
    pub surface: Option<wgpu::Surface<'static>>,
    /// Output format and size.
    pub config: wgpu::SurfaceConfiguration,
    /// Supersampling factor of the internal frame buffers.
    pub render_scale: u32,
}

impl RenderContext {
    /// Open a device that can present to `window`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError`] when any step of the GPU bring-up
    /// fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        vsync: bool,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::Adapter)?;
        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Godrays Device"),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::Device)?;

        let (width, height) = initial_size;
        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(RenderContextError::SurfaceConfig)?;
        config.present_mode = present_mode(vsync);
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface: Some(surface),
            config,
            render_scale: 1,
        })
    }

    /// Wrap a device owned elsewhere. Frames go to caller textures of
    /// `format` through the engine's `render_to_texture`.
    #[must_use]
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            device,
            queue,
            surface: None,
            config: headless_config(format, width, height),
            render_scale: 1,
        }
    }

    /// Output texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Width of the internal frame buffers.
    pub fn render_width(&self) -> u32 {
        self.config.width * self.render_scale
    }

    /// Height of the internal frame buffers.
    pub fn render_height(&self) -> u32 {
        self.config.height * self.render_scale
    }

    /// Output width over height.
    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn reconfigure(&self) {
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
    }

    /// Follow a new output size. Zero extents (minimized windows) are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Toggle vsync, reconfiguring the surface only on change.
    pub fn set_vsync(&mut self, vsync: bool) {
        let mode = present_mode(vsync);
        if mode != self.config.present_mode {
            self.config.present_mode = mode;
            self.reconfigure();
        }
    }

    /// Next swapchain texture.
    ///
    /// # Errors
    ///
    /// Returns the surface error, or [`wgpu::SurfaceError::Lost`] when the
    /// context has no surface.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        match &self.surface {
            Some(surface) => surface.get_current_texture(),
            None => Err(wgpu::SurfaceError::Lost),
        }
    }

    /// Fresh encoder for one frame.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Godrays Frame Encoder"),
            })
    }

    /// Finish `encoder` and queue it.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn vsync_selects_fifo() {
        assert_eq!(present_mode(true), wgpu::PresentMode::Fifo);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn headless_config_keeps_format_and_clamps_size() {
        let config =
            headless_config(wgpu::TextureFormat::Rgba8UnormSrgb, 0, 720);
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!((config.width, config.height), (1, 720));
        assert_eq!(config.present_mode, wgpu::PresentMode::Fifo);
        assert!(config.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
    }

    #[test]
    fn surface_config_error_has_no_source() {
        let err = RenderContextError::SurfaceConfig;
        assert!(err.source().is_none());
        assert!(err.to_string().contains("surface"));
    }
}
