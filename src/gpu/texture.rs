//! Frame buffers for screen-space passes.

/// Pixel format of the single-channel occlusion mask buffers.
///
/// `R32Float` is not filterable without an optional device feature, and
/// the radial blur samples bilinearly, so masks use half floats.
pub const MASK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;

/// Pixel format of the intermediate HDR scene color buffer.
pub const SCENE_COLOR_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba16Float;

/// Pixel format of the scene depth buffer.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Size of a buffer downscaled by `divisor`, never smaller than 1x1.
#[must_use]
pub fn downscaled_size(width: u32, height: u32, divisor: u32) -> (u32, u32) {
    let divisor = divisor.max(1);
    ((width / divisor).max(1), (height / divisor).max(1))
}

/// A render-target texture and its default view.
///
/// Created with `RENDER_ATTACHMENT | TEXTURE_BINDING` usage so one pass can
/// write it and the next can sample it.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RenderTarget {
    /// Create a new render-target texture with the given dimensions and format.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("allocated {label} {width}x{height} {format:?}");
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_size_divides_each_axis() {
        assert_eq!(downscaled_size(1920, 1080, 4), (480, 270));
        assert_eq!(downscaled_size(1921, 1083, 4), (480, 270));
    }

    #[test]
    fn downscale_never_reaches_zero() {
        assert_eq!(downscaled_size(3, 2, 4), (1, 1));
        assert_eq!(downscaled_size(0, 0, 4), (1, 1));
        assert_eq!(downscaled_size(64, 64, 0), (64, 64));
    }
}
