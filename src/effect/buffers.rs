//! Mask frame buffers owned by the effect.

use super::params::MASK_DOWNSCALE;
use super::schedule::MaskSlot;
use crate::gpu::texture::{downscaled_size, RenderTarget, MASK_FORMAT};

/// The full-resolution occlusion buffer and the quarter-resolution
/// ping-pong pair.
pub struct MaskBuffers {
    occlusion: RenderTarget,
    ping: RenderTarget,
    pong: RenderTarget,
}

impl MaskBuffers {
    /// Allocate buffers for a `width × height` render target.
    #[must_use]
    pub fn new(device: &wgpu::Device, (width, height): (u32, u32)) -> Self {
        let quarter = downscaled_size(width, height, MASK_DOWNSCALE);
        Self {
            occlusion: RenderTarget::new(
                device,
                "Godrays Occlusion",
                (width, height),
                MASK_FORMAT,
            ),
            ping: RenderTarget::new(
                device,
                "Godrays Ping",
                quarter,
                MASK_FORMAT,
            ),
            pong: RenderTarget::new(
                device,
                "Godrays Pong",
                quarter,
                MASK_FORMAT,
            ),
        }
    }

    /// The buffer stored in `slot`.
    pub fn target(&self, slot: MaskSlot) -> &RenderTarget {
        match slot {
            MaskSlot::Occlusion => &self.occlusion,
            MaskSlot::Ping => &self.ping,
            MaskSlot::Pong => &self.pong,
        }
    }

    /// View of the buffer stored in `slot`.
    pub fn view(&self, slot: MaskSlot) -> &wgpu::TextureView {
        &self.target(slot).view
    }

    /// Size of the render target these buffers were allocated for.
    pub fn full_size(&self) -> (u32, u32) {
        self.occlusion.size()
    }
}
