//! CPU execution of the full god-ray pipeline.
//!
//! Runs the same kernels and the same [`BlurSchedule`] as the GPU effect
//! on in-memory images. Sampling follows the GPU setup: texel centers at
//! `(i + 0.5) / size`, bilinear filtering, clamp-to-edge addressing. Used
//! by tests and benchmarks, and handy for offline previews.

use glam::Vec2;

use super::kernels;
use super::params::{GodraysParams, MASK_DOWNSCALE};
use super::schedule::{BlurSchedule, BlurStep, MaskSlot};
use crate::gpu::texture::downscaled_size;

/// Texture-space coordinate of the center of pixel `(x, y)`.
#[must_use]
pub fn pixel_center_uv(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    )
}

/// A row-major image of `T` texels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: u32,
    height: u32,
    texels: Vec<T>,
}

/// Single-channel float image (depth or mask).
pub type MaskImage = Image<f32>;

/// RGBA float image.
pub type ColorImage = Image<[f32; 4]>;

impl<T: Copy> Image<T> {
    /// Image of `width × height` texels all set to `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            texels: vec![value; (width * height) as usize],
        }
    }

    /// Image whose texel `(x, y)` is `f(x, y, uv)` with `uv` the texel
    /// center.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32, Vec2) -> T,
    {
        let (width, height) = (width.max(1), height.max(1));
        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y, pixel_center_uv(x, y, width, height)));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at `(x, y)`, clamped to the edge.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> T {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// All texels, row-major.
    pub fn texels(&self) -> &[T] {
        &self.texels
    }

    /// Bilinear sample at `uv` with clamp-to-edge addressing.
    pub fn sample<L>(&self, uv: Vec2, lerp: L) -> T
    where
        L: Fn(T, T, f32) -> T,
    {
        let px = uv.x * self.width as f32 - 0.5;
        let py = uv.y * self.height as f32 - 0.5;
        let x0 = px.floor();
        let y0 = py.floor();
        let fx = px - x0;
        let fy = py - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = lerp(self.get(x0, y0), self.get(x0 + 1, y0), fx);
        let bottom = lerp(self.get(x0, y0 + 1), self.get(x0 + 1, y0 + 1), fx);
        lerp(top, bottom, fy)
    }
}

impl MaskImage {
    /// Bilinear mask sample.
    #[must_use]
    pub fn sample_mask(&self, uv: Vec2) -> f32 {
        self.sample(uv, |a, b, t| a + (b - a) * t)
    }
}

impl ColorImage {
    /// Bilinear color sample.
    #[must_use]
    pub fn sample_color(&self, uv: Vec2) -> [f32; 4] {
        self.sample(uv, |a, b, t| {
            std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
        })
    }
}

/// Camera planes and light position of one reference frame.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceFrame {
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance, also the mask normalization distance.
    pub far: f32,
    /// Light position in texture space.
    pub light: Vec2,
}

/// Every buffer produced by one reference frame.
#[derive(Debug, Clone)]
pub struct ReferenceOutput {
    /// Full-resolution depth mask.
    pub occlusion: MaskImage,
    /// Final contents of the `Ping` buffer.
    pub ping: MaskImage,
    /// Final contents of the `Pong` buffer.
    pub pong: MaskImage,
    /// Combined output color.
    pub color: ColorImage,
}

impl ReferenceOutput {
    /// The buffer stored in `slot`.
    pub fn mask(&self, slot: MaskSlot) -> &MaskImage {
        match slot {
            MaskSlot::Occlusion => &self.occlusion,
            MaskSlot::Ping => &self.ping,
            MaskSlot::Pong => &self.pong,
        }
    }
}

/// CPU implementation of the god-ray pass sequence.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePipeline {
    params: GodraysParams,
    schedule: BlurSchedule,
}

impl ReferencePipeline {
    /// Pipeline for the given parameters.
    #[must_use]
    pub fn new(params: GodraysParams) -> Self {
        Self {
            schedule: BlurSchedule::new(&params),
            params,
        }
    }

    /// The blur schedule this pipeline executes.
    pub fn schedule(&self) -> &BlurSchedule {
        &self.schedule
    }

    /// Fake-sun background of the given size.
    #[must_use]
    pub fn fake_sun(&self, width: u32, height: u32, light: Vec2) -> ColorImage {
        let aspect = width as f32 / height.max(1) as f32;
        Image::from_fn(width, height, |_, _, uv| {
            kernels::fake_sun(
                uv,
                light,
                aspect,
                self.params.background_color,
                self.params.sun_color,
            )
        })
    }

    /// Depth-mask pass at the resolution of `depth`.
    #[must_use]
    pub fn depth_mask(
        &self,
        depth: &MaskImage,
        near: f32,
        far: f32,
    ) -> MaskImage {
        Image::from_fn(depth.width(), depth.height(), |x, y, _| {
            let d = depth.get(i64::from(x), i64::from(y));
            kernels::depth_to_mask(d, near, far)
        })
    }

    /// One blur pass from `source` into a `width × height` target.
    #[must_use]
    pub fn blur(
        source: &MaskImage,
        step: &BlurStep,
        light: Vec2,
        (width, height): (u32, u32),
    ) -> MaskImage {
        Image::from_fn(width, height, |_, _, uv| {
            kernels::radial_blur(uv, light, step.step_size, |tap| {
                source.sample_mask(tap)
            })
        })
    }

    /// Combine pass at the resolution of `color`.
    #[must_use]
    pub fn combine(&self, color: &ColorImage, mask: &MaskImage) -> ColorImage {
        Image::from_fn(color.width(), color.height(), |x, y, uv| {
            kernels::combine(
                color.get(i64::from(x), i64::from(y)),
                mask.sample_mask(uv),
                self.params.intensity,
            )
        })
    }

    /// Run depth mask → blur ×3 → combine over `depth` and `color`, which
    /// must share a size.
    #[must_use]
    pub fn run(
        &self,
        depth: &MaskImage,
        color: &ColorImage,
        frame: &ReferenceFrame,
    ) -> ReferenceOutput {
        let mask_size =
            downscaled_size(depth.width(), depth.height(), MASK_DOWNSCALE);
        let mut out = ReferenceOutput {
            occlusion: self.depth_mask(depth, frame.near, frame.far),
            ping: Image::filled(mask_size.0, mask_size.1, 0.0),
            pong: Image::filled(mask_size.0, mask_size.1, 0.0),
            color: color.clone(),
        };

        for step in self.schedule.steps() {
            let blurred =
                Self::blur(out.mask(step.source), step, frame.light, mask_size);
            match step.target {
                MaskSlot::Ping => out.ping = blurred,
                MaskSlot::Pong => out.pong = blurred,
                MaskSlot::Occlusion => out.occlusion = blurred,
            }
        }

        let shafts = out.mask(self.schedule.combine_source());
        out.color = self.combine(color, shafts);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEAR: f32 = 1.0;
    const FAR: f32 = 3000.0;

    fn frame(light: Vec2) -> ReferenceFrame {
        ReferenceFrame {
            near: NEAR,
            far: FAR,
            light,
        }
    }

    #[test]
    fn bilinear_sample_hits_texel_centers_exactly() {
        let img = MaskImage::from_fn(4, 4, |x, y, _| (x + 4 * y) as f32);
        assert_eq!(img.sample_mask(pixel_center_uv(2, 1, 4, 4)), 6.0);
        // Halfway between texels 0 and 1 on row 0
        assert!((img.sample_mask(Vec2::new(0.25, 0.125)) - 0.5).abs() < 1e-6);
        // Clamp to edge outside the image
        assert_eq!(img.sample_mask(Vec2::new(-3.0, -3.0)), 0.0);
        assert_eq!(img.sample_mask(Vec2::new(5.0, 5.0)), 15.0);
    }

    #[test]
    fn empty_sky_brightens_uniformly() {
        // Depth cleared to the far plane everywhere: mask is 0, the blur
        // keeps it 0, and combine adds the full intensity.
        let pipeline = ReferencePipeline::new(GodraysParams::default());
        let depth = MaskImage::filled(32, 16, 1.0);
        let color = ColorImage::filled(32, 16, [0.1, 0.1, 0.1, 0.0]);
        let out = pipeline.run(&depth, &color, &frame(Vec2::new(0.5, 0.2)));

        assert_eq!(out.pong.width(), 8);
        assert_eq!(out.pong.height(), 4);
        for texel in out.color.texels() {
            assert!((texel[0] - 0.85).abs() < 1e-5);
            assert_eq!(texel[3], 1.0);
        }
    }

    #[test]
    fn zero_intensity_leaves_scene_untouched() {
        let params = GodraysParams {
            intensity: 0.0,
            ..GodraysParams::default()
        };
        let pipeline = ReferencePipeline::new(params);
        let depth = MaskImage::from_fn(16, 16, |x, _, _| {
            if x < 8 { 0.2 } else { 1.0 }
        });
        let color = ColorImage::from_fn(16, 16, |x, y, _| {
            [x as f32 / 16.0, y as f32 / 16.0, 0.5, 1.0]
        });
        let out = pipeline.run(&depth, &color, &frame(Vec2::new(0.9, 0.1)));
        for (a, b) in out.color.texels().iter().zip(color.texels()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn occluder_shadows_pixels_behind_it() {
        // Near-plane occluder in a vertical band left of a light on the right.
        let pipeline = ReferencePipeline::new(GodraysParams::default());
        let depth = MaskImage::from_fn(64, 64, |x, _, _| {
            if (24..32).contains(&x) { 0.0 } else { 1.0 }
        });
        let color = ColorImage::filled(64, 64, [0.0, 0.0, 0.0, 1.0]);
        let out = pipeline.run(&depth, &color, &frame(Vec2::new(0.9, 0.5)));

        let shadowed = out.color.get(16, 32)[0];
        let lit = out.color.get(48, 32)[0];
        assert!(shadowed < lit, "shadowed {shadowed} lit {lit}");
    }

    #[test]
    fn final_blur_lands_in_combine_source() {
        let pipeline = ReferencePipeline::new(GodraysParams::default());
        let depth = MaskImage::from_fn(16, 16, |_, y, _| {
            if y > 10 { 0.0 } else { 1.0 }
        });
        let color = ColorImage::filled(16, 16, [0.0; 4]);
        let light = Vec2::new(0.5, 0.1);
        let out = pipeline.run(&depth, &color, &frame(light));

        // Recompute the last pass from the penultimate target.
        let steps = pipeline.schedule().steps();
        let last = steps[2];
        let source = out.mask(last.source);
        let expected = ReferencePipeline::blur(source, &last, light, (4, 4));
        assert_eq!(out.mask(pipeline.schedule().combine_source()), &expected);
    }

    #[test]
    fn fake_sun_background_peaks_under_light() {
        let pipeline = ReferencePipeline::new(GodraysParams::default());
        let img = pipeline.fake_sun(64, 32, Vec2::new(0.5, 0.5));
        let center = img.get(32, 16)[0];
        let corner = img.get(0, 0)[0];
        assert!(center > corner);
        assert!(center <= kernels::FAKE_SUN_PEAK + 1e-6);
    }
}
