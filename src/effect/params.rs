//! Effect parameters and the blur step-size schedule.

use crate::options::GodraysOptions;

/// Samples taken per pixel by one radial blur pass.
pub const TAPS_PER_PASS: usize = 6;

/// Number of radial blur passes per frame.
pub const BLUR_PASSES: usize = 3;

/// The ping-pong mask buffers are this many times smaller than the render
/// target on each axis.
pub const MASK_DOWNSCALE: u32 = 4;

/// Step size of blur pass `pass` (1-based): `filter_length · taps^-pass`.
///
/// Passes run large to small. Starting with the widest support aliases
/// less along the beams than the reverse order.
#[must_use]
pub fn step_size(filter_length: f32, taps: f32, pass: u32) -> f32 {
    filter_length * taps.powi(-(pass as i32))
}

/// Convert an sRGB-encoded channel to linear light.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Unpack a `0xRRGGBB` color into sRGB-encoded `[0, 1]` channels.
#[must_use]
pub fn rgb_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Immutable per-frame parameters of the god-ray effect.
///
/// Colors are linear. Nothing here is validated: an absurd intensity or a
/// negative filter length renders wrong, it does not fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GodraysParams {
    /// Additive blend factor of the inverted mask in the combine pass.
    pub intensity: f32,
    /// Fake-sun background color.
    pub background_color: [f32; 3],
    /// Fake-sun disc color.
    pub sun_color: [f32; 3],
    /// Maximum ray length in texture space.
    pub filter_length: f32,
    /// Base of the geometric step-size sequence.
    pub taps: f32,
}

impl Default for GodraysParams {
    fn default() -> Self {
        Self::from_options(&GodraysOptions::default())
    }
}

impl GodraysParams {
    /// Build parameters from options, linearizing the sRGB colors.
    #[must_use]
    pub fn from_options(options: &GodraysOptions) -> Self {
        Self {
            intensity: options.intensity,
            background_color: options.background_color.map(srgb_to_linear),
            sun_color: options.sun_color.map(srgb_to_linear),
            filter_length: options.filter_length,
            taps: options.taps,
        }
    }

    /// Step sizes of the blur passes, in execution order.
    #[must_use]
    pub fn step_sizes(&self) -> [f32; BLUR_PASSES] {
        std::array::from_fn(|i| {
            step_size(self.filter_length, self.taps, i as u32 + 1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-7 * b.abs().max(1.0)
    }

    #[test]
    fn step_sizes_form_geometric_sequence() {
        assert!(close(step_size(1.0, 6.0, 1), 1.0 / 6.0));
        assert!(close(step_size(1.0, 6.0, 2), 1.0 / 36.0));
        assert!(close(step_size(1.0, 6.0, 3), 1.0 / 216.0));
    }

    #[test]
    fn step_sizes_scale_with_filter_length() {
        let params = GodraysParams {
            filter_length: 0.5,
            taps: 6.0,
            ..GodraysParams::default()
        };
        let steps = params.step_sizes();
        assert!(close(steps[0], 0.5 / 6.0));
        assert!(close(steps[1], 0.5 / 36.0));
        assert!(close(steps[2], 0.5 / 216.0));
        assert!(steps[0] > steps[1] && steps[1] > steps[2]);
    }

    #[test]
    fn hex_colors_unpack_per_channel() {
        assert_eq!(rgb_hex(0xffee00), [1.0, 238.0 / 255.0, 0.0]);
        assert_eq!(rgb_hex(0x000511), [0.0, 5.0 / 255.0, 17.0 / 255.0]);
    }

    #[test]
    fn srgb_endpoints_are_fixed() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!(close(srgb_to_linear(1.0), 1.0));
        assert!(srgb_to_linear(0.5) < 0.5);
    }

    #[test]
    fn defaults_match_original_demo() {
        let params = GodraysParams::default();
        assert_eq!(params.intensity, 0.75);
        assert_eq!(params.filter_length, 1.0);
        assert_eq!(params.taps, 6.0);
        assert_eq!(params.sun_color[0], 1.0);
        assert_eq!(params.sun_color[2], 0.0);
    }
}
