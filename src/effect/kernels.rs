//! Per-pixel math of the four god-ray stages.
//!
//! These mirror the WGSL fragment shaders line for line so the effect can
//! be checked (and run, see [`super::reference`]) without a GPU.

use glam::Vec2;

use super::params::TAPS_PER_PASS;

/// Fake-sun blend proportion at the light position.
pub const FAKE_SUN_PEAK: f32 = 0.35;

/// Aspect-corrected texture-space radius of the fake-sun glow.
pub const FAKE_SUN_RADIUS: f32 = 0.5;

/// Positive view-space distance for a `[0, 1]` hardware depth value of a
/// right-handed perspective projection with the given planes.
#[must_use]
pub fn linearize_depth(depth: f32, near: f32, far: f32) -> f32 {
    (near * far) / (far - depth * (far - near))
}

/// Occlusion mask value: `1 - clamp(linear_depth / far, 0, 1)`.
#[must_use]
pub fn depth_to_mask(depth: f32, near: f32, far: f32) -> f32 {
    1.0 - (linearize_depth(depth, near, far) / far).clamp(0.0, 1.0)
}

/// Radial blur of one destination pixel at `uv` toward `light`.
///
/// Takes up to [`TAPS_PER_PASS`] samples of `sample` stepping `step_size`
/// toward the light, skipping taps past the light or outside the vertical
/// `[0, 1)` range, and divides by the fixed tap count.
pub fn radial_blur<F>(uv: Vec2, light: Vec2, step_size: f32, sample: F) -> f32
where
    F: Fn(Vec2) -> f32,
{
    let delta = light - uv;
    let dist = delta.length();
    let dir = if dist > 0.0 { delta / dist } else { Vec2::ZERO };
    let step = dir * step_size;
    let iters = dist / step_size;

    let mut tap_uv = uv;
    let mut sum = 0.0;
    for i in 0..TAPS_PER_PASS {
        if i as f32 <= iters && (0.0..1.0).contains(&tap_uv.y) {
            sum += sample(tap_uv);
        }
        tap_uv += step;
    }
    sum / TAPS_PER_PASS as f32
}

/// Combine: `color + intensity · (1 - mask)` with alpha forced to 1.
#[must_use]
pub fn combine(color: [f32; 4], mask: f32, intensity: f32) -> [f32; 4] {
    let amount = intensity * (1.0 - mask);
    [color[0] + amount, color[1] + amount, color[2] + amount, 1.0]
}

/// Fake-sun blend proportion toward the sun color at `uv`.
#[must_use]
pub fn fake_sun_proportion(uv: Vec2, light: Vec2, aspect: f32) -> f32 {
    let mut diff = uv - light;
    diff.x *= aspect;
    let falloff = (diff.length() / FAKE_SUN_RADIUS).clamp(0.0, 1.0);
    FAKE_SUN_PEAK * (1.0 - falloff).powi(3)
}

/// Fake-sun color at `uv`: background blended toward `sun` by
/// [`fake_sun_proportion`], alpha 1.
#[must_use]
pub fn fake_sun(
    uv: Vec2,
    light: Vec2,
    aspect: f32,
    background: [f32; 3],
    sun: [f32; 3],
) -> [f32; 4] {
    let p = fake_sun_proportion(uv, light, aspect);
    let mix = |s: f32, b: f32| s * p + b * (1.0 - p);
    [
        mix(sun[0], background[0]),
        mix(sun[1], background[1]),
        mix(sun[2], background[2]),
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEAR: f32 = 1.0;
    const FAR: f32 = 3000.0;

    #[test]
    fn depth_planes_linearize_to_near_and_far() {
        assert!((linearize_depth(0.0, NEAR, FAR) - NEAR).abs() < 1e-4);
        assert!((linearize_depth(1.0, NEAR, FAR) - FAR).abs() < 1e-2);
    }

    #[test]
    fn mask_matches_formula_and_stays_in_unit_range() {
        for (near, far) in [(1.0, 3000.0), (0.1, 100.0), (5.0, 2000.0)] {
            for i in 0..=100 {
                let d = i as f32 / 100.0;
                let mask = depth_to_mask(d, near, far);
                let expected =
                    (1.0 - linearize_depth(d, near, far) / far).clamp(0.0, 1.0);
                assert!((0.0..=1.0).contains(&mask), "d={d} mask={mask}");
                assert!((mask - expected).abs() < 1e-6, "d={d}");
            }
        }
    }

    #[test]
    fn far_plane_masks_to_zero_and_near_geometry_to_almost_one() {
        assert!(depth_to_mask(1.0, NEAR, FAR).abs() < 1e-5);
        assert!(depth_to_mask(0.0, NEAR, FAR) > 0.999);
    }

    #[test]
    fn blur_at_light_position_takes_single_tap() {
        let light = Vec2::new(0.3, 0.4);
        let out = radial_blur(light, light, 1.0 / 6.0, |_| 0.9);
        assert!((out - 0.9 / 6.0).abs() < 1e-7);
    }

    #[test]
    fn blur_far_from_light_takes_all_taps() {
        let out = radial_blur(
            Vec2::new(0.1, 0.5),
            Vec2::new(0.9, 0.5),
            1.0 / 36.0,
            |_| 1.0,
        );
        assert!((out - 1.0).abs() < 1e-6);
    }

    #[test]
    fn blur_stops_at_the_light() {
        // dist = 0.1, step = 1/36 → iters = 3.6 → taps 0..=3 count
        let out = radial_blur(
            Vec2::new(0.4, 0.5),
            Vec2::new(0.5, 0.5),
            1.0 / 36.0,
            |_| 1.0,
        );
        assert!((out - 4.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn blur_skips_taps_outside_vertical_range() {
        // Light far below the image: every step after the first leaves [0,1)
        let out = radial_blur(
            Vec2::new(0.5, 0.95),
            Vec2::new(0.5, 5.0),
            1.0 / 6.0,
            |_| 1.0,
        );
        assert!((out - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn blur_walks_toward_the_light() {
        // Samples only read non-zero on the light's side of the pixel
        let out = radial_blur(
            Vec2::new(0.2, 0.5),
            Vec2::new(0.8, 0.5),
            1.0 / 6.0,
            |uv| if uv.x > 0.2 { 1.0 } else { 0.0 },
        );
        assert!((out - 3.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn combine_with_zero_intensity_is_identity() {
        let color = [0.12, 0.5, 0.987, 0.3];
        for mask in [0.0, 0.25, 1.0] {
            let out = combine(color, mask, 0.0);
            assert_eq!(&out[..3], &color[..3]);
            assert_eq!(out[3], 1.0);
        }
    }

    #[test]
    fn combine_adds_inverted_mask() {
        let out = combine([0.1, 0.2, 0.3, 0.0], 0.25, 0.8);
        assert!((out[0] - 0.7).abs() < 1e-6);
        assert!((out[1] - 0.8).abs() < 1e-6);
        assert!((out[2] - 0.9).abs() < 1e-6);
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn fake_sun_peaks_at_light() {
        let light = Vec2::new(0.6, 0.2);
        assert!((fake_sun_proportion(light, light, 1.78) - 0.35).abs() < 1e-7);

        let bg = [0.0, 0.0, 0.2];
        let sun = [1.0, 1.0, 0.0];
        let color = fake_sun(light, light, 1.78, bg, sun);
        assert!((color[0] - 0.35).abs() < 1e-6);
        assert!((color[2] - 0.65 * 0.2).abs() < 1e-6);
        assert_eq!(color[3], 1.0);
    }

    #[test]
    fn fake_sun_fades_to_background_beyond_radius() {
        let bg = [0.0, 0.02, 0.07];
        let color = fake_sun(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.9),
            1.0,
            bg,
            [1.0, 0.9, 0.0],
        );
        assert_eq!(&color[..3], &bg);
    }

    #[test]
    fn fake_sun_is_aspect_corrected() {
        let light = Vec2::new(0.5, 0.5);
        let horizontal = fake_sun_proportion(Vec2::new(0.6, 0.5), light, 2.0);
        let vertical = fake_sun_proportion(Vec2::new(0.5, 0.6), light, 2.0);
        assert!(horizontal < vertical);
        let wide = fake_sun_proportion(Vec2::new(0.55, 0.5), light, 2.0);
        assert!((wide - vertical).abs() < 1e-6);
    }
}
