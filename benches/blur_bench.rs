//! Benchmarks of the CPU reference passes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use godrays::effect::params::GodraysParams;
use godrays::effect::reference::{
    ColorImage, Image, MaskImage, ReferenceFrame, ReferencePipeline,
};

/// Depth buffer with a band of near geometry across the middle.
fn banded_depth(width: u32, height: u32) -> MaskImage {
    Image::from_fn(width, height, |_, _, uv| {
        if (0.4..0.6).contains(&uv.y) {
            0.2
        } else {
            1.0
        }
    })
}

fn blur_pass_benchmark(c: &mut Criterion) {
    let pipeline = ReferencePipeline::new(GodraysParams::default());
    let depth = banded_depth(640, 360);
    let mask = pipeline.depth_mask(&depth, 1.0, 3000.0);
    let step = pipeline.schedule().steps()[0];

    c.bench_function("radial_blur_pass_160x90", |b| {
        b.iter(|| {
            black_box(ReferencePipeline::blur(
                black_box(&mask),
                &step,
                Vec2::new(0.5, 0.1),
                (160, 90),
            ))
        })
    });
}

fn full_frame_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_frame");
    let pipeline = ReferencePipeline::new(GodraysParams::default());

    for (width, height) in [(128, 72), (320, 180), (640, 360)] {
        let depth = banded_depth(width, height);
        let color: ColorImage =
            pipeline.fake_sun(width, height, Vec2::new(0.5, 0.1));
        let frame = ReferenceFrame {
            near: 1.0,
            far: 3000.0,
            light: Vec2::new(0.5, 0.1),
        };
        group.bench_function(format!("{width}x{height}"), |b| {
            b.iter(|| black_box(pipeline.run(&depth, &color, &frame)))
        });
    }
    group.finish();
}

criterion_group!(benches, blur_pass_benchmark, full_frame_benchmark);
criterion_main!(benches);
