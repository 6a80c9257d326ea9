use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use irisdet::{BrightnessMap, DetectConfig, Detector, RadialStatistics};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Eye with mild per-pixel noise so quantile sorting sees realistic input.
fn noisy_eye(w: u32, h: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let (cx, cy) = (w as f32 * 0.5, h as f32 * 0.5);
    let long = w.max(h) as f32;
    let (pupil_r, iris_r) = (0.07 * long, 0.3 * long);
    RgbImage::from_fn(w, h, |x, y| {
        let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
        let base: [f32; 3] = if d < pupil_r {
            [15.0, 15.0, 18.0]
        } else if d < iris_r {
            [120.0, 85.0, 60.0]
        } else {
            [235.0, 230.0, 225.0]
        };
        let n: f32 = rng.gen_range(-12.0..12.0);
        Rgb(base.map(|c| (c + n).clamp(0.0, 255.0) as u8))
    })
}

fn bench_brightness_map(c: &mut Criterion) {
    let img = noisy_eye(800, 600, 1);
    c.bench_function("brightness_map_800x600", |b| {
        b.iter(|| BrightnessMap::from_source(black_box(&img)))
    });
}

fn bench_radial_statistics(c: &mut Criterion) {
    let img = noisy_eye(200, 150, 2);
    let map = BrightnessMap::from_source(&img);
    let mut stats = RadialStatistics::new();
    c.bench_function("radial_statistics_r60", |b| {
        b.iter(|| {
            stats.collect(black_box(&map), [100, 75], 60);
            black_box(stats.quantile(30, 0.75))
        })
    });
}

fn bench_detect(c: &mut Criterion) {
    let img = noisy_eye(640, 480, 3);
    let detector = Detector::new();
    let mut group = c.benchmark_group("detect");
    group.sample_size(10);
    group.bench_function("default_640x480", |b| {
        b.iter(|| detector.detect(black_box(&img)))
    });

    let coarse = Detector::with_config(DetectConfig {
        resolutions: vec![100, 200],
        ..DetectConfig::default()
    });
    group.bench_function("two_stage_640x480", |b| {
        b.iter(|| coarse.detect(black_box(&img)))
    });
    group.finish();
}

criterion_group!(
    hotpaths,
    bench_brightness_map,
    bench_radial_statistics,
    bench_detect
);
criterion_main!(hotpaths);
