use criterion::{black_box, criterion_group, criterion_main, Criterion};

use imageforge_core::pixel_format::PixelFormat;
use imageforge_core::resample::{resample, scale_half, EdgeMode, Filter};
use imageforge_core::{decode, DecodeOptions};

// ---------------------------------------------------------------------------
// Resampler
// ---------------------------------------------------------------------------

fn checkerboard(w: usize, h: usize) -> Vec<[u8; 4]> {
    (0..w * h)
        .map(|i| {
            let (x, y) = (i % w, i / w);
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            [v, v, v, 255]
        })
        .collect()
}

fn bench_resample_bilinear_upscale(c: &mut Criterion) {
    let src = checkerboard(64, 64);
    c.bench_function("resample_bilinear_64x64_to_256x256", |b| {
        b.iter(|| resample(black_box(&src), 64, 64, 256, 256, Filter::Bilinear, EdgeMode::Clamp));
    });
}

fn bench_resample_lanczos_downscale(c: &mut Criterion) {
    let src = checkerboard(256, 256);
    c.bench_function("resample_lanczos_normal_256x256_to_64x64", |b| {
        b.iter(|| resample(black_box(&src), 256, 256, 64, 64, Filter::LanczosNormal, EdgeMode::Clamp));
    });
}

fn bench_resample_bicubic(c: &mut Criterion) {
    let src = checkerboard(128, 128);
    c.bench_function("resample_bicubic_mitchell_128x128_to_96x96", |b| {
        b.iter(|| resample(black_box(&src), 128, 128, 96, 96, Filter::BicubicMitchell, EdgeMode::Clamp));
    });
}

fn bench_scale_half(c: &mut Criterion) {
    let src = checkerboard(256, 256);
    c.bench_function("scale_half_256x256", |b| {
        b.iter(|| scale_half(black_box(&src), 256, 256));
    });
}

// ---------------------------------------------------------------------------
// Decode engine
// ---------------------------------------------------------------------------

fn bench_decode_packed_rgba8(c: &mut Criterion) {
    let data = vec![0u8; 128 * 128 * 4];
    let opts = DecodeOptions::new();
    c.bench_function("decode_r8g8b8a8_128x128", |b| {
        b.iter(|| decode(black_box(PixelFormat::R8G8B8A8), black_box(&data), 128, 128, &opts));
    });
}

fn bench_decode_bc1(c: &mut Criterion) {
    let blocks_w = 128 / 4;
    let blocks_h = 128 / 4;
    let data = vec![0u8; blocks_w * blocks_h * 8];
    let opts = DecodeOptions::new();
    c.bench_function("decode_bc1_128x128", |b| {
        b.iter(|| decode(black_box(PixelFormat::Bc1Dxt1), black_box(&data), 128, 128, &opts));
    });
}

criterion_group!(
    benches,
    bench_resample_bilinear_upscale,
    bench_resample_lanczos_downscale,
    bench_resample_bicubic,
    bench_scale_half,
    bench_decode_packed_rgba8,
    bench_decode_bc1,
);
criterion_main!(benches);
