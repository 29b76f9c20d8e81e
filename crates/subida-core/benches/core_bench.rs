//! Criterion benchmarks for subida-core DSP primitives
//!
//! Run with: cargo bench -p subida-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use subida_core::{
    Biquad, BiquadParams, CombFilter, CombParams, DelayBuffer, FilterKind, Interpolation,
    fast_math::fast_tan,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("DelayBuffer");

    for interp in [Interpolation::None, Interpolation::Linear, Interpolation::Cubic] {
        for &block_size in BLOCK_SIZES {
            let input = generate_test_signal(block_size);

            group.bench_with_input(
                BenchmarkId::new(format!("read_{interp:?}"), block_size),
                &block_size,
                |b, _| {
                    let mut delay = DelayBuffer::new();
                    delay.prepare_secs(1.0, SAMPLE_RATE);
                    delay.set_delay_time(0.01, 0.0);
                    b.iter(|| {
                        for &sample in &input {
                            delay.push(black_box(sample));
                            black_box(delay.read(interp));
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::new();
                biquad.prepare(SAMPLE_RATE);
                biquad.set_params(&BiquadParams {
                    kind: FilterKind::Lowpass,
                    cutoff_hz: 1000.0,
                    q: 0.707,
                    enabled: true,
                });
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    // Coefficient recompute cost (cutoff sweep forces the pre-warp each call)
    group.bench_function("coefficient_recompute", |b| {
        let mut biquad = Biquad::new();
        biquad.prepare(SAMPLE_RATE);
        let mut cutoff = 100.0;
        b.iter(|| {
            cutoff = if cutoff > 10000.0 { 100.0 } else { cutoff * 1.001 };
            biquad.set_params(&BiquadParams {
                kind: FilterKind::Lowpass,
                cutoff_hz: black_box(cutoff),
                q: 0.707,
                enabled: true,
            });
        });
    });

    group.finish();
}

fn bench_comb(c: &mut Criterion) {
    let mut group = c.benchmark_group("CombFilter");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut comb = CombFilter::new();
                comb.prepare(SAMPLE_RATE);
                comb.set_params(
                    &CombParams {
                        freq_hz: 150.0,
                        wet: 0.5,
                        feedback: 0.4,
                        interpolation: Interpolation::Linear,
                    },
                    0.0,
                );
                b.iter(|| {
                    for &sample in &input {
                        black_box(comb.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_fast_tan(c: &mut Criterion) {
    c.bench_function("fast_tan", |b| {
        b.iter(|| black_box(fast_tan(black_box(0.131))));
    });
    c.bench_function("libm_tanf", |b| {
        b.iter(|| black_box(libm::tanf(black_box(0.131))));
    });
}

criterion_group!(benches, bench_delay, bench_biquad, bench_comb, bench_fast_tan);
criterion_main!(benches);
