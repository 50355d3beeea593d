//! Benchmarks for parsing and analysis
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scopeview_rs::view::{decimate_points, ViewSettings};
use scopeview_rs::{estimate_frequency, parse_str, Channel, ParserConfig};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Single-column export of a 1 kHz sine in ADC counts
fn single_column_export(samples: usize) -> String {
    let mut text = String::from("Sampling Period,1e-5\nVertical Scale,0.5\nWaveform Data\n");
    for i in 0..samples {
        let count = (100.0 * (2.0 * std::f64::consts::PI * 1000.0 * i as f64 * 1e-5).sin()) as i64;
        text.push_str(&count.to_string());
        text.push('\n');
    }
    text
}

/// Multi-column export of the same signal
fn multi_column_export(samples: usize) -> String {
    let mut text = String::from("Index;Source;Mode;Tiempo(s);CH1 (V)\nWaveform Data\n");
    for i in 0..samples {
        let t = i as f64 * 1e-5;
        let v = (2.0 * std::f64::consts::PI * 1000.0 * t).sin();
        text.push_str(&format!("{};CH1;Normal;{};{}\n", i, t, v));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let config = ParserConfig::default();

    for size in SIZES.iter() {
        let single = single_column_export(*size);
        let multi = multi_column_export(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("single_column", size), &single, |b, text| {
            b.iter(|| black_box(parse_str(black_box(text), &config)))
        });
        group.bench_with_input(BenchmarkId::new("multi_column", size), &multi, |b, text| {
            b.iter(|| black_box(parse_str(black_box(text), &config)))
        });
    }

    group.finish();
}

fn bench_estimate_frequency(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_frequency");

    for size in SIZES.iter() {
        let time: Vec<f64> = (0..*size).map(|i| i as f64 * 1e-5).collect();
        let voltage: Vec<f64> = time
            .iter()
            .map(|t| (2.0 * std::f64::consts::PI * 1000.0 * t).sin())
            .collect();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("sine", size),
            &(time, voltage),
            |b, (time, voltage)| b.iter(|| black_box(estimate_frequency(time, voltage))),
        );
    }

    group.finish();
}

fn bench_display_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("display_trace");
    let series = parse_str(&single_column_export(100_000), &ParserConfig::default())
        .expect("benchmark export parses");
    let view = ViewSettings {
        time_trace_offset: 0.001,
        ch1_pos_offset: 0.25,
        ..Default::default()
    };

    group.bench_function("offset_and_decimate", |b| {
        b.iter(|| {
            let points = view.display_trace(black_box(&series), Channel::Ch1);
            black_box(decimate_points(&points, scopeview_rs::types::MAX_RENDER_POINTS))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_estimate_frequency,
    bench_display_trace,
);

criterion_main!(benches);
