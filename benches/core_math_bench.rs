use chart_motion::animation::{PathTransition, TransitionConfig, interpolate_path};
use chart_motion::core::{
    Point, Rect, Scale, TickRequest, calculate_arc_data, generate_ticks, line_path,
};
use chart_motion::layout::{LabelBox, LabelCollisionConfig, resolve_label_collisions};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_scale_evaluation(c: &mut Criterion) {
    let linear = Scale::linear((0.0, 10_000.0), (0.0, 1920.0)).expect("valid linear scale");
    let band = Scale::band(365, (0.0, 1920.0), 0.2).expect("valid band scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = linear.evaluate(black_box(4_321.123));
            let _ = linear.invert(px);
        })
    });

    c.bench_function("band_scale_evaluate_365", |b| {
        b.iter(|| {
            for index in 0..365 {
                let _ = band.evaluate(black_box(index as f64));
            }
        })
    });

    c.bench_function("linear_ticks_default", |b| {
        let request = TickRequest::default();
        b.iter(|| {
            let _ = generate_ticks(black_box(&linear), &request);
        })
    });
}

fn bench_arc_calculation(c: &mut Criterion) {
    let values: Vec<f64> = (1..=64).map(|i| (i % 7 + 1) as f64 * 10.0).collect();

    c.bench_function("arc_data_64_slices", |b| {
        b.iter(|| {
            let _ = calculate_arc_data(black_box(&values), 40.0, 120.0, 0.0, 360.0, 1.0);
        })
    });
}

fn bench_label_resolution(c: &mut Criterion) {
    let boxes: Vec<LabelBox> = (0..24)
        .map(|i| LabelBox::new(format!("series-{i}"), 80.0, 14.0, 600.0, 200.0 + (i % 5) as f64))
        .collect();
    let config = LabelCollisionConfig::new(Rect::new(0.0, 0.0, 1200.0, 600.0));

    c.bench_function("label_resolution_24", |b| {
        b.iter(|| {
            let _ = resolve_label_collisions(black_box(&boxes), config)
                .expect("resolution should succeed");
        })
    });
}

fn bench_path_sampling(c: &mut Criterion) {
    let from: Vec<Point> = (0..500)
        .map(|i| Point::new(i as f64 * 2.0, 300.0))
        .collect();
    let to: Vec<Point> = (0..800)
        .map(|i| Point::new(i as f64 * 1.25, 300.0 + (i as f64 * 0.05).sin() * 120.0))
        .collect();
    let from_path = line_path(&from);
    let to_path = line_path(&to);

    c.bench_function("path_interpolator_build_500_to_800", |b| {
        b.iter(|| {
            let _ = interpolate_path(black_box(&from_path), black_box(&to_path))
                .expect("paths should parse");
        })
    });

    let interpolator = interpolate_path(&from_path, &to_path).expect("paths should parse");
    c.bench_function("path_sample_800_segments", |b| {
        b.iter(|| {
            let _ = interpolator.sample(black_box(0.37));
        })
    });

    c.bench_function("path_transition_frame", |b| {
        let mut transition =
            PathTransition::initialize(from_path.clone(), None, TransitionConfig::default());
        transition.update(to_path.clone());
        b.iter(|| {
            transition.set_progress(black_box(0.5));
            let _ = transition.sample();
        })
    });
}

criterion_group!(
    benches,
    bench_scale_evaluation,
    bench_arc_calculation,
    bench_label_resolution,
    bench_path_sampling
);
criterion_main!(benches);
