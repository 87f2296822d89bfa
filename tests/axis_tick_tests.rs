use chart_motion::core::{
    BandAnchor, DEFAULT_TICK_COUNT, Scale, Tick, TickRequest, closing_edge_tick, generate_ticks,
    thin_ticks_by_spacing,
};

fn values(ticks: &[Tick]) -> Vec<f64> {
    ticks.iter().map(|tick| tick.value).collect()
}

fn tick(value: f64, position: f64) -> Tick {
    Tick { value, position }
}

#[test]
fn linear_default_request_uses_round_steps() {
    let scale = Scale::linear((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::default());

    assert_eq!(DEFAULT_TICK_COUNT, 5);
    assert_eq!(values(&ticks), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    for tick in &ticks {
        assert!((tick.position - tick.value * 5.0).abs() <= 1e-9);
    }
}

#[test]
fn linear_domain_wider_than_f64_span_yields_finite_ticks() {
    let scale = Scale::linear((-1e308, 1e308), (0.0, 500.0)).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::default());

    assert!(ticks.len() >= 3);
    for tick in &ticks {
        assert!(tick.value.is_finite());
        assert!((0.0..=500.0).contains(&tick.position));
    }
    let zero = ticks.iter().find(|tick| tick.value == 0.0).expect("zero tick");
    assert!((zero.position - 250.0).abs() <= 1e-9);
}

#[test]
fn linear_ticks_follow_requested_interval() {
    let scale = Scale::linear((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::default().with_interval_px(250.0));
    assert_eq!(values(&ticks), vec![0.0, 50.0, 100.0]);
}

#[test]
fn requested_count_wins_over_interval() {
    let scale = Scale::linear((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    let request = TickRequest::default()
        .with_count(10)
        .with_interval_px(250.0);
    let ticks = generate_ticks(&scale, &request);
    assert_eq!(ticks.len(), 11);
}

#[test]
fn zero_count_yields_no_ticks() {
    let scale = Scale::linear((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    assert!(generate_ticks(&scale, &TickRequest::default().with_count(0)).is_empty());
}

#[test]
fn min_step_widens_linear_spacing() {
    let scale = Scale::linear((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    let request = TickRequest::default().with_step_bounds(Some(40.0), None);
    let ticks = generate_ticks(&scale, &request);
    assert_eq!(values(&ticks), vec![0.0, 40.0, 80.0]);
}

#[test]
fn fractional_domain_ticks_stay_round() {
    let scale = Scale::linear((0.0, 1.0), (0.0, 100.0)).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::default().with_count(10));
    assert_eq!(ticks.len(), 11);
    assert_eq!(ticks[3].value, 0.3);
}

#[test]
fn explicit_ticks_are_sorted_deduplicated_and_kept_out_of_domain() {
    let scale = Scale::linear((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    let ticks = generate_ticks(
        &scale,
        &TickRequest::explicit(vec![50.0, 10.0, 10.0, 200.0, f64::NAN]),
    );

    assert_eq!(values(&ticks), vec![10.0, 50.0, 200.0]);
    assert_eq!(ticks[2].position, 1000.0);
}

#[test]
fn band_ticks_use_category_stride() {
    let scale = Scale::band(10, (0.0, 1000.0), 0.0).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::default());

    assert_eq!(values(&ticks), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    assert_eq!(ticks[0].position, 50.0);
}

#[test]
fn band_ticks_respect_anchor() {
    let scale = Scale::band(4, (0.0, 400.0), 0.0).expect("valid scale");
    let request = TickRequest::default().with_anchor(BandAnchor::StepStart);
    let ticks = generate_ticks(&scale, &request);

    assert_eq!(values(&ticks), vec![0.0, 1.0, 2.0, 3.0]);
    let positions: Vec<f64> = ticks.iter().map(|tick| tick.position).collect();
    assert_eq!(positions, vec![0.0, 100.0, 200.0, 300.0]);
}

#[test]
fn predicate_filters_band_categories() {
    let scale = Scale::band(7, (0.0, 700.0), 0.0).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::filtered(|_, index| index % 3 == 0));
    assert_eq!(values(&ticks), vec![0.0, 3.0, 6.0]);
}

#[test]
fn predicate_filters_generated_linear_candidates() {
    let scale = Scale::linear((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::filtered(|value, _| value >= 50.0));
    assert_eq!(values(&ticks), vec![60.0, 80.0, 100.0]);
}

#[test]
fn log_ticks_follow_one_two_five_ladder() {
    let scale = Scale::log((1.0, 1000.0), (0.0, 300.0)).expect("valid scale");
    let ticks = generate_ticks(&scale, &TickRequest::default().with_count(10));

    assert_eq!(
        values(&ticks),
        vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0]
    );
    assert!(ticks[0].position.abs() <= 1e-9);
    assert!((ticks[9].position - 300.0).abs() <= 1e-9);
}

#[test]
fn closing_edge_tick_marks_end_of_last_band() {
    let band = Scale::band(4, (0.0, 400.0), 0.2).expect("valid scale");
    let edge = closing_edge_tick(&band).expect("band edge tick");
    assert_eq!(edge.value, 4.0);
    assert_eq!(edge.position, 400.0);

    let linear = Scale::linear((0.0, 1.0), (0.0, 1.0)).expect("valid scale");
    assert!(closing_edge_tick(&linear).is_none());
}

#[test]
fn thinning_drops_crowded_ticks() {
    let ticks = [
        tick(0.0, 0.0),
        tick(1.0, 10.0),
        tick(2.0, 20.0),
        tick(3.0, 30.0),
        tick(4.0, 100.0),
    ];
    let thinned = thin_ticks_by_spacing(&ticks, 25.0);
    assert_eq!(values(&thinned), vec![0.0, 3.0, 4.0]);
}

#[test]
fn thinning_keeps_far_end_when_room_allows() {
    let ticks = [
        tick(0.0, 0.0),
        tick(1.0, 40.0),
        tick(2.0, 80.0),
        tick(3.0, 95.0),
    ];
    let thinned = thin_ticks_by_spacing(&ticks, 30.0);
    assert_eq!(values(&thinned), vec![0.0, 1.0, 3.0]);
}

#[test]
fn thinning_with_non_positive_spacing_keeps_everything() {
    let ticks = [tick(1.0, 10.0), tick(0.0, 0.0)];
    let thinned = thin_ticks_by_spacing(&ticks, 0.0);
    assert_eq!(values(&thinned), vec![0.0, 1.0]);
}
