use std::f64::consts::{FRAC_PI_2, PI};

use chart_motion::animation::PathData;
use chart_motion::core::{
    Arc, Point, Rect, arc_path, area_path, bar_path, calculate_arc_data, line_path,
};

fn arc(start_angle: f64, end_angle: f64, inner_radius: f64, outer_radius: f64) -> Arc {
    Arc {
        start_angle,
        end_angle,
        padding: 0.0,
        inner_radius,
        outer_radius,
        index: 0,
        value: 1.0,
    }
}

#[test]
fn empty_inputs_yield_empty_paths() {
    assert_eq!(line_path(&[]), "");
    assert_eq!(area_path(&[], 100.0), "");
    assert_eq!(arc_path(arc(0.0, PI, 0.0, 0.0), Point::default()), "");
}

#[test]
fn area_path_closes_along_baseline() {
    let path = area_path(&[Point::new(0.0, 10.0), Point::new(20.0, 5.0)], 50.0);
    assert_eq!(path, "M 0,10 L 20,5 L 20,50 L 0,50 Z");
}

#[test]
fn bar_path_traces_rectangle_clockwise() {
    let path = bar_path(Rect::new(10.0, 20.0, 30.0, 40.0));
    assert_eq!(path, "M 10,20 L 40,20 L 40,60 L 10,60 Z");
}

#[test]
fn pie_slice_returns_to_center() {
    let path = arc_path(arc(0.0, FRAC_PI_2, 0.0, 10.0), Point::new(0.0, 0.0));

    assert!(path.starts_with("M 0,-10 A 10,10,0,0,1,"));
    assert!(path.ends_with("L 0,0 Z"));
}

#[test]
fn large_slices_set_large_arc_flag() {
    let path = arc_path(arc(0.0, 1.5 * PI, 0.0, 10.0), Point::new(0.0, 0.0));
    assert!(path.contains("A 10,10,0,1,1,"));
}

#[test]
fn donut_slice_draws_inner_edge_backwards() {
    let path = arc_path(arc(0.0, FRAC_PI_2, 5.0, 10.0), Point::new(0.0, 0.0));
    assert!(path.contains("A 5,5,0,0,0,"));
    assert!(path.ends_with("Z"));
}

#[test]
fn generated_paths_parse_back() {
    let points = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 5.5),
        Point::new(20.0, -3.25),
    ];
    let line = line_path(&points);
    let parsed = PathData::parse(&line).expect("line path parses");
    assert_eq!(parsed.to_path_string(), line);

    let area = area_path(&points, 40.0);
    let parsed = PathData::parse(&area).expect("area path parses");
    assert_eq!(parsed.to_path_string(), area);
    assert!(parsed.subpaths[0].closed);
}

#[test]
fn every_slice_of_a_donut_parses() {
    let center = Point::new(100.0, 100.0);
    for slice in calculate_arc_data(&[3.0, 1.0, 2.0], 40.0, 80.0, 0.0, 360.0, 2.0) {
        let path = arc_path(slice, center);
        let parsed = PathData::parse(&path).expect("slice path parses");
        assert_eq!(parsed.subpaths.len(), 1);
        assert!(parsed.subpaths[0].closed);
    }
}

#[test]
fn full_turn_arc_parses_into_closed_rings() {
    let full = calculate_arc_data(&[1.0], 30.0, 60.0, 0.0, 360.0, 0.0);
    let path = arc_path(full[0], Point::new(0.0, 0.0));
    let parsed = PathData::parse(&path).expect("ring path parses");

    assert_eq!(parsed.subpaths.len(), 2);
    assert!(parsed.subpaths.iter().all(|subpath| subpath.closed));
    let start = parsed.subpaths[0].start;
    assert!(start.x.abs() <= 1e-9);
    assert!((start.y + 60.0).abs() <= 1e-9);
}
