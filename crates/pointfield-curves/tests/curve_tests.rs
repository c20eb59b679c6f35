//! Curve generation integration tests

use pointfield_curves::{
    generate_curves, interpolate_points, ConnectionPoint, CurveError, CurveOptions,
};
use proptest::prelude::*;
use rstest::rstest;

// === Fixed Cases ===

#[rstest]
#[case(0.0, 101)]
#[case(f64::INFINITY, 2)]
fn test_two_key_points_sample_count(#[case] tolerance: f64, #[case] expected: usize) {
    let points = [
        ConnectionPoint::new(0, 0.0, 0.0, 1),
        ConnectionPoint::new(1, 1.0, 0.5, 1),
    ];
    let lines = generate_curves(&points, &CurveOptions::new(100, tolerance)).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].len(), expected);
}

#[test]
fn test_lines_are_generated_independently() {
    let points = [
        ConnectionPoint::new(0, 0.0, 0.0, 1),
        ConnectionPoint::new(1, 5.0, 5.0, 2),
        ConnectionPoint::new(2, 1.0, 0.0, 1),
        ConnectionPoint::new(3, 6.0, 5.0, 2),
    ];
    let lines = generate_curves(&points, &CurveOptions::default()).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].reference, 0);
    assert_eq!(lines[1].reference, 1);
    assert_eq!(lines[1].points.first(), Some(&[5.0, 5.0]));
    assert_eq!(lines[1].points.last(), Some(&[6.0, 5.0]));
}

#[test]
fn test_lone_point_line_is_kept() {
    let points = [ConnectionPoint::new(0, 2.0, 3.0, 9)];
    let lines = generate_curves(&points, &CurveOptions::default()).unwrap();
    assert_eq!(lines[0].points, vec![[2.0, 3.0]]);
}

#[test]
fn test_empty_input_error_message() {
    let err = generate_curves(&[], &CurveOptions::default()).unwrap_err();
    assert_eq!(err, CurveError::EmptyInput);
    assert_eq!(err.to_string(), "No points provided");
}

// === Property-Based Tests ===

fn key_points() -> impl Strategy<Value = Vec<[f64; 2]>> {
    prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..12)
        .prop_map(|v| v.into_iter().map(|(x, y)| [x, y]).collect())
}

proptest! {
    #[test]
    fn test_endpoints_are_preserved(keys in key_points(), tolerance in 0.0f64..1.0) {
        let out = interpolate_points(&keys, &CurveOptions::new(20, tolerance));
        prop_assert_eq!(out.first(), keys.first());
        prop_assert_eq!(out.last(), keys.last());
    }

    #[test]
    fn test_sample_count_is_bounded(keys in key_points(), tolerance in 0.0f64..1.0) {
        let segments = 20;
        let out = interpolate_points(&keys, &CurveOptions::new(segments, tolerance));
        prop_assert!(out.len() >= keys.len().min(2));
        prop_assert!(out.len() <= (keys.len() - 1) * segments + 1);
    }

    #[test]
    fn test_larger_tolerance_never_adds_points(keys in key_points()) {
        let fine = interpolate_points(&keys, &CurveOptions::new(20, 0.0));
        let coarse = interpolate_points(&keys, &CurveOptions::new(20, 0.5));
        prop_assert!(coarse.len() <= fine.len());
    }
}
